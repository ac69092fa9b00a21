use super::types::{
    Bill, BillingOverview, CustomBillRequest, MarkPaidRequest, WhatsAppConfirmation,
    WhatsAppRequest,
};
use super::{ApiClient, ApiError};

#[derive(Debug, Clone)]
pub struct BillingService {
    client: ApiClient,
}

impl BillingService {
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }

    /// GET bills?year=&month=&is_custom=, month buckets plus the
    /// due/paid/unpaid statistics block.
    pub async fn overview(
        &self,
        year: i32,
        month: u32,
        custom_only: bool,
    ) -> Result<BillingOverview, ApiError> {
        let mut query = vec![("year", year.to_string()), ("month", month.to_string())];
        if custom_only {
            query.push(("is_custom", "true".to_string()));
        }
        self.client.get_json("bills", &query).await
    }

    pub async fn create_custom(&self, req: &CustomBillRequest) -> Result<Bill, ApiError> {
        self.client.post_json("bills/custom", req).await
    }

    /// Paid bills are immutable server-side; the screen already hides
    /// the action, the server enforces it.
    pub async fn mark_paid(&self, bill_id: i64, req: &MarkPaidRequest) -> Result<Bill, ApiError> {
        self.client
            .post_json(&format!("bills/{bill_id}/mark-paid"), req)
            .await
    }

    pub async fn send_whatsapp(
        &self,
        bill_id: i64,
        req: &WhatsAppRequest,
    ) -> Result<WhatsAppConfirmation, ApiError> {
        self.client
            .post_json(&format!("bills/{bill_id}/whatsapp"), req)
            .await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::types::BillStatus;
    use super::*;

    fn bill_json(id: i64, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "student_id": 3,
            "student_name": "Amina Hassan",
            "amount": 75.0,
            "currency": "USD",
            "status": status,
            "month_key": "2026-08"
        })
    }

    #[tokio::test]
    async fn overview_requests_the_selected_month() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bills"))
            .and(query_param("year", "2026"))
            .and(query_param("month", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bills": {
                    "2026-08": {
                        "bills": [bill_json(7, "pending")],
                        "unpaid": [bill_json(7, "pending")]
                    }
                },
                "statistics": {
                    "due": { "total": { "USD": 150.0 }, "count": 2 },
                    "paid": { "total": {}, "count": 0 },
                    "unpaid": { "total": { "USD": 150.0 }, "count": 2 }
                }
            })))
            .mount(&server)
            .await;

        let service = BillingService::new(&ApiClient::new(server.uri()));
        let overview = service.overview(2026, 8, false).await.unwrap();

        let bucket = &overview.bills["2026-08"];
        assert_eq!(bucket.bills.len(), 1);
        assert_eq!(bucket.bills[0].status, BillStatus::Pending);
        assert_eq!(overview.statistics.due.count, 2);
        assert_eq!(overview.statistics.due.total["USD"], 150.0);
    }

    #[tokio::test]
    async fn custom_only_filter_is_sent_when_enabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bills"))
            .and(query_param("is_custom", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bills": {},
                "statistics": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = BillingService::new(&ApiClient::new(server.uri()));
        let overview = service.overview(2026, 8, true).await.unwrap();
        assert!(overview.bills.is_empty());
    }

    #[tokio::test]
    async fn mark_paid_posts_to_the_bill_route() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bills/7/mark-paid"))
            .and(body_json(serde_json::json!({
                "payment_method": "Cash",
                "payment_date": "2026-08-25"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(bill_json(7, "paid")))
            .mount(&server)
            .await;

        let service = BillingService::new(&ApiClient::new(server.uri()));
        let req = MarkPaidRequest {
            payment_method: "Cash".to_string(),
            payment_date: "2026-08-25".to_string(),
            payment_reason: None,
        };
        let bill = service.mark_paid(7, &req).await.unwrap();
        assert_eq!(bill.status, BillStatus::Paid);
    }

    #[tokio::test]
    async fn server_rejections_carry_their_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bills/9/mark-paid"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "message": "Bill is already paid"
            })))
            .mount(&server)
            .await;

        let service = BillingService::new(&ApiClient::new(server.uri()));
        let req = MarkPaidRequest {
            payment_method: "Cash".to_string(),
            payment_date: "2026-08-25".to_string(),
            payment_reason: None,
        };
        let err = service.mark_paid(9, &req).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Api {
                status: 409,
                message: "Bill is already paid".to_string()
            }
        );
    }

    #[tokio::test]
    async fn whatsapp_send_reports_the_recipient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bills/7/whatsapp"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sent": true,
                "recipient": "+20 100 555 0199"
            })))
            .mount(&server)
            .await;

        let service = BillingService::new(&ApiClient::new(server.uri()));
        let req = WhatsAppRequest {
            phone_override: None,
        };
        let confirmation = service.send_whatsapp(7, &req).await.unwrap();
        assert!(confirmation.sent);
        assert_eq!(confirmation.recipient, "+20 100 555 0199");
    }
}
