use super::types::{ClassInstance, ClassStatusRequest};
use super::{ApiClient, ApiError};

/// Generated class occurrences and attendance updates.
#[derive(Debug, Clone)]
pub struct ClassService {
    client: ApiClient,
}

impl ClassService {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Lists class instances, optionally bounded by an inclusive date range.
    pub async fn list(
        &self,
        from: Option<String>,
        to: Option<String>,
    ) -> Result<Vec<ClassInstance>, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(from) = from {
            query.push(("from", from));
        }
        if let Some(to) = to {
            query.push(("to", to));
        }
        self.client.get_json("classes", &query).await
    }

    /// Sets the attendance status of a single class instance.
    pub async fn update_status(
        &self,
        class_id: i64,
        request: &ClassStatusRequest,
    ) -> Result<ClassInstance, ApiError> {
        self.client
            .patch_json(&format!("classes/{class_id}/status"), request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::types::ClassStatus;
    use super::*;

    fn class_json(id: i64, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "timetable_id": 4,
            "date": "2026-09-07",
            "start": "10:00",
            "end": "11:00",
            "status": status
        })
    }

    #[tokio::test]
    async fn list_forwards_the_date_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/classes"))
            .and(query_param("from", "2026-09-01"))
            .and(query_param("to", "2026-09-30"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([class_json(11, "pending")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let service = ClassService::new(&ApiClient::new(server.uri()));
        let classes = service
            .list(Some("2026-09-01".to_string()), Some("2026-09-30".to_string()))
            .await
            .unwrap();

        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].status, ClassStatus::Pending);
    }

    #[tokio::test]
    async fn cancellation_carries_its_reason() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/classes/11/status"))
            .and(body_json(serde_json::json!({
                "status": "cancelled_by_student",
                "cancellation_reason": "sick"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 11,
                "timetable_id": 4,
                "date": "2026-09-07",
                "start": "10:00",
                "end": "11:00",
                "status": "cancelled_by_student",
                "cancellation_reason": "sick"
            })))
            .mount(&server)
            .await;

        let service = ClassService::new(&ApiClient::new(server.uri()));
        let request = ClassStatusRequest {
            status: ClassStatus::CancelledByStudent,
            cancellation_reason: Some("sick".to_string()),
        };
        let updated = service.update_status(11, &request).await.unwrap();

        assert_eq!(updated.status, ClassStatus::CancelledByStudent);
        assert_eq!(updated.cancellation_reason.as_deref(), Some("sick"));
    }

    #[tokio::test]
    async fn attendance_update_drops_the_reason_field() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/classes/11/status"))
            .and(body_json(serde_json::json!({ "status": "attended" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(class_json(11, "attended")),
            )
            .mount(&server)
            .await;

        let service = ClassService::new(&ApiClient::new(server.uri()));
        let request = ClassStatusRequest {
            status: ClassStatus::Attended,
            cancellation_reason: None,
        };
        let updated = service.update_status(11, &request).await.unwrap();
        assert_eq!(updated.status, ClassStatus::Attended);
    }
}
