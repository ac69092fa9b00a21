use std::collections::HashMap;

use super::types::{Lead, LeadAuditLog, LeadPayload, LeadStatus, LeadStatusRequest};
use super::{ApiClient, ApiError};

/// Sales pipeline leads, grouped server-side for the kanban board.
#[derive(Debug, Clone)]
pub struct LeadService {
    client: ApiClient,
}

impl LeadService {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Fetches the full board, leads grouped by pipeline stage.
    /// `search` filters by name or phone substring on the server.
    pub async fn kanban(
        &self,
        search: Option<&str>,
    ) -> Result<HashMap<LeadStatus, Vec<Lead>>, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(term) = search {
            if !term.trim().is_empty() {
                query.push(("search", term.trim().to_string()));
            }
        }
        self.client.get_json("leads/kanban", &query).await
    }

    pub async fn create(&self, payload: &LeadPayload) -> Result<Lead, ApiError> {
        self.client.post_json("leads", payload).await
    }

    pub async fn update(&self, lead_id: i64, payload: &LeadPayload) -> Result<Lead, ApiError> {
        self.client
            .put_json(&format!("leads/{lead_id}"), payload)
            .await
    }

    pub async fn delete(&self, lead_id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("leads/{lead_id}")).await
    }

    /// Moves a lead to another stage. The server records the transition
    /// in the lead's audit history.
    pub async fn update_status(&self, lead_id: i64, status: LeadStatus) -> Result<Lead, ApiError> {
        self.client
            .patch_json(
                &format!("leads/{lead_id}/status"),
                &LeadStatusRequest { status },
            )
            .await
    }

    /// Stage transition history for one lead, newest first.
    pub async fn history(&self, lead_id: i64) -> Result<Vec<LeadAuditLog>, ApiError> {
        self.client
            .get_json(&format!("leads/{lead_id}/history"), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn lead_json(id: i64, name: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "status": status,
            "tags": []
        })
    }

    #[tokio::test]
    async fn kanban_parses_the_grouped_stages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/leads/kanban"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "new_lead": [lead_json(1, "Amina Hassan", "new_lead")],
                "contacted": [
                    lead_json(2, "Omar Farouk", "contacted"),
                    lead_json(3, "Lina Adel", "contacted")
                ]
            })))
            .mount(&server)
            .await;

        let service = LeadService::new(&ApiClient::new(server.uri()));
        let groups = service.kanban(None).await.unwrap();

        assert_eq!(groups[&LeadStatus::NewLead].len(), 1);
        assert_eq!(groups[&LeadStatus::Contacted].len(), 2);
        assert_eq!(groups[&LeadStatus::Contacted][0].name, "Omar Farouk");
        assert!(!groups.contains_key(&LeadStatus::Lost));
    }

    #[tokio::test]
    async fn search_is_forwarded_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/leads/kanban"))
            .and(query_param("search", "omar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let service = LeadService::new(&ApiClient::new(server.uri()));
        let groups = service.kanban(Some("  omar ")).await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn status_move_patches_the_lead() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/leads/5/status"))
            .and(body_json(serde_json::json!({ "status": "trial_scheduled" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(lead_json(5, "Omar Farouk", "trial_scheduled")),
            )
            .mount(&server)
            .await;

        let service = LeadService::new(&ApiClient::new(server.uri()));
        let lead = service
            .update_status(5, LeadStatus::TrialScheduled)
            .await
            .unwrap();
        assert_eq!(lead.status, LeadStatus::TrialScheduled);
    }

    #[tokio::test]
    async fn delete_succeeds_on_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/leads/9"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let service = LeadService::new(&ApiClient::new(server.uri()));
        service.delete(9).await.unwrap();
    }

    #[tokio::test]
    async fn history_lists_stage_transitions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/leads/5/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 11,
                    "lead_id": 5,
                    "from_status": null,
                    "to_status": "new_lead",
                    "actor": "reception",
                    "timestamp": "2026-08-20T09:00:00Z"
                },
                {
                    "id": 12,
                    "lead_id": 5,
                    "from_status": "new_lead",
                    "to_status": "contacted",
                    "actor": "sara",
                    "timestamp": "2026-08-21T14:30:00Z"
                }
            ])))
            .mount(&server)
            .await;

        let service = LeadService::new(&ApiClient::new(server.uri()));
        let history = service.history(5).await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].from_status, None);
        assert_eq!(history[1].from_status, Some(LeadStatus::NewLead));
        assert_eq!(history[1].to_status, LeadStatus::Contacted);
    }
}
