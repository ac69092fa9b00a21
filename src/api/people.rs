use super::types::{Course, Student, StudentPayload, Teacher};
use super::{ApiClient, ApiError};

/// Students, teachers and courses. Teachers and courses are read-only
/// here, they are managed from the admin backend.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    client: ApiClient,
}

impl DirectoryService {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    pub async fn students(&self) -> Result<Vec<Student>, ApiError> {
        self.client.get_json("students", &[]).await
    }

    pub async fn create_student(&self, payload: &StudentPayload) -> Result<Student, ApiError> {
        self.client.post_json("students", payload).await
    }

    pub async fn update_student(
        &self,
        student_id: i64,
        payload: &StudentPayload,
    ) -> Result<Student, ApiError> {
        self.client
            .put_json(&format!("students/{student_id}"), payload)
            .await
    }

    pub async fn delete_student(&self, student_id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("students/{student_id}")).await
    }

    pub async fn teachers(&self) -> Result<Vec<Teacher>, ApiError> {
        self.client.get_json("teachers", &[]).await
    }

    pub async fn courses(&self) -> Result<Vec<Course>, ApiError> {
        self.client.get_json("courses", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn students_tolerate_sparse_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/students"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 3, "name": "Amina Hassan", "timezone": "Africa/Cairo" },
                { "id": 4, "name": "Omar Farouk" }
            ])))
            .mount(&server)
            .await;

        let service = DirectoryService::new(&ApiClient::new(server.uri()));
        let students = service.students().await.unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].timezone.as_deref(), Some("Africa/Cairo"));
        assert_eq!(students[1].phone, None);
    }

    #[tokio::test]
    async fn create_skips_fields_left_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/students"))
            .and(body_json(serde_json::json!({
                "name": "Amina Hassan",
                "timezone": "Africa/Cairo"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 3,
                "name": "Amina Hassan",
                "timezone": "Africa/Cairo"
            })))
            .mount(&server)
            .await;

        let service = DirectoryService::new(&ApiClient::new(server.uri()));
        let payload = StudentPayload {
            name: "Amina Hassan".to_string(),
            phone: None,
            email: None,
            timezone: Some("Africa/Cairo".to_string()),
            country: None,
        };
        let created = service.create_student(&payload).await.unwrap();
        assert_eq!(created.id, 3);
    }
}
