use super::types::{
    GenerateRequest, GenerateResponse, Timetable, TimetablePayload, TimetableStatus,
};
use super::{ApiClient, ApiError};

#[derive(Debug, Clone)]
pub struct TimetableService {
    client: ApiClient,
}

impl TimetableService {
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }

    pub async fn list(&self) -> Result<Vec<Timetable>, ApiError> {
        self.client.get_json("timetables", &[]).await
    }

    /// Active timetables of one student; conflict checking queries the
    /// two parties independently.
    pub async fn active_for_student(&self, student_id: i64) -> Result<Vec<Timetable>, ApiError> {
        self.client
            .get_json(
                "timetables",
                &[
                    ("student_id", student_id.to_string()),
                    ("status", TimetableStatus::Active.key().to_string()),
                ],
            )
            .await
    }

    pub async fn active_for_teacher(&self, teacher_id: i64) -> Result<Vec<Timetable>, ApiError> {
        self.client
            .get_json(
                "timetables",
                &[
                    ("teacher_id", teacher_id.to_string()),
                    ("status", TimetableStatus::Active.key().to_string()),
                ],
            )
            .await
    }

    pub async fn create(&self, payload: &TimetablePayload) -> Result<Timetable, ApiError> {
        self.client.post_json("timetables", payload).await
    }

    pub async fn update(
        &self,
        timetable_id: i64,
        payload: &TimetablePayload,
    ) -> Result<Timetable, ApiError> {
        self.client
            .put_json(&format!("timetables/{timetable_id}"), payload)
            .await
    }

    /// POST timetables/{id}/generate: materialises class instances
    /// for the date range from the recurring slots.
    pub async fn generate(
        &self,
        timetable_id: i64,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, ApiError> {
        self.client
            .post_json(&format!("timetables/{timetable_id}/generate"), req)
            .await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::types::TimeSlot;
    use super::*;

    fn timetable_json(id: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "student_id": 3,
            "teacher_id": 2,
            "course_id": 1,
            "days_of_week": [1],
            "time_slots": [{ "day": 1, "start": "10:00", "end": "11:00" }],
            "student_timezone": "Africa/Cairo",
            "teacher_timezone": "Europe/London",
            "time_difference_minutes": 120,
            "status": "active",
            "student_name": "Amina Hassan",
            "teacher_name": "Mr. Saleh"
        })
    }

    fn sample_payload() -> TimetablePayload {
        TimetablePayload {
            student_id: 3,
            teacher_id: 2,
            course_id: 1,
            days_of_week: vec![1],
            time_slots: vec![TimeSlot {
                day: 1,
                start: "10:00".to_string(),
                end: "11:00".to_string(),
            }],
            student_timezone: "Africa/Cairo".to_string(),
            teacher_timezone: "Europe/London".to_string(),
            time_difference_minutes: 120,
            status: TimetableStatus::Active,
        }
    }

    #[tokio::test]
    async fn student_lookup_asks_for_active_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timetables"))
            .and(query_param("student_id", "3"))
            .and(query_param("status", "active"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([timetable_json(4)])),
            )
            .mount(&server)
            .await;

        let service = TimetableService::new(&ApiClient::new(server.uri()));
        let timetables = service.active_for_student(3).await.unwrap();

        assert_eq!(timetables.len(), 1);
        assert_eq!(timetables[0].status, TimetableStatus::Active);
        assert_eq!(timetables[0].time_slots[0].start, "10:00");
    }

    #[tokio::test]
    async fn create_posts_the_full_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/timetables"))
            .and(body_json(serde_json::json!({
                "student_id": 3,
                "teacher_id": 2,
                "course_id": 1,
                "days_of_week": [1],
                "time_slots": [{ "day": 1, "start": "10:00", "end": "11:00" }],
                "student_timezone": "Africa/Cairo",
                "teacher_timezone": "Europe/London",
                "time_difference_minutes": 120,
                "status": "active"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(timetable_json(4)))
            .mount(&server)
            .await;

        let service = TimetableService::new(&ApiClient::new(server.uri()));
        let created = service.create(&sample_payload()).await.unwrap();
        assert_eq!(created.id, 4);
    }

    #[tokio::test]
    async fn update_puts_to_the_timetable_route() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/timetables/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(timetable_json(4)))
            .mount(&server)
            .await;

        let service = TimetableService::new(&ApiClient::new(server.uri()));
        let updated = service.update(4, &sample_payload()).await.unwrap();
        assert_eq!(updated.student_name.as_deref(), Some("Amina Hassan"));
    }

    #[tokio::test]
    async fn generate_sends_the_date_range_and_returns_the_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/timetables/4/generate"))
            .and(body_json(serde_json::json!({
                "from_date": "2026-09-01",
                "to_date": "2026-09-30"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "generated": 6 })),
            )
            .mount(&server)
            .await;

        let service = TimetableService::new(&ApiClient::new(server.uri()));
        let req = GenerateRequest {
            from_date: "2026-09-01".to_string(),
            to_date: "2026-09-30".to_string(),
        };
        let response = service.generate(4, &req).await.unwrap();
        assert_eq!(response.generated, 6);
    }
}
