pub mod billing;
pub mod classes;
pub mod leads;
pub mod people;
pub mod timetables;
pub mod types;

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error surface of the service layer. Kept `Clone` so results can
/// travel inside `Message` values back into the update loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(String),
    /// Non-2xx reply; `message` is the server's own text when the body
    /// carried a `{"message": ...}` payload.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Http(value.to_string())
    }
}

/// Thin wrapper over one shared `reqwest::Client` plus the backend
/// base URL. Every service object clones this (the inner client is
/// reference-counted).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Settings screen swaps the backend without rebuilding the app.
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(self.url(path))
            .query(query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .put(self.url(path))
            .json(body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .patch(self.url(path))
            .json(body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(path))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_message(&body),
            })
        }
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: extract_message(&body),
        });
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request rejected by server".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_url_and_path_without_double_slash() {
        let client = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.url("/bills"), "http://localhost:8000/api/bills");
        assert_eq!(client.url("leads/kanban"), "http://localhost:8000/api/leads/kanban");
    }

    #[test]
    fn extracts_server_message_when_present() {
        assert_eq!(
            extract_message(r#"{"message": "Bill is already paid"}"#),
            "Bill is already paid"
        );
        assert_eq!(extract_message("plain text error"), "plain text error");
        assert_eq!(extract_message("   "), "request rejected by server");
        assert_eq!(extract_message(r#"{"error": "nope"}"#), r#"{"error": "nope"}"#);
    }
}
