use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use thiserror::Error;

pub const DEFAULT_CHAT_PATH: &str = "/api/chat";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Why an exchange didn't produce a reply.
///
/// `Status` is an application-level failure. The other variants are
/// transport or parse failures and get reported to the diagnostic sink.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("chat endpoint responded with status {0}")]
    Status(u16),
    #[error("request to chat endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed reply body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ExchangeError {
    pub fn is_application_failure(&self) -> bool {
        matches!(self, ExchangeError::Status(_))
    }
}

/// One request/response exchange with the chat endpoint
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, message: &str) -> Result<String, ExchangeError>;
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    chat_path: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_path(base_url, DEFAULT_CHAT_PATH)
    }

    pub fn with_path(base_url: &str, chat_path: &str) -> Self {
        let chat_path = if chat_path.starts_with('/') {
            chat_path.to_string()
        } else {
            format!("/{}", chat_path)
        };

        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_path,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, self.chat_path)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Health check failed with status: {}", response.status()));
        }

        let status: HealthStatus = response.json().await?;
        Ok(status)
    }
}

#[async_trait]
impl ChatTransport for ChatClient {
    async fn send_message(&self, message: &str) -> Result<String, ExchangeError> {
        let url = self.chat_url();

        // `.json()` sets the Content-Type header to application/json
        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ExchangeError::Status(status.as_u16()));
        }

        let reply: ChatReply = serde_json::from_slice(&body)?;
        Ok(reply.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_joins_base_and_path() {
        let client = ChatClient::new("http://localhost:5000/");
        assert_eq!(client.chat_url(), "http://localhost:5000/api/chat");

        let client = ChatClient::with_path("http://localhost:5000", "ask");
        assert_eq!(client.chat_url(), "http://localhost:5000/ask");
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(ChatRequest { message: "hi there" }).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "hi there" }));
    }

    #[test]
    fn test_reply_requires_response_field() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"answer": "x"}"#).is_err());
        let reply: ChatReply = serde_json::from_str(r#"{"response": "x", "extra": 1}"#).unwrap();
        assert_eq!(reply.response, "x");
    }

    #[test]
    fn test_status_is_application_failure() {
        assert!(ExchangeError::Status(500).is_application_failure());
        let decode = serde_json::from_str::<ChatReply>("nope").unwrap_err();
        assert!(!ExchangeError::Decode(decode).is_application_failure());
    }
}
