use super::ConversationSource;
use super::wire::{ConversationDetail, ConversationList};
use crate::error::{PollError, PollResult};
use crate::types::{ConversationSnapshot, ConversationSummary};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://chatgpt.com/backend-api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the conversation history endpoints.
#[derive(Debug, Clone)]
pub struct ChatGptClient {
    client: Client,
    base_url: String,
}

impl ChatGptClient {
    pub fn new(base_url: impl Into<String>) -> PollResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Uses `VOICEMODE_API_BASE` when set.
    pub fn from_env() -> PollResult<Self> {
        let base =
            std::env::var("VOICEMODE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &str, url: &str) -> PollResult<T> {
        if token.trim().is_empty() {
            return Err(PollError::MissingCredential);
        }

        let response = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PollError::Unauthorized);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(PollError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ConversationSource for ChatGptClient {
    async fn find_latest_conversation(
        &self,
        token: &str,
    ) -> PollResult<Option<ConversationSummary>> {
        let url = format!(
            "{}/conversations?offset=0&limit=1&order=updated",
            self.base_url
        );
        let list: ConversationList = self.get_json(token, &url).await?;
        list.into_latest()
    }

    async fn fetch_conversation(&self, token: &str, id: &str) -> PollResult<ConversationSnapshot> {
        let url = format!("{}/conversation/{}", self.base_url, id);
        let detail: ConversationDetail = self.get_json(token, &url).await?;
        detail.into_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ChatGptClient::new("http://localhost:9999/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/api");
    }

    #[tokio::test]
    async fn test_missing_token_short_circuits() {
        // Port 9 is discard; the request must never be attempted.
        let client = ChatGptClient::new("http://127.0.0.1:9").unwrap();
        let err = client.find_latest_conversation("  ").await.unwrap_err();
        assert!(matches!(err, PollError::MissingCredential));
        let err = client.fetch_conversation("", "c1").await.unwrap_err();
        assert!(matches!(err, PollError::MissingCredential));
    }
}
