use crate::config::Config;
use crate::mode::ViewMode;
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// HTTP client for the tutor backend's two chat endpoints.
#[derive(Clone)]
pub struct TutorClient {
    client: Client,
    base_url: String,
    structured_path: String,
    basic_path: String,
}

impl TutorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            structured_path: crate::config::DEFAULT_STRUCTURED_PATH.to_string(),
            basic_path: crate::config::DEFAULT_BASIC_PATH.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut client = Self::new(&config.base_url());
        client.structured_path = config.structured_path();
        client.basic_path = config.basic_path();
        client
    }

    pub fn endpoint(&self, mode: ViewMode) -> String {
        let path = match mode {
            ViewMode::Tutor => &self.structured_path,
            ViewMode::Chat => &self.basic_path,
        };
        format!("{}{}", self.base_url, path)
    }

    /// Post one message and return the reply body as text.
    ///
    /// A single attempt: transport errors and non-2xx statuses are returned
    /// as errors without retrying.
    pub async fn send(&self, mode: ViewMode, message: &str) -> Result<String> {
        let url = self.endpoint(mode);
        tracing::debug!(%url, mode = mode.as_str(), chars = message.chars().count(), "sending message");

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "request failed");
                anyhow!("request to {} failed: {}", url, e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%url, %status, "tutor backend returned an error");
            return Err(anyhow!("tutor backend error {}: {}", status, body));
        }

        let text = response.text().await?;
        tracing::debug!(%url, chars = text.chars().count(), "reply received");
        Ok(text)
    }
}
