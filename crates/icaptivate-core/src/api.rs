use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::ApiError;
use crate::state::{Perspective, Suggestion, ToneLevel};

pub const DEFAULT_API_URL: &str = "https://icaptivate.org/api";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    message: &'a str,
    perspective: Perspective,
    tone: ToneLevel,
}

#[derive(Deserialize)]
struct GenerateResponse {
    suggestions: Vec<Suggestion>,
}

/// Client for the reply suggestions service.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_API_URL)
    }

    pub fn with_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the service for reply suggestions to `message`.
    ///
    /// A blank message fails with [`ApiError::EmptyMessage`] before anything is
    /// sent. Failures are logged here and then returned to the caller.
    pub async fn generate_responses(
        &self,
        message: &str,
        perspective: Perspective,
        tone: ToneLevel,
    ) -> Result<Vec<Suggestion>, ApiError> {
        if message.trim().is_empty() {
            return Err(ApiError::EmptyMessage);
        }

        let result = self.post_generate(message, perspective, tone).await;
        match &result {
            Ok(suggestions) => debug!(count = suggestions.len(), "received suggestions"),
            Err(e) => error!(error = %e, "Error generating responses"),
        }
        result
    }

    async fn post_generate(
        &self,
        message: &str,
        perspective: Perspective,
        tone: ToneLevel,
    ) -> Result<Vec<Suggestion>, ApiError> {
        let url = format!("{}/generate-response", self.base_url);

        let request = GenerateRequest {
            message,
            perspective,
            tone,
        };

        debug!(%url, perspective = perspective.as_str(), tone = tone.value(), "requesting suggestions");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        Ok(parsed.suggestions)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
