use crate::{
    config::GenAiConfig,
    error::{RelayError, Result},
    genai::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse},
};
use reqwest::{header, Client};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client bound to one API key.
#[derive(Clone)]
pub struct GenAiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GenAiClient {
    pub fn new(api_key: impl Into<String>, config: &GenAiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: format!("{}/models/{}:generateContent", config.base_url, config.model),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One `generateContent` call with `prompt` as the only content. Not retried.
    pub async fn generate_content(&self, prompt: &str) -> Result<GenerateContentResponse> {
        let payload = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| "Generation failed".to_string());
            log::error!("Upstream rejected request: {} - {}", status, message);
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_targets_configured_model() {
        let config = GenAiConfig::new()
            .with_base_url("http://127.0.0.1:1/v1beta/")
            .with_model("gemini-test");
        let client = GenAiClient::new("key-1", &config);
        assert_eq!(
            client.endpoint(),
            "http://127.0.0.1:1/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(client.api_key(), "key-1");
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        // port 1 refuses connections
        let config = GenAiConfig::new().with_base_url("http://127.0.0.1:1");
        let client = GenAiClient::new("key", &config);

        let err = client.generate_content("anything").await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)), "{:?}", err);
    }
}
