use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelayError, Result};

pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/png";

/// A validated generation request. `prompt` is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    /// Parse a raw request body. An empty body counts as `{}`.
    pub fn from_body(body: &str) -> Result<Self> {
        let raw = if body.is_empty() { "{}" } else { body };
        let parsed: Value =
            serde_json::from_str(raw).map_err(|e| RelayError::InvalidJson(e.to_string()))?;

        if parsed.is_null() {
            return Err(RelayError::InvalidJson("payload is null".into()));
        }

        let prompt = parsed
            .get("prompt")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();

        if prompt.is_empty() {
            return Err(RelayError::PromptRequired);
        }

        Ok(Self {
            prompt: prompt.to_string(),
        })
    }
}

/// Inline image extracted from the upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Base64 text exactly as the upstream sent it.
    pub image_data: String,
    pub mime_type: String,
}

/// Success body of `POST /api/generate-image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub image_base64: String,
    pub mime_type: String,
    pub prompt: String,
}

impl GenerateImageResponse {
    pub fn new(result: GenerationResult, prompt: String) -> Self {
        Self {
            image_base64: result.image_data,
            mime_type: result.mime_type,
            prompt,
        }
    }
}
