use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::server::responder;

/// Every failure a relay request can end in.
///
/// The status code and the client-facing message of each variant live in
/// [`RelayError::status_code`] and [`RelayError::client_message`]; handlers
/// only ever return the variant.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("Prompt is required")]
    PromptRequired,

    #[error("GOOGLE_GENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("No image content returned")]
    NoImageContent,

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Text placed in the `error` field of the JSON envelope.
    pub fn client_message(&self) -> String {
        match self {
            RelayError::MethodNotAllowed => "Method Not Allowed".to_string(),
            RelayError::PayloadTooLarge => "Payload too large".to_string(),
            RelayError::BodyRead(_) => "Failed to read request body".to_string(),
            RelayError::InvalidJson(_) => "Invalid JSON payload".to_string(),
            RelayError::PromptRequired => "Prompt is required".to_string(),
            RelayError::MissingApiKey => "Server missing configuration".to_string(),
            RelayError::NoImageContent => "No image content returned".to_string(),
            other => format!("Unexpected server error: {}", other),
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::BodyRead(_) | RelayError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            RelayError::PromptRequired => StatusCode::UNPROCESSABLE_ENTITY,
            RelayError::NoImageContent => StatusCode::BAD_GATEWAY,
            RelayError::MissingApiKey
            | RelayError::Upstream { .. }
            | RelayError::Transport(_)
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = responder::json_builder(self.status_code());
        if matches!(self, RelayError::PayloadTooLarge) {
            // the rest of the oversized body is never read
            builder.force_close();
        }
        responder::with_envelope(builder, &self.client_message())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table() {
        let cases = [
            (RelayError::MethodNotAllowed, 405),
            (RelayError::PayloadTooLarge, 413),
            (RelayError::BodyRead("reset".into()), 400),
            (RelayError::InvalidJson("eof".into()), 400),
            (RelayError::PromptRequired, 422),
            (RelayError::MissingApiKey, 500),
            (RelayError::NoImageContent, 502),
            (
                RelayError::Upstream {
                    status: 429,
                    message: "quota".into(),
                },
                500,
            ),
            (RelayError::Internal("boom".into()), 500),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code().as_u16(), status, "{:?}", error);
        }
    }

    #[test]
    fn client_messages_hide_details_for_known_kinds() {
        assert_eq!(
            RelayError::BodyRead("connection reset".into()).client_message(),
            "Failed to read request body"
        );
        assert_eq!(
            RelayError::InvalidJson("expected value".into()).client_message(),
            "Invalid JSON payload"
        );
        assert_eq!(
            RelayError::MissingApiKey.client_message(),
            "Server missing configuration"
        );
    }

    #[test]
    fn unexpected_errors_carry_their_message() {
        let error = RelayError::Upstream {
            status: 400,
            message: "API key not valid".into(),
        };
        assert_eq!(
            error.client_message(),
            "Unexpected server error: Upstream returned 400: API key not valid"
        );
    }

    #[test]
    fn payload_too_large_closes_connection() {
        let response = RelayError::PayloadTooLarge.error_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(!response.head().keep_alive());
    }
}
