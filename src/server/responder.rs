use actix_web::{
    http::{header, StatusCode},
    HttpResponse, HttpResponseBuilder,
};
use serde::Serialize;
use std::path::Path;

use crate::models::ErrorEnvelope;

pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization, x-goog-api-key",
    ),
    ("Access-Control-Max-Age", "86400"),
];

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const OCTET_STREAM: &str = "application/octet-stream";

const MIME_TYPES: [(&str, &str); 11] = [
    ("html", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "application/javascript; charset=utf-8"),
    ("json", "application/json; charset=utf-8"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("ico", "image/x-icon"),
    ("txt", "text/plain; charset=utf-8"),
];

pub fn with_cors(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    for header in CORS_HEADERS {
        builder.insert_header(header);
    }
    builder
}

/// Builder preloaded with CORS, JSON content type and `Cache-Control: no-store`.
pub fn json_builder(status: StatusCode) -> HttpResponseBuilder {
    let mut builder = with_cors(HttpResponse::build(status));
    builder
        .insert_header((header::CONTENT_TYPE, JSON_CONTENT_TYPE))
        .insert_header((header::CACHE_CONTROL, "no-store"));
    builder
}

pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> HttpResponse {
    match serde_json::to_string(payload) {
        Ok(body) => json_builder(status).body(body),
        Err(e) => {
            log::error!("Failed to serialize response: {}", e);
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Unexpected server error: {}", e),
            )
        }
    }
}

pub fn with_envelope(mut builder: HttpResponseBuilder, message: &str) -> HttpResponse {
    let body = serde_json::to_string(&ErrorEnvelope::new(message)).unwrap_or_default();
    builder.body(body)
}

pub fn json_error(status: StatusCode, message: &str) -> HttpResponse {
    with_envelope(json_builder(status), message)
}

/// 204 answer to any `OPTIONS` request.
pub async fn preflight() -> HttpResponse {
    with_cors(HttpResponse::NoContent()).finish()
}

pub fn plain_text(status: StatusCode, text: &'static str) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((header::CONTENT_TYPE, "text/plain; charset=utf-8"))
        .body(text)
}

/// Content type for a file, by extension (case-insensitive).
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return OCTET_STREAM,
    };

    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM)
}
