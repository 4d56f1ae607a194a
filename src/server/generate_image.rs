use actix_web::{
    http::{Method, StatusCode},
    web, HttpRequest, HttpResponse,
};
use uuid::Uuid;

use super::{body::read_body, responder, AppState};
use crate::{
    error::{RelayError, Result},
    logger,
    models::{GenerateImageResponse, GenerationRequest},
};

/// `POST /api/generate-image`: prompt in, base64 image out.
pub async fn generate_image(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.method() != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    let request_id = Uuid::new_v4();

    let body = read_body(payload, state.body_limit).await.map_err(|e| {
        log::warn!("[req:{}] {}", request_id, e);
        e
    })?;
    let request = GenerationRequest::from_body(&body)?;

    log::info!(
        "[req:{}] Generating image for prompt ({} chars)",
        request_id,
        request.prompt.chars().count()
    );

    let outcome = {
        let _timer = logger::timer(format!("[req:{}] image generation", request_id));
        state.generator.generate_image(&request.prompt).await
    };

    match outcome {
        Ok(result) => {
            log::info!(
                "[req:{}] Image generated ({}, {} base64 chars)",
                request_id,
                result.mime_type,
                result.image_data.len()
            );
            Ok(responder::json(
                StatusCode::OK,
                &GenerateImageResponse::new(result, request.prompt),
            ))
        }
        Err(e) => {
            match &e {
                RelayError::MissingApiKey => {
                    log::error!("[req:{}] GOOGLE_GENAI_API_KEY is not configured", request_id)
                }
                RelayError::NoImageContent => {
                    log::warn!("[req:{}] Upstream returned no image", request_id)
                }
                other => log::error!("[req:{}] Image generation error: {}", request_id, other),
            }
            Err(e)
        }
    }
}
