use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use tracing::Instrument;
use uuid::Uuid;

use crate::errors::SimplifyError;
use crate::models::SimplifyRequest;
use crate::utils::word_count;
use crate::AppState;

pub async fn simplify(
    state: web::Data<AppState>,
    req: web::Json<SimplifyRequest>,
) -> Result<HttpResponse, SimplifyError> {
    let span = tracing::info_span!("simplify", request_id = %Uuid::new_v4());
    handle_simplify(state, req.into_inner()).instrument(span).await
}

async fn handle_simplify(
    state: web::Data<AppState>,
    req: SimplifyRequest,
) -> Result<HttpResponse, SimplifyError> {
    tracing::info!(
        "Received simplify request - words: {}, max_length: {}, min_length: {}",
        word_count(&req.text),
        req.max_length,
        req.min_length
    );

    match state.paraphrase_service.simplify(req).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            tracing::error!("Simplify error: {:?}", e);
            if state.config.server.strict_error_status {
                Err(e)
            } else {
                Ok(HttpResponse::Ok().json(e.to_body()))
            }
        }
    }
}

/// Turns JSON extractor failures into `{"error": ...}` bodies with status 422.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected request body: {}", err);
    SimplifyError::RequestValidation(err.to_string()).into()
}
