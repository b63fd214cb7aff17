use actix_web::{HttpResponse, Result};

use crate::models::MessageResponse;

pub const ROOT_MESSAGE: &str = "testing fastAPI  huggingface models";

pub async fn root() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: ROOT_MESSAGE.to_string(),
    }))
}
