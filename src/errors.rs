use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimplifyError {
    #[error("{0}")]
    RequestValidation(String),

    #[error("{0}")]
    ModelInvocation(String),

    #[error("Model is busy: {limit} generations already pending")]
    Overloaded { limit: usize },
}

impl SimplifyError {
    pub fn model(err: impl std::fmt::Display) -> Self {
        SimplifyError::ModelInvocation(err.to_string())
    }

    /// Body shared by every error outcome, whatever status it is sent with.
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse::new(self.to_string())
    }
}

impl ResponseError for SimplifyError {
    fn status_code(&self) -> StatusCode {
        match self {
            SimplifyError::RequestValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SimplifyError::ModelInvocation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SimplifyError::Overloaded { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_body())
    }
}

impl From<candle_core::Error> for SimplifyError {
    fn from(err: candle_core::Error) -> Self {
        SimplifyError::model(err)
    }
}

impl From<tokenizers::Error> for SimplifyError {
    fn from(err: tokenizers::Error) -> Self {
        SimplifyError::model(err)
    }
}

impl From<validator::ValidationErrors> for SimplifyError {
    fn from(err: validator::ValidationErrors) -> Self {
        SimplifyError::RequestValidation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SimplifyError::RequestValidation("missing field `text`".into()), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(SimplifyError::ModelInvocation("CUDA out of memory".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(SimplifyError::Overloaded { limit: 4 }, StatusCode::SERVICE_UNAVAILABLE)]
    fn maps_each_kind_to_a_status(#[case] err: SimplifyError, #[case] status: StatusCode) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_response().status(), status);
    }

    #[test]
    fn message_is_passed_through_unmodified() {
        let err = SimplifyError::ModelInvocation("index out of range in self".into());
        assert_eq!(err.to_body().error, "index out of range in self");
    }
}
