use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::db::store::StoreError;
use crate::services::chat::ChatError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Duplicate(_)) => StatusCode::CONFLICT,
            ApiError::Chat(ChatError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Chat(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            ApiError::Store(StoreError::Duplicate(_)) => "Record already exists".to_string(),
            ApiError::Store(err) => {
                log::error!("Datastore error: {}", err);
                "Datastore request failed".to_string()
            }
            ApiError::Chat(ChatError::NotConfigured) => "AI assistant is not configured".to_string(),
            ApiError::Chat(err) => {
                log::error!("Chat completion error: {}", err);
                "AI assistant request failed".to_string()
            }
            ApiError::Internal(err) => {
                log::error!("Internal error: {}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { detail: &detail })
    }
}
