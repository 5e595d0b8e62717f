use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Out of stock")]
    OutOfStock,

    #[error("Not found")]
    NotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    #[error("Order already claimed")]
    AlreadyClaimed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::OutOfStock => AppError::OutOfStock,
            DomainError::NotFound => AppError::NotFound,
            DomainError::Authorization(msg) => AppError::Forbidden(msg),
            DomainError::IllegalTransition { .. } => AppError::IllegalTransition(e.to_string()),
            DomainError::AlreadyClaimed => AppError::AlreadyClaimed,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "error": self.to_string() });
        match self {
            AppError::Validation(_) => HttpResponse::BadRequest().json(body),
            AppError::OutOfStock | AppError::AlreadyClaimed => HttpResponse::Conflict().json(body),
            AppError::NotFound => HttpResponse::NotFound().json(body),
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(body),
            AppError::IllegalTransition(_) => HttpResponse::UnprocessableEntity().json(body),
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}
