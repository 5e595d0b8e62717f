use thiserror::Error;

use super::order::OrderStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Out of stock")]
    OutOfStock,
    #[error("Not found")]
    NotFound,
    #[error("Forbidden: {0}")]
    Authorization(String),
    #[error("Illegal transition from {from:?} to {to:?}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },
    #[error("Order already claimed")]
    AlreadyClaimed,
    #[error("Internal error: {0}")]
    Internal(String),
}
