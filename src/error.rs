//! Error types.
//!
//! These cover the *expected* failure conditions of the engine ("not
//! found", "empty", "already root"). None of them indicates corruption.

use thiserror::Error;

use crate::types::CustomerId;

/// Customer directory failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("customer {0} is already the root")]
    AlreadyRoot(CustomerId),
}

/// Shopping cart failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("undo stack empty")]
    StackEmpty,
    #[error("product {0} is not in the cart")]
    ItemNotInCart(String),
}

/// Order queue failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("order queue empty")]
    Empty,
}

/// Configuration loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
