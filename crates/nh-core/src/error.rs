//! # AppError
//!
//! Centralized error handling for the NewsHub content backend.
//! Lookups never fail with "not found" inside the store; they return `Option`
//! or `bool` and call sites convert with [`OptionExt::or_not_found`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::traits::Collection;

/// The primary error type for all nh-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Article, Ad, LiveStream)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Input could not be interpreted (e.g., unknown role or reaction type)
    #[error("validation error: {0}")]
    Validation(String),

    /// The actor's role does not permit the action
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource already exists (e.g., duplicate username)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., data directory unusable)
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for NewsHub logic.
pub type Result<T> = std::result::Result<T, AppError>;

/// A write that did not reach the repository.
///
/// The store keeps the in-memory mutation, so memory is ahead of disk for
/// `collection` until its next successful write.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceFailure {
    pub collection: Collection,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Converts store lookups into `AppError::NotFound` where a caller needs it.
pub trait OptionExt<T> {
    fn or_not_found(self, entity: &str, id: impl ToString) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, entity: &str, id: impl ToString) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(entity.to_string(), id.to_string()))
    }
}
