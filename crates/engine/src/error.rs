//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an item is missing or owned by someone else.
//! - [`InvalidName`], [`InvalidAmount`] and [`MissingField`] thrown when the
//!   input does not pass validation.
//! - [`InUse`] thrown when a record cannot be deleted because other records
//!   depend on it.
//! - [`Unauthenticated`] thrown when no acting user was provided.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`MissingField`]: EngineError::MissingField
//!  [`InUse`]: EngineError::InUse
//!  [`Unauthenticated`]: EngineError::Unauthenticated
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Still in use: {0}")]
    InUse(String),
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidName(_) | Self::InvalidAmount(_) | Self::MissingField(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::InUse(a), Self::InUse(b)) => a == b,
            (Self::Unauthenticated, Self::Unauthenticated) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
