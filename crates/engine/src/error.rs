//! The module contains the errors the engine can return.
//!
//! - [`Validation`] when a payload is missing fields or carries bad values.
//! - [`KeyNotFound`] when a user, category, record or account is missing.
//! - [`InvalidReference`] when a record points to a missing user or category.
//! - [`InsufficientFunds`] when a debit would drive a balance below zero.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidReference`]: EngineError::InvalidReference
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("{0}")]
    KeyNotFound(String),
    #[error("{0}")]
    InvalidReference(String),
    #[error("{0}")]
    InsufficientFunds(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<ValidationErrors> for EngineError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidReference(a), Self::InvalidReference(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

pub(crate) fn user_not_found() -> EngineError {
    EngineError::KeyNotFound("User not found".to_string())
}

pub(crate) fn category_not_found() -> EngineError {
    EngineError::KeyNotFound("Category not found".to_string())
}

pub(crate) fn record_not_found() -> EngineError {
    EngineError::KeyNotFound("Record not found".to_string())
}

pub(crate) fn account_not_found() -> EngineError {
    EngineError::KeyNotFound("Account not found".to_string())
}

pub(crate) fn invalid_reference() -> EngineError {
    EngineError::InvalidReference("Invalid User or Category ID".to_string())
}

pub(crate) fn insufficient_funds() -> EngineError {
    EngineError::InsufficientFunds("Insufficient funds".to_string())
}

pub(crate) fn balance_overflow() -> EngineError {
    EngineError::Validation(ValidationErrors::single(
        "amount",
        "amount would overflow the account balance",
    ))
}

pub(crate) fn sequence_exhausted(table: &str) -> EngineError {
    EngineError::Database(DbErr::Custom(format!("{table} id sequence exhausted")))
}
