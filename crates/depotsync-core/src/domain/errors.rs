//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including identifier parsing failures, invalid remote references,
//! and rejected overlay edits.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Invalid remote reference (empty component, malformed version)
    #[error("Invalid remote reference: {0}")]
    InvalidRemoteRef(String),

    /// An overlay edit was rejected at construction
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    /// Invalid destination path for a candidate file
    #[error("Invalid file path: {0}")]
    InvalidFilePath(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
