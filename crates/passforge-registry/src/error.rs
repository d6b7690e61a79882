//! Error types for the passforge registry

use thiserror::Error;

/// Registry-specific errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Draft not found: {0}")]
    DraftNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("View not found for template: {0}")]
    ViewNotFound(String),

    #[error("Domain error: {0}")]
    Domain(#[from] passforge::DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
