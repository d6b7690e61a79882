//! Error types for the passforge domain core

use std::fmt;

use thiserror::Error;

/// Entity kinds referenced by not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    DataField,
    Section,
    Node,
    Template,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::DataField => "data field",
            EntityKind::Section => "section",
            EntityKind::Node => "node",
            EntityKind::Template => "template",
        };
        write!(f, "{name}")
    }
}

/// Errors raised by the domain model.
///
/// Every error is raised synchronously before any mutation is applied, so a
/// failed call leaves the aggregate exactly as it was.
#[derive(Error, Debug)]
pub enum DomainError {
    /// An invalid value was supplied to a constructor or mutator.
    #[error("{0}")]
    InvalidValue(String),

    /// A referenced id does not exist within the aggregate being operated on.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
}

impl DomainError {
    pub fn invalid_value(message: impl Into<String>) -> Self {
        DomainError::InvalidValue(message.into())
    }

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Result type for domain operations
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DomainError::not_found(EntityKind::DataField, "f-1");
        assert_eq!(err.to_string(), "data field not found: f-1");
    }

    #[test]
    fn test_invalid_value_display_is_bare_message() {
        let err = DomainError::invalid_value("5 Cols not supported");
        assert_eq!(err.to_string(), "5 Cols not supported");
    }
}
