//! Common error types for portal components.

use thiserror::Error;

use crate::types::{EntityKind, RecordId};

pub type PortalResult<T> = Result<T, PortalError>;

/// Errors reported by the ledger store and the request layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    /// No record with this id in the target collection
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: RecordId },

    /// Unknown entity tag passed to a field-level update
    #[error("Invalid entity type: {0}")]
    InvalidEntity(String),

    /// Malformed numeric, id, or date input, or an unknown field
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Delete refused because other records still reference this one
    #[error("{entity} {id} is referenced by {dependents} record(s)")]
    InUse {
        entity: EntityKind,
        id: RecordId,
        dependents: usize,
    },

    /// Missing or insufficient session
    #[error("Auth error: {0}")]
    Unauthorized(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidEntity(_) => 400,
            Self::Validation(_) => 400,
            Self::InUse { .. } => 409,
            Self::Unauthorized(_) => 401,
            Self::Internal(_) => 500,
        }
    }

    /// Machine-readable error code used in JSON bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidEntity(_) => "invalid_entity",
            Self::Validation(_) => "validation_error",
            Self::InUse { .. } => "in_use",
            Self::Unauthorized(_) => "unauthorized",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn not_found(entity: EntityKind, id: RecordId) -> Self {
        Self::NotFound { entity, id }
    }
}
