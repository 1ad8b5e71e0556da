// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The API error contract.
//!
//! Every lower-layer error is translated into one of these categories at the
//! handler boundary; the server maps each category to exactly one HTTP
//! status. Internal detail stays in the `Internal` payload for logging and
//! is never sent to clients.

use agrisure::{AccessDenied, CoreError};
use agrisure_domain::DomainError;
use agrisure_persistence::PersistenceError;

/// Errors returned by handler functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request was malformed or violated a business rule.
    Validation(String),
    /// The caller is not authenticated, or authentication failed.
    Unauthorized(String),
    /// The caller is authenticated but not permitted.
    Forbidden {
        /// The resource the caller attempted to access.
        resource: &'static str,
        /// The attempted action.
        action: &'static str,
    },
    /// The addressed entity does not exist.
    NotFound(String),
    /// The entity was not in a state that permits the transition.
    StateConflict {
        /// The entity kind.
        entity: &'static str,
        /// The entity's identifier.
        entity_id: i64,
        /// The state the entity is actually in.
        current: String,
        /// The state the caller tried to reach.
        attempted: &'static str,
    },
    /// An unexpected failure; detail is for server-side logs only.
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::Forbidden { resource, action } => {
                write!(f, "Permission denied: {action} on {resource}")
            }
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::StateConflict {
                entity,
                entity_id,
                current,
                attempted,
            } => write!(
                f,
                "Cannot move {entity} {entity_id} from {current} to {attempted}"
            ),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(domain) => Self::Validation(domain.to_string()),
            CoreError::StateConflict {
                entity,
                entity_id,
                current,
                attempted,
            } => Self::StateConflict {
                entity,
                entity_id,
                current,
                attempted,
            },
        }
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        Self::Forbidden {
            resource: denied.resource.as_str(),
            action: denied.action.as_str(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(what) => Self::NotFound(what),
            other => Self::Internal(other.to_string()),
        }
    }
}
