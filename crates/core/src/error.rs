// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agrisure_domain::DomainError;

/// Errors that can occur during lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// An attempted transition violates the entity's state machine.
    ///
    /// Carries the current state so callers can resync their view.
    StateConflict {
        /// The entity kind ("quotation", "claim", "invoice").
        entity: &'static str,
        /// The entity identifier.
        entity_id: i64,
        /// The entity's current status.
        current: String,
        /// The status the caller attempted to reach.
        attempted: &'static str,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::StateConflict {
                entity,
                entity_id,
                current,
                attempted,
            } => {
                write!(
                    f,
                    "Cannot move {entity} {entity_id} from {current} to {attempted}"
                )
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
