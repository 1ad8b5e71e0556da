// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Offline-sync reconciliation primitives.
//!
//! The persistence layer applies uploads and computes server-side deltas;
//! this module owns the pure parts: last-sync parsing and conflict
//! detection. Conflicts are resolved with a fixed server-wins policy; the
//! server's version is authoritative and rides back in the delta set.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// The entity kinds that participate in mobile synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncEntity {
    /// Farmer identity records.
    Farmers,
    /// Farms.
    Farms,
    /// Quotations.
    Quotations,
    /// Claims.
    Claims,
}

impl SyncEntity {
    /// Returns the key used in sync payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Farmers => "farmers",
            Self::Farms => "farms",
            Self::Quotations => "quotations",
            Self::Claims => "claims",
        }
    }
}

/// The fixed conflict-resolution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    /// The server's version is authoritative.
    ServerWins,
}

impl ConflictResolution {
    /// Returns the string reported to clients.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ServerWins => "server_wins",
        }
    }
}

/// A record modified both by the client batch and server-side since the
/// client's last sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConflict {
    /// The entity kind.
    pub entity: SyncEntity,
    /// The server-assigned identifier.
    pub entity_id: i64,
    /// How the conflict was resolved.
    pub resolution: ConflictResolution,
}

/// Parses a client's last-sync timestamp.
///
/// Absent or unparseable timestamps fall back to the epoch minimum, which
/// makes the delta query return everything the caller can see.
#[must_use]
pub fn parse_last_sync(raw: Option<&str>) -> OffsetDateTime {
    raw.and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok())
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Flags identifiers present in both the uploaded batch and the server-side
/// delta set.
///
/// Both sets are small per-request batches; a linear scan is fine.
#[must_use]
pub fn detect_conflicts(
    entity: SyncEntity,
    uploaded_ids: &[i64],
    server_delta_ids: &[i64],
) -> Vec<SyncConflict> {
    uploaded_ids
        .iter()
        .filter(|id| server_delta_ids.contains(id))
        .map(|&entity_id| SyncConflict {
            entity,
            entity_id,
            resolution: ConflictResolution::ServerWins,
        })
        .collect()
}
