// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod claim;
mod error;
mod invoice;
mod permission;
mod quotation;
mod sync;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use claim::{
    AssignmentOutcome, approve_claim, assign_assessor, create_claim, mark_claim_paid, reject_claim,
};
pub use error::CoreError;
pub use invoice::{approve_invoice, reject_invoice, settle_invoice};
pub use permission::{AccessDenied, authorize, system_roles};
pub use quotation::{create_quotation, mark_paid, write_policy};
pub use sync::{ConflictResolution, SyncConflict, SyncEntity, detect_conflicts, parse_last_sync};
