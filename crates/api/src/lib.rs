// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The application service layer.
//!
//! Handlers take an authenticated [`Principal`], check permissions through
//! the evaluator, run the pure transition functions, and commit through the
//! store's conditional updates. A commit that affects zero rows means
//! another writer advanced the record first; the handler re-reads and
//! reports the fresh state as a conflict. Everything is framed in DTOs so
//! the transport layer never touches domain entities directly.

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
#![allow(clippy::multiple_crate_versions)]

pub mod auth;
pub mod claims;
pub mod dto;
mod error;
pub mod invoices;
pub mod notifications;
pub mod quotations;
pub mod registry;
pub mod roles;
pub mod sync;

#[cfg(test)]
mod tests;

pub use auth::{LoginOutcome, Principal, authenticate, login, logout};
pub use error::ApiError;
