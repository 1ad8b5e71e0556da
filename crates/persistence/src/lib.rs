// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite persistence for the Agrisure insurance platform.
//!
//! A single `Store` owns the connection. Status transitions are committed
//! with compare-and-set updates on the expected prior state, so a lost race
//! shows up as zero affected rows instead of a double transition; bulk
//! settlement uses conditional set-filtered updates for the same reason.

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

mod accounts;
mod claims;
mod error;
mod invoices;
mod notifications;
mod quotations;
mod records;
mod registry;
mod schema;
mod seed;
mod sync;

#[cfg(test)]
mod tests;

use rusqlite::Connection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

pub use accounts::verify_password;
pub use error::PersistenceError;
pub use records::{SessionRecord, StatusTotal, UserRecord};
pub use sync::SyncDeltas;

/// Atomic counter for generating unique in-memory database names, so tests
/// are isolated without time-based collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Creates a store backed by a fresh in-memory database, with the schema
    /// initialized and default data seeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let url: String = format!("file:agrisure_mem_{db_id}?mode=memory&cache=shared");

        let conn: Connection = Connection::open(&url)
            .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;
        Self::initialize(conn)
    }

    /// Creates a store backed by a file database, enabling WAL mode for
    /// better read concurrency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open(path.as_ref())
            .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, PersistenceError> {
        schema::initialize_schema(&conn)?;

        let store: Self = Self { conn };
        store.verify_foreign_key_enforcement()?;
        store.seed_defaults()?;
        Ok(store)
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&self) -> Result<(), PersistenceError> {
        let enabled: i64 =
            self.conn
                .query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
        if enabled == 1 {
            Ok(())
        } else {
            Err(PersistenceError::ForeignKeyEnforcementNotEnabled)
        }
    }
}
