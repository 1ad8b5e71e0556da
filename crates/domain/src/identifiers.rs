// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Generated, date-scoped human-readable identifiers.
//!
//! Policy numbers reuse the quotation's own primary key
//! (`POL-YYYYMMDD-<quotation_id>`); claim numbers carry a per-day sequence
//! (`CLM-YYYYMMDD-NNNNNN`). The asymmetry is deliberate and matches the
//! numbers already in circulation.
//!
//! Claim-number derivation is read-then-increment over the highest suffix
//! issued under today's prefix. On its own that races under concurrency; the
//! persistence layer closes the race with a UNIQUE constraint on
//! `claim_number` and a bounded re-derive-and-retry loop.

use time::Date;
use time::macros::format_description;

/// The textual prefix of every policy number.
pub const POLICY_NUMBER_PREFIX: &str = "POL";

/// The textual prefix of every claim number.
pub const CLAIM_NUMBER_PREFIX: &str = "CLM";

/// Width of the zero-padded claim sequence suffix.
const CLAIM_SEQUENCE_WIDTH: usize = 6;

/// Formats a date as the `YYYYMMDD` stamp used in identifiers.
fn date_stamp(date: Date) -> String {
    // The format description is infallible for a valid Date.
    date.format(format_description!("[year][month][day]"))
        .unwrap_or_default()
}

/// Builds the permanent policy number for a written quotation.
///
/// Policy numbers use the quotation's own primary key rather than a separate
/// counter, so they are unique by construction.
#[must_use]
pub fn policy_number(date: Date, quotation_id: i64) -> String {
    format!("{POLICY_NUMBER_PREFIX}-{}-{quotation_id}", date_stamp(date))
}

/// Returns today's claim-number prefix, e.g. `CLM-20260823`.
#[must_use]
pub fn claim_number_prefix(date: Date) -> String {
    format!("{CLAIM_NUMBER_PREFIX}-{}", date_stamp(date))
}

/// Derives the next claim number for a day from the most recently issued one.
///
/// `last_issued` is the latest existing claim number matching today's prefix,
/// in descending creation order, or `None` when no claim has been filed
/// today. The trailing numeric suffix is parsed and incremented; when absent
/// or unparseable the sequence restarts at 1.
#[must_use]
pub fn next_claim_number(date: Date, last_issued: Option<&str>) -> String {
    let next: u64 = last_issued
        .and_then(|number| number.rsplit('-').next())
        .and_then(|suffix| suffix.parse::<u64>().ok())
        .map_or(1, |last| last + 1);
    format!(
        "{}-{next:0width$}",
        claim_number_prefix(date),
        width = CLAIM_SEQUENCE_WIDTH
    )
}
