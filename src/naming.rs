//! Object key derivation for uploaded files.
//!
//! Client filenames are untrusted. Before a file is stored its name is
//! restricted to `[A-Za-z0-9_.-]` and prefixed with the UTC upload time:
//!
//! ```text
//! "bug report!!.png" at 2024-01-02T03:04:05Z  ->  "20240102T030405-bug_report__.png"
//! ```
//!
//! Keys are only unique per second: two uploads of the same sanitized name
//! within one second map to the same key and the later one wins.

use chrono::{DateTime, Utc};

/// Timestamp layout used for key prefixes (`YYYYMMDDTHHMMSS`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Replacement for characters outside the allowed set.
const REPLACEMENT: char = '_';

#[inline]
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
///
/// The output has exactly as many characters as the input.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if is_allowed(c) { c } else { REPLACEMENT })
        .collect()
}

/// Build the storage key for `name` uploaded at `now`.
pub fn timestamp_prefix(name: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", now.format(TIMESTAMP_FORMAT), sanitize(name))
}

// =============================================================================
// Clock
// =============================================================================

/// Source of the current time for key derivation.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
