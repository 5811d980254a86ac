//! Repository layer abstractions and store implementations.
//!
//! # Responsibility
//! - Define the keyed-store contract consumed by business orchestration.
//! - Isolate SQLite query details from the service layer.
//!
//! # Invariants
//! - Stores assign `id` and `created_at`; callers never supply them.
//! - `create` detects an email collision atomically with the insert.
//! - Listing order is `created_at` descending, newest insertion first on
//!   equal timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod contact_repo;
pub mod memory_repo;

/// Current wall-clock time in epoch milliseconds.
///
/// A clock before the Unix epoch yields 0 instead of failing; creation
/// timestamps are ordering keys, not audit data.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
