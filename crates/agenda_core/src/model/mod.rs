//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and the raw form input shape.
//! - Own field validation and normalization rules.
//!
//! # Invariants
//! - Store-assigned fields (`id`, `created_at`) never come from callers.
//! - A normalized draft satisfies every field rule at construction time.

pub mod contact;
