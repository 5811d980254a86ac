//! Business rules and response shaping.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level operations.
//! - Convert every outcome into the uniform response envelope.
//!
//! # Invariants
//! - Repository errors never cross the service boundary unconverted.

pub mod contact_service;
