//! Flutter-facing bindings for the KidCard core.
//!
//! # Responsibility
//! - Expose the core profile and export use-cases to Dart via FRB.
//!
//! # Invariants
//! - No function in this crate panics across the FFI boundary.

pub mod api;
