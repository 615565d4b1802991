//! AuthZEN core: policy records, the in-memory policy store, the decision
//! engine, and the wire-level request/response contracts.
//!
//! This crate carries no transport or runtime dependencies. The gateway crate
//! wraps it in HTTP adapters; tests and embedders can drive the engine
//! directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `AuthzenError`/`Result`, and malformed but
//! structurally valid input (empty identifiers included) simply fails to match.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod engine;
pub mod error;
pub mod protocol;
pub mod record;
pub mod store;

/// Shared result type.
pub use error::{AuthzenError, Result};

pub use engine::{
    BatchItem, Decision, DecisionEngine, DecisionResult, EvaluationSemantic, DENY_REASON,
};
pub use record::PolicyRecord;
pub use store::PolicyStore;
