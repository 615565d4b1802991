//! Transport adapters (HTTP).
//!
//! Each adapter extracts (subject, resource, action) from its envelope, calls
//! the decision engine, and renders the decision in its own shape.

pub mod access;
pub mod error;
pub mod ext_authz;
pub mod principal;
