//! AuthZEN gateway library entry.
//!
//! Wires config, shared state (policy store + decision engine), HTTP transport
//! adapters, and operational endpoints into one axum router. Consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod transport;
