//! Top-level facade crate for the AuthZEN policy decision point.
//!
//! Re-exports the core engine and the gateway library so users can depend on a single crate.

pub mod core {
    pub use authzen_core::*;
}

pub mod gateway {
    pub use authzen_gateway::*;
}
