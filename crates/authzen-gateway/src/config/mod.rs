//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use authzen_core::error::{AuthzenError, Result};

pub use schema::{Effect, ExtAuthzSection, GatewayConfig, GatewaySection, SeedPolicy};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "AUTHZEN_CONFIG";
/// Config file used when `AUTHZEN_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "authzen.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AuthzenError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| AuthzenError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Path from `AUTHZEN_CONFIG`, falling back to `authzen.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
