use std::net::SocketAddr;

use axum::http::HeaderName;
use serde::Deserialize;

use authzen_core::error::{AuthzenError, Result};
use authzen_core::PolicyRecord;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub ext_authz: ExtAuthzSection,

    /// Seed records, appended to the store in file order.
    #[serde(default)]
    pub policies: Vec<SeedPolicy>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AuthzenError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.ext_authz.validate()?;

        for (i, p) in self.policies.iter().enumerate() {
            p.validate(i)?;
        }

        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            ext_authz: ExtAuthzSection::default(),
            policies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Public origin advertised in the well-known configuration document.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            base_url: default_base_url(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AuthzenError::BadRequest(
                "gateway.base_url must start with http:// or https://".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            AuthzenError::BadRequest(format!(
                "gateway.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_base_url() -> String {
    "http://localhost:8080".into()
}

/// HTTP-mode external authorization (proxy forwards method/path/headers).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtAuthzSection {
    /// Header carrying the caller's subject identifier (lowercase).
    #[serde(default = "default_user_header")]
    pub user_header: String,

    /// Prepended to the forwarded path to form the resource identifier.
    #[serde(default = "default_resource_prefix")]
    pub resource_prefix: String,
}

impl Default for ExtAuthzSection {
    fn default() -> Self {
        Self {
            user_header: default_user_header(),
            resource_prefix: default_resource_prefix(),
        }
    }
}

impl ExtAuthzSection {
    pub fn validate(&self) -> Result<()> {
        self.header_name().map(|_| ())
    }

    pub fn header_name(&self) -> Result<HeaderName> {
        HeaderName::from_lowercase(self.user_header.as_bytes()).map_err(|_| {
            AuthzenError::BadRequest(format!(
                "ext_authz.user_header is not a valid lowercase header name: {}",
                self.user_header
            ))
        })
    }
}

fn default_user_header() -> String {
    "x-user-id".into()
}
fn default_resource_prefix() -> String {
    "resource:".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedPolicy {
    pub subject: String,
    pub resource: String,
    pub action: String,
    pub effect: Effect,
}

impl SeedPolicy {
    fn validate(&self, index: usize) -> Result<()> {
        if self.subject.is_empty() || self.resource.is_empty() || self.action.is_empty() {
            return Err(AuthzenError::BadRequest(format!(
                "policies[{index}]: subject, resource and action must not be empty"
            )));
        }
        Ok(())
    }

    pub fn to_record(&self) -> PolicyRecord {
        PolicyRecord::new(
            self.subject.clone(),
            self.resource.clone(),
            self.action.clone(),
            self.effect == Effect::Allow,
        )
    }
}
