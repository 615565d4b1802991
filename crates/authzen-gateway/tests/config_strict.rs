#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use authzen_core::AuthzenError;
use authzen_gateway::config::{self, Effect};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
policies:
  - subject: "user:alice"
    resource: "document:123"
    action: "read"
    efect: allow # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.gateway.base_url, "http://localhost:8080");
    assert_eq!(cfg.ext_authz.user_header, "x-user-id");
    assert_eq!(cfg.ext_authz.resource_prefix, "resource:");
    assert!(cfg.policies.is_empty());
}

#[test]
fn seed_policies_keep_file_order() {
    let ok = r#"
version: 1
policies:
  - { subject: "user:bob", resource: "document:123", action: "write", effect: deny }
  - { subject: "user:alice", resource: "document:123", action: "read", effect: allow }
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.policies.len(), 2);
    assert_eq!(cfg.policies[0].effect, Effect::Deny);
    assert!(!cfg.policies[0].to_record().effect);
    assert_eq!(cfg.policies[1].subject, "user:alice");
    assert!(cfg.policies[1].to_record().effect);
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err, AuthzenError::UnsupportedVersion);
}

#[test]
fn invalid_listen_address() {
    let bad = r#"
version: 1
gateway:
  listen: "localhost"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("gateway.listen"));
}

#[test]
fn base_url_needs_scheme() {
    let bad = r#"
version: 1
gateway:
  base_url: "pdp.example.com"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("gateway.base_url"));
}

#[test]
fn empty_seed_identifier_rejected() {
    let bad = r#"
version: 1
policies:
  - { subject: "user:alice", resource: "", action: "read", effect: allow }
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("policies[0]"));
}

#[test]
fn unknown_effect_rejected() {
    let bad = r#"
version: 1
policies:
  - { subject: "user:alice", resource: "doc", action: "read", effect: maybe }
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn invalid_user_header_rejected() {
    let bad = r#"
version: 1
ext_authz:
  user_header: "x user"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("ext_authz.user_header"));
}

#[test]
fn missing_file_is_internal() {
    let err = config::load_from_file("does-not-exist.yaml").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
}

#[test]
fn user_header_must_be_lowercase() {
    let bad = r#"
version: 1
ext_authz:
  user_header: "X-Principal"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("ext_authz.user_header"));

    let ok = r#"
version: 1
ext_authz:
  user_header: "x-principal"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.ext_authz.header_name().unwrap().as_str(), "x-principal");
}
