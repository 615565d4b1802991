//! Wire-level contracts (JSON).
//!
//! - `access`: AuthZEN Authorization API shapes (evaluation, evaluations,
//!   search, well-known metadata).
//! - `principal`: the principal-shaped variant (`/v1/*`). Only field
//!   naming differs; both feed the same engine.

pub mod access;
pub mod principal;

use serde_json::{Map, Value};

/// Free-form request context object.
pub type Context = Map<String, Value>;

/// Free-form entity properties/attributes.
pub type Properties = Map<String, Value>;

/// Route paths, shared by the router and the metadata document.
pub mod paths {
    pub const METADATA: &str = "/.well-known/authzen-configuration";
    pub const EVALUATION: &str = "/access/v1/evaluation";
    pub const EVALUATIONS: &str = "/access/v1/evaluations";
    pub const SEARCH_SUBJECT: &str = "/access/v1/search/subject";
    pub const SEARCH_RESOURCE: &str = "/access/v1/search/resource";
    pub const SEARCH_ACTION: &str = "/access/v1/search/action";
    pub const AUTHORIZE: &str = "/v1/authorize";
    pub const PRINCIPAL_EVALUATIONS: &str = "/v1/evaluations";
    pub const PRINCIPAL_SEARCH_SUBJECT: &str = "/v1/search/subject";
    pub const PRINCIPAL_SEARCH_RESOURCE: &str = "/v1/search/resource";
    pub const PRINCIPAL_SEARCH_ACTION: &str = "/v1/search/action";
    pub const POLICIES: &str = "/v1/policies";
}

/// Split `"type:rest"` at the first `:`. Identifiers without a type prefix
/// return `None`.
pub fn split_typed(identifier: &str) -> Option<(&str, &str)> {
    identifier.split_once(':')
}
