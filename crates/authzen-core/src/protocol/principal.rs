//! Principal-shaped request variant (`/v1/authorize`, `/v1/evaluations`,
//! `/v1/search/*`).
//!
//! Same engine, different field names: `principal` instead of `subject`,
//! untyped entity ids, bare-string actions, and a top-level `semantic`.

use serde::{Deserialize, Serialize};

use crate::engine::{BatchItem, Decision, DecisionResult, EvaluationSemantic};
use crate::error::{AuthzenError, Result};

use super::access::Page;
use super::{Context, Properties};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Principal {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Option<Properties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrincipalResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Option<Properties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizeRequest {
    #[serde(default)]
    pub principal: Principal,
    #[serde(default)]
    pub resource: PrincipalResource,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub context: Option<Context>,
}

impl AuthorizeRequest {
    pub fn validate(&self) -> Result<()> {
        if self.principal.id.is_empty() {
            return Err(AuthzenError::BadRequest("principal id is required".into()));
        }
        if self.resource.id.is_empty() {
            return Err(AuthzenError::BadRequest("resource id is required".into()));
        }
        if self.action.is_empty() {
            return Err(AuthzenError::BadRequest("action is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizeResponse {
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<DecisionResult> for AuthorizeResponse {
    fn from(r: DecisionResult) -> Self {
        Self {
            decision: r.decision,
            reason: r.reason.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrincipalEvaluationItem {
    #[serde(default)]
    pub resource: PrincipalResource,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrincipalEvaluationsRequest {
    #[serde(default)]
    pub principal: Principal,
    #[serde(default)]
    pub context: Option<Context>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub evaluations: Vec<PrincipalEvaluationItem>,
    #[serde(default)]
    pub semantic: Option<String>,
}

impl PrincipalEvaluationsRequest {
    pub fn validate(&self) -> Result<()> {
        if self.principal.id.is_empty() {
            return Err(AuthzenError::BadRequest("principal id is required".into()));
        }
        if self.evaluations.is_empty() {
            return Err(AuthzenError::BadRequest(
                "at least one evaluation is required".into(),
            ));
        }
        for (i, item) in self.evaluations.iter().enumerate() {
            if item.resource.id.is_empty() {
                return Err(AuthzenError::BadRequest(format!(
                    "resource id is required for evaluation {i}"
                )));
            }
        }
        for (index, item) in self.batch_items().iter().enumerate() {
            if item.effective_action(self.action.as_deref()).is_none() {
                return Err(AuthzenError::MissingAction { index });
            }
        }
        self.semantic().map(|_| ())
    }

    pub fn semantic(&self) -> Result<EvaluationSemantic> {
        EvaluationSemantic::parse(self.semantic.as_deref())
    }

    pub fn batch_items(&self) -> Vec<BatchItem<'_>> {
        self.evaluations
            .iter()
            .map(|e| BatchItem::new(&e.resource.id, e.action.as_deref()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrincipalEvaluationsResponse {
    pub evaluations: Vec<AuthorizeResponse>,
}

impl FromIterator<DecisionResult> for PrincipalEvaluationsResponse {
    fn from_iter<I: IntoIterator<Item = DecisionResult>>(iter: I) -> Self {
        Self {
            evaluations: iter.into_iter().map(AuthorizeResponse::from).collect(),
        }
    }
}

// --------------------
// Search
// --------------------

/// Which principals may perform `action` on `resource`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrincipalSubjectSearchRequest {
    #[serde(default)]
    pub resource: PrincipalResource,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub context: Option<Context>,
}

impl PrincipalSubjectSearchRequest {
    pub fn validate(&self) -> Result<()> {
        if self.resource.id.is_empty() {
            return Err(AuthzenError::BadRequest("resource id is required".into()));
        }
        if self.action.is_empty() {
            return Err(AuthzenError::BadRequest("action is required".into()));
        }
        Ok(())
    }
}

/// Which resources `principal` may perform `action` on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrincipalResourceSearchRequest {
    #[serde(default)]
    pub principal: Principal,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub context: Option<Context>,
}

impl PrincipalResourceSearchRequest {
    pub fn validate(&self) -> Result<()> {
        if self.principal.id.is_empty() {
            return Err(AuthzenError::BadRequest("principal id is required".into()));
        }
        if self.action.is_empty() {
            return Err(AuthzenError::BadRequest("action is required".into()));
        }
        Ok(())
    }
}

/// Which actions `principal` may perform on `resource`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrincipalActionSearchRequest {
    #[serde(default)]
    pub principal: Principal,
    #[serde(default)]
    pub resource: PrincipalResource,
    #[serde(default)]
    pub context: Option<Context>,
}

impl PrincipalActionSearchRequest {
    pub fn validate(&self) -> Result<()> {
        if self.principal.id.is_empty() {
            return Err(AuthzenError::BadRequest("principal id is required".into()));
        }
        if self.resource.id.is_empty() {
            return Err(AuthzenError::BadRequest("resource id is required".into()));
        }
        Ok(())
    }
}

/// One search hit: an untyped entity id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub id: String,
}

/// Principal and resource search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrincipalSearchResponse {
    pub results: Vec<EntityRef>,
    pub page: Page,
}

impl FromIterator<String> for PrincipalSearchResponse {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().map(|id| EntityRef { id }).collect(),
            page: Page::default(),
        }
    }
}

/// Action search results are bare action names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrincipalActionSearchResponse {
    pub results: Vec<String>,
    pub page: Page,
}

impl From<Vec<String>> for PrincipalActionSearchResponse {
    fn from(results: Vec<String>) -> Self {
        Self {
            results,
            page: Page::default(),
        }
    }
}
