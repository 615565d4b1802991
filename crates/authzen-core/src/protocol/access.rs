//! AuthZEN Authorization API request/response shapes.
//!
//! Missing identifier fields deserialize as empty strings so that `validate`
//! (not serde) reports what is absent.

use serde::{Deserialize, Serialize};

use crate::engine::{BatchItem, Decision, DecisionResult, EvaluationSemantic};
use crate::error::{AuthzenError, Result};

use super::{paths, split_typed, Context, Properties};

/// A principal (user or machine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl Subject {
    /// Render a stored identifier (`"user:alice"`) as a typed subject.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let (kind, _) = split_typed(identifier)?;
        Some(Self {
            kind: kind.to_string(),
            id: identifier.to_string(),
            properties: None,
        })
    }

    fn require_typed(&self) -> Result<()> {
        if self.kind.is_empty() || self.id.is_empty() {
            return Err(bad("subject type and id are required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl Resource {
    /// Render a stored identifier (`"document:123"`) as a typed resource.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let (kind, _) = split_typed(identifier)?;
        Some(Self {
            kind: kind.to_string(),
            id: identifier.to_string(),
            properties: None,
        })
    }

    fn is_complete(&self) -> bool {
        !self.kind.is_empty() && !self.id.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl Action {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: None,
        }
    }

    fn require_name(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(bad("action name is required"));
        }
        Ok(())
    }
}

// --------------------
// Single evaluation
// --------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub resource: Resource,
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub context: Option<Context>,
}

impl EvaluationRequest {
    pub fn validate(&self) -> Result<()> {
        self.subject.require_typed()?;
        if !self.resource.is_complete() {
            return Err(bad("resource type and id are required"));
        }
        self.action.require_name()
    }
}

/// `{"reason": "..."}` attached to DENY results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonContext {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResponse {
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ReasonContext>,
}

impl From<DecisionResult> for EvaluationResponse {
    fn from(r: DecisionResult) -> Self {
        Self {
            decision: r.decision,
            context: r.reason.map(|reason| ReasonContext {
                reason: reason.to_string(),
            }),
        }
    }
}

// --------------------
// Batch evaluation
// --------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationItem {
    #[serde(default)]
    pub resource: Resource,
    #[serde(default)]
    pub action: Option<Action>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationOptions {
    #[serde(default)]
    pub evaluations_semantic: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationsRequest {
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub context: Option<Context>,
    #[serde(default)]
    pub evaluations: Vec<EvaluationItem>,
    #[serde(default)]
    pub options: EvaluationOptions,
}

impl EvaluationsRequest {
    pub fn validate(&self) -> Result<()> {
        self.subject.require_typed()?;
        if self.evaluations.is_empty() {
            return Err(bad("at least one evaluation is required"));
        }
        for (i, item) in self.evaluations.iter().enumerate() {
            if !item.resource.is_complete() {
                return Err(AuthzenError::BadRequest(format!(
                    "resource type and id are required for evaluation {i}"
                )));
            }
        }
        for (index, item) in self.batch_items().iter().enumerate() {
            if item.effective_action(self.shared_action()).is_none() {
                return Err(AuthzenError::MissingAction { index });
            }
        }
        self.semantic().map(|_| ())
    }

    pub fn semantic(&self) -> Result<EvaluationSemantic> {
        EvaluationSemantic::parse(self.options.evaluations_semantic.as_deref())
    }

    pub fn shared_action(&self) -> Option<&str> {
        self.action.as_ref().map(|a| a.name.as_str())
    }

    pub fn batch_items(&self) -> Vec<BatchItem<'_>> {
        self.evaluations
            .iter()
            .map(|e| BatchItem::new(&e.resource.id, e.action.as_ref().map(|a| a.name.as_str())))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationsResponse {
    pub evaluations: Vec<EvaluationResponse>,
}

impl FromIterator<DecisionResult> for EvaluationsResponse {
    fn from_iter<I: IntoIterator<Item = DecisionResult>>(iter: I) -> Self {
        Self {
            evaluations: iter.into_iter().map(EvaluationResponse::from).collect(),
        }
    }
}

// --------------------
// Search
// --------------------

/// Pagination cursor. Results are always returned as a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub resource: Resource,
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub context: Option<Context>,
    #[serde(default)]
    pub page: Option<Page>,
}

/// Subject search: which subjects may perform `action` on `resource`.
pub type SubjectSearchRequest = SearchRequest;
/// Resource search: which resources may `subject` perform `action` on.
pub type ResourceSearchRequest = SearchRequest;
/// Action search: which actions may `subject` perform on `resource`.
pub type ActionSearchRequest = SearchRequest;

impl SearchRequest {
    pub fn validate_subject_search(&self) -> Result<()> {
        if self.subject.kind.is_empty() {
            return Err(bad("subject type is required"));
        }
        if !self.resource.is_complete() {
            return Err(bad("resource type and id are required"));
        }
        self.action.require_name()
    }

    pub fn validate_resource_search(&self) -> Result<()> {
        self.subject.require_typed()?;
        if self.resource.kind.is_empty() {
            return Err(bad("resource type is required"));
        }
        self.action.require_name()
    }

    pub fn validate_action_search(&self) -> Result<()> {
        self.subject.require_typed()?;
        if !self.resource.is_complete() {
            return Err(bad("resource type and id are required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse<T> {
    pub results: Vec<T>,
    pub page: Page,
}

pub type SubjectSearchResponse = SearchResponse<Subject>;
pub type ResourceSearchResponse = SearchResponse<Resource>;
pub type ActionSearchResponse = SearchResponse<Action>;

impl SubjectSearchResponse {
    /// Identifiers without a `type:` prefix cannot be rendered and are skipped.
    pub fn from_identifiers(ids: &[String]) -> Self {
        Self {
            results: ids.iter().filter_map(|id| Subject::from_identifier(id)).collect(),
            page: Page::default(),
        }
    }
}

impl ResourceSearchResponse {
    /// Identifiers without a `type:` prefix cannot be rendered and are skipped.
    pub fn from_identifiers(ids: &[String]) -> Self {
        Self {
            results: ids.iter().filter_map(|id| Resource::from_identifier(id)).collect(),
            page: Page::default(),
        }
    }
}

impl ActionSearchResponse {
    pub fn from_names(names: Vec<String>) -> Self {
        Self {
            results: names.into_iter().map(Action::named).collect(),
            page: Page::default(),
        }
    }
}

// --------------------
// Well-known metadata
// --------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataResponse {
    pub policy_decision_point: String,
    pub access_evaluation_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_evaluations_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_subject_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_resource_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_action_endpoint: Option<String>,
}

impl MetadataResponse {
    pub fn for_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let at = |path: &str| format!("{base}{path}");
        Self {
            policy_decision_point: base.to_string(),
            access_evaluation_endpoint: at(paths::EVALUATION),
            access_evaluations_endpoint: Some(at(paths::EVALUATIONS)),
            search_subject_endpoint: Some(at(paths::SEARCH_SUBJECT)),
            search_resource_endpoint: Some(at(paths::SEARCH_RESOURCE)),
            search_action_endpoint: Some(at(paths::SEARCH_ACTION)),
        }
    }
}

fn bad(msg: &str) -> AuthzenError {
    AuthzenError::BadRequest(msg.to_string())
}
