//! Decision engine: single decisions, batch evaluation, and reverse-lookup
//! search over a shared [`PolicyStore`].
//!
//! Matching is exact and first-match-wins in insertion order; no match means
//! DENY. Search only ever reports allow records.
//!
//! Consistency: a batch or search call is not an atomic snapshot. Each batch
//! item takes its own read guard, so an `add_policy` running concurrently may
//! become visible between two items of the same batch.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{AuthzenError, Result};
use crate::protocol::Context;
use crate::record::PolicyRecord;
use crate::store::PolicyStore;

/// Reason attached to every DENY result.
pub const DENY_REASON: &str = "Access denied by policy";

/// Outcome of evaluating one (subject, resource, action) query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn from_effect(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    pub fn is_allow(self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::Deny => "DENY",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision plus the reason, which is present only for DENY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionResult {
    pub decision: Decision,
    pub reason: Option<&'static str>,
}

impl DecisionResult {
    pub fn from_effect(allowed: bool) -> Self {
        let decision = Decision::from_effect(allowed);
        Self {
            decision,
            reason: (!decision.is_allow()).then_some(DENY_REASON),
        }
    }

    pub fn is_allow(&self) -> bool {
        self.decision.is_allow()
    }
}

/// Short-circuit policy for batch evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvaluationSemantic {
    /// Evaluate every item.
    #[default]
    ExecuteAll,
    /// Stop right after the first DENY result is appended.
    DenyOnFirstDeny,
    /// Stop right after the first ALLOW result is appended.
    PermitOnFirstPermit,
}

impl EvaluationSemantic {
    /// Parse the optional wire value. Absent or empty selects `execute_all`;
    /// anything unrecognized is rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            None | Some("") => Ok(Self::default()),
            Some(s) => s.parse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationSemantic::ExecuteAll => "execute_all",
            EvaluationSemantic::DenyOnFirstDeny => "deny_on_first_deny",
            EvaluationSemantic::PermitOnFirstPermit => "permit_on_first_permit",
        }
    }

    /// Whether evaluation stops after appending `result`.
    fn stops_after(self, result: &DecisionResult) -> bool {
        match self {
            EvaluationSemantic::ExecuteAll => false,
            EvaluationSemantic::DenyOnFirstDeny => !result.is_allow(),
            EvaluationSemantic::PermitOnFirstPermit => result.is_allow(),
        }
    }
}

impl FromStr for EvaluationSemantic {
    type Err = AuthzenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "execute_all" => Ok(EvaluationSemantic::ExecuteAll),
            "deny_on_first_deny" => Ok(EvaluationSemantic::DenyOnFirstDeny),
            "permit_on_first_permit" => Ok(EvaluationSemantic::PermitOnFirstPermit),
            other => Err(AuthzenError::InvalidSemantic(other.to_string())),
        }
    }
}

/// One batch entry. `action` falls back to the batch-level shared action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchItem<'a> {
    pub resource: &'a str,
    pub action: Option<&'a str>,
}

impl<'a> BatchItem<'a> {
    pub fn new(resource: &'a str, action: Option<&'a str>) -> Self {
        Self { resource, action }
    }

    /// Own action if non-empty, else the shared one if non-empty.
    pub fn effective_action(&self, shared_action: Option<&'a str>) -> Option<&'a str> {
        self.action
            .filter(|a| !a.is_empty())
            .or_else(|| shared_action.filter(|a| !a.is_empty()))
    }
}

/// Stateless decision logic over an injected store.
/// Construct once at startup, then share via Arc.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    store: Arc<PolicyStore>,
}

impl DecisionEngine {
    pub fn new(store: Arc<PolicyStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<PolicyStore> {
        &self.store
    }

    /// Effect of the first record matching the triple exactly; `false` when
    /// nothing matches.
    pub fn check_policy(&self, subject: &str, resource: &str, action: &str) -> bool {
        let allowed = self.store.with_records(|records| {
            records
                .iter()
                .find(|p| p.matches(subject, resource, action))
                .map(|p| p.effect)
                .unwrap_or(false)
        });
        tracing::debug!(%subject, %resource, %action, allowed, "policy checked");
        allowed
    }

    /// [`check_policy`](Self::check_policy) rendered as a decision result.
    pub fn decide(&self, subject: &str, resource: &str, action: &str) -> DecisionResult {
        DecisionResult::from_effect(self.check_policy(subject, resource, action))
    }

    /// Evaluate `items` in order for one subject.
    ///
    /// Every item's effective action is resolved before anything is evaluated,
    /// so a missing action rejects the whole batch. The returned sequence is
    /// always a prefix of what `execute_all` would produce. The shared context
    /// is accepted for protocol parity; matching never consults it.
    pub fn evaluate_batch(
        &self,
        subject: &str,
        shared_action: Option<&str>,
        shared_context: Option<&Context>,
        items: &[BatchItem<'_>],
        semantic: EvaluationSemantic,
    ) -> Result<Vec<DecisionResult>> {
        let queries = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.effective_action(shared_action)
                    .map(|action| (item.resource, action))
                    .ok_or(AuthzenError::MissingAction { index })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            %subject,
            items = queries.len(),
            semantic = semantic.as_str(),
            has_context = shared_context.is_some(),
            "batch evaluation started"
        );

        let mut out = Vec::with_capacity(queries.len());
        for (index, (resource, action)) in queries.into_iter().enumerate() {
            let result = self.decide(subject, resource, action);
            out.push(result);
            if semantic.stops_after(&result) {
                tracing::debug!(
                    index,
                    decision = %result.decision,
                    semantic = semantic.as_str(),
                    "batch short-circuited"
                );
                break;
            }
        }
        Ok(out)
    }

    /// Subjects allowed to perform `action` on `resource`.
    pub fn find_subjects_for_resource(&self, resource: &str, action: &str) -> Vec<String> {
        let out = self.collect_allowed(|p| {
            (p.resource == resource && p.action == action).then_some(p.subject.as_str())
        });
        tracing::trace!(%resource, %action, results = out.len(), "subject search");
        out
    }

    /// Resources `subject` may perform `action` on.
    pub fn find_resources_for_subject(&self, subject: &str, action: &str) -> Vec<String> {
        let out = self.collect_allowed(|p| {
            (p.subject == subject && p.action == action).then_some(p.resource.as_str())
        });
        tracing::trace!(%subject, %action, results = out.len(), "resource search");
        out
    }

    /// Actions `subject` may perform on `resource`.
    pub fn find_actions_for_subject_and_resource(
        &self,
        subject: &str,
        resource: &str,
    ) -> Vec<String> {
        let out = self.collect_allowed(|p| {
            (p.subject == subject && p.resource == resource).then_some(p.action.as_str())
        });
        tracing::trace!(%subject, %resource, results = out.len(), "action search");
        out
    }

    /// Scan allow records in insertion order, keep the identifier `pick`
    /// selects, and drop repeats (first occurrence keeps its position).
    fn collect_allowed<F>(&self, pick: F) -> Vec<String>
    where
        F: for<'r> Fn(&'r PolicyRecord) -> Option<&'r str>,
    {
        self.store.with_records(|records| {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut out = Vec::new();
            for p in records.iter().filter(|p| p.effect) {
                if let Some(id) = pick(p) {
                    if seen.insert(id) {
                        out.push(id.to_string());
                    }
                }
            }
            out
        })
    }
}
