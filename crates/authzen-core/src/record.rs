//! Policy record model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One (subject, resource, action) -> effect entry.
///
/// Identifiers are opaque exact-match strings (`"user:alice"`, `"document:123"`,
/// `"read"`). Records are never mutated after they enter the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub subject: String,
    pub resource: String,
    pub action: String,
    /// `true` = allow, `false` = explicit deny.
    pub effect: bool,
}

impl PolicyRecord {
    pub fn new(
        subject: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
        effect: bool,
    ) -> Self {
        Self {
            subject: subject.into(),
            resource: resource.into(),
            action: action.into(),
            effect,
        }
    }

    /// Exact match on all three identifiers.
    pub fn matches(&self, subject: &str, resource: &str, action: &str) -> bool {
        self.subject == subject && self.resource == resource && self.action == action
    }
}

impl fmt::Display for PolicyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decision = if self.effect { "ALLOW" } else { "DENY" };
        write!(
            f,
            "{} -> {} -> {}: {}",
            self.subject, self.resource, self.action, decision
        )
    }
}
