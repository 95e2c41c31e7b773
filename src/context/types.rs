//! Core context type definitions.
//!
//! Defines [`Priority`] (the urgency classification), [`Context`] (a full record),
//! and [`ContextError`] (the repository error taxonomy).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Urgency classification attached to a context, consumed by instruction generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait; never carries an urgency marker.
    Low,
    /// The default when the caller does not specify one.
    #[default]
    Medium,
    /// Prefixes generated instructions with an urgency marker.
    High,
}

impl Priority {
    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("unknown priority: {s}. Expected low, medium, or high")),
        }
    }
}

/// A context record, matching the `contexts` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// UUID v7 (time-sortable) surrogate key; stable across replaces.
    pub id: String,
    /// Namespace scoping the key, typically a working-directory name.
    pub project: String,
    /// Caller-supplied identifier, unique within the project.
    pub key: String,
    /// The full text payload.
    pub content: String,
    /// Bounded digest, present only when the content exceeds the summary threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Normalized tag set: lowercase, trimmed, deduplicated, sorted.
    pub tags: Vec<String>,
    pub priority: Priority,
    /// ISO 8601 creation timestamp, set once at first insert.
    pub created_at: String,
    /// ISO 8601 last-modification timestamp, bumped on every create-or-replace.
    pub updated_at: String,
}

/// Errors returned by repository operations.
///
/// Degraded embedding is not represented here: a provider failure is absorbed
/// into the write path (the record is stored without a vector) rather than
/// surfaced as an operation failure.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context not found: {project}/{key}")]
    NotFound { project: String, key: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Reject empty or whitespace-only identifier fields before any write occurs.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), ContextError> {
    if value.trim().is_empty() {
        return Err(ContextError::InvalidInput(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_round_trips_through_strings() {
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn unknown_priority_is_rejected() {
        assert!("urgent".parse::<Priority>().is_err());
        assert!("HIGH".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn require_non_empty_rejects_whitespace() {
        assert!(require_non_empty("key", "").is_err());
        assert!(require_non_empty("key", "   ").is_err());
        assert!(require_non_empty("key", "auth-pattern").is_ok());
    }
}
