//! Read-time instruction generation.
//!
//! Maps a context's tag set and priority to a short usage directive for the
//! caller. Applied when a single context is returned; never stored, so the rule
//! table can evolve without touching persisted state.

use crate::context::types::Priority;

/// Rule table evaluated in declaration order; the first tag present wins.
const RULES: &[(&str, &str)] = &[
    (
        "architecture",
        "Apply this pattern consistently across the codebase.",
    ),
    (
        "todo",
        "Outstanding task — confirm completion before closing.",
    ),
    (
        "tech-debt",
        "Known limitation — evaluate before extending this area.",
    ),
    (
        "security",
        "Security-sensitive — verify before deploying related changes.",
    ),
];

const GENERIC: &str = "Stored context — apply as appropriate.";

const URGENCY_MARKER: &str = "[urgent]";

/// Build the usage directive for a context's tags and priority.
///
/// Only high priority carries the urgency marker.
pub fn instruction_for(tags: &[String], priority: Priority) -> String {
    let body = RULES
        .iter()
        .find(|(tag, _)| tags.iter().any(|t| t == tag))
        .map(|(_, text)| *text)
        .unwrap_or(GENERIC);

    match priority {
        Priority::High => format!("{URGENCY_MARKER} {body}"),
        Priority::Medium | Priority::Low => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn architecture_rule_matches() {
        let text = instruction_for(&tags(&["architecture", "auth"]), Priority::Medium);
        assert_eq!(text, "Apply this pattern consistently across the codebase.");
    }

    #[test]
    fn first_matching_rule_wins() {
        // "todo" precedes "security" in the table, regardless of input order
        let a = instruction_for(&tags(&["security", "todo"]), Priority::Medium);
        let b = instruction_for(&tags(&["todo", "security"]), Priority::Medium);
        assert_eq!(a, b);
        assert!(a.contains("Outstanding task"));
    }

    #[test]
    fn unmatched_tags_fall_through_to_generic() {
        let text = instruction_for(&tags(&["frontend", "css"]), Priority::Medium);
        assert_eq!(text, GENERIC);
        assert_eq!(instruction_for(&[], Priority::Medium), GENERIC);
    }

    #[test]
    fn high_priority_prefixes_urgency_marker() {
        let text = instruction_for(&tags(&["tech-debt"]), Priority::High);
        assert!(text.starts_with(URGENCY_MARKER));
        assert!(text.contains("Known limitation"));
    }

    #[test]
    fn low_and_medium_priority_carry_no_marker() {
        for priority in [Priority::Low, Priority::Medium] {
            let text = instruction_for(&tags(&["security"]), priority);
            assert!(!text.contains(URGENCY_MARKER));
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let t = tags(&["security", "todo"]);
        let first = instruction_for(&t, Priority::High);
        let second = instruction_for(&t, Priority::High);
        assert_eq!(first, second);
    }
}
