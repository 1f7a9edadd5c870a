//! Text rules applied to step cells
//!
//! Each rule is an entry in a table: an id, a predicate over one cell and a
//! message template. A cell matching any rule rejects the whole document.
//! New rules are added by extending [`STEP_RULES`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder in message templates replaced with the 1-based step number
pub const STEP_PLACEHOLDER: &str = "{step}";

/// A named predicate over a single step cell
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    /// Stable rule id
    pub id: &'static str,
    /// What the rule guards against
    pub description: &'static str,
    /// Returns true when the cell violates the rule
    pub matches: fn(&str) -> bool,
    /// Message template, may contain [`STEP_PLACEHOLDER`]
    pub message: &'static str,
}

impl TextRule {
    /// Render the message for a step
    #[must_use]
    pub fn message_for(&self, step: usize) -> String {
        self.message.replace(STEP_PLACEHOLDER, &step.to_string())
    }
}

static LESS_THEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)less then").expect("literal regex is valid"));

fn contains_less_then(cell: &str) -> bool {
    LESS_THEN.is_match(cell)
}

/// Rules every step cell is checked against
pub const STEP_RULES: &[TextRule] = &[TextRule {
    id: "typo-less-then",
    description: "\"less then\" written instead of \"less than\"",
    matches: contains_less_then,
    message: "Typo \"less then\" found in the step {step}",
}];

/// First rule (in table order) violated by `cell`
#[must_use]
pub fn first_violation<'a>(rules: &'a [TextRule], cell: &str) -> Option<&'a TextRule> {
    rules.iter().find(|rule| (rule.matches)(cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn less_then_is_case_insensitive() {
        assert!(contains_less_then("value is less then 5"));
        assert!(contains_less_then("LESS THEN"));
        assert!(contains_less_then("Less Then ten"));
        assert!(!contains_less_then("value is less than 5"));
    }

    #[test]
    fn first_violation_finds_rule() {
        let rule = first_violation(STEP_RULES, "wait less then a minute").unwrap();
        assert_eq!(rule.id, "typo-less-then");
        assert!(first_violation(STEP_RULES, "wait a minute").is_none());
    }

    #[test]
    fn message_template_substitutes_step() {
        let rule = &STEP_RULES[0];
        assert_eq!(rule.message_for(4), "Typo \"less then\" found in the step 4");
    }
}
