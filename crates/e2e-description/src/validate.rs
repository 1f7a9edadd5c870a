//! Description parser/validator
//!
//! Reads a stored description line by line and reports structural
//! diagnostics:
//!
//! 1. the first line must be the Business Goal header;
//! 2. the first table row holds the business goal, which must match the
//!    configured pattern;
//! 3. the scenario table, starting at the row numbered 1, is scanned by
//!    [`ScanState`].
//!
//! A logical step may wrap across physical lines: only its first line
//! carries the `||n|` marker, and a line ending with `|` closes the step.
//! The scan stops at the first line of the wrong shape; diagnostics found
//! before that point are kept.

use crate::error::ValidateError;
use crate::render::BUSINESS_GOAL_HEADER;
use e2e_model::{Diagnostic, DiagnosticKind};
use regex::Regex;

/// Validate with a pattern given as string
///
/// # Errors
/// [`ValidateError::InvalidPattern`] if the pattern does not compile,
/// [`ValidateError::EmptyDescription`] for blank text.
pub fn validate(text: &str, business_goal_pattern: &str) -> Result<Vec<Diagnostic>, ValidateError> {
    DescriptionValidator::new(business_goal_pattern)?.validate(text)
}

/// Validator with a compiled business goal pattern
#[derive(Debug, Clone)]
pub struct DescriptionValidator {
    business_goal: Regex,
}

impl DescriptionValidator {
    /// Compile business goal pattern
    ///
    /// # Errors
    /// [`ValidateError::InvalidPattern`] if the pattern does not compile.
    pub fn new(business_goal_pattern: &str) -> Result<Self, ValidateError> {
        let business_goal = Regex::new(business_goal_pattern)
            .map_err(|e| ValidateError::invalid_pattern(business_goal_pattern, &e))?;
        Ok(Self { business_goal })
    }

    /// Validate description text
    ///
    /// # Errors
    /// [`ValidateError::EmptyDescription`] when the text has no non-blank line.
    pub fn validate(&self, text: &str) -> Result<Vec<Diagnostic>, ValidateError> {
        let lines = split_lines(text);
        let Some(first) = lines.first() else {
            return Err(ValidateError::EmptyDescription);
        };

        let mut diagnostics = Vec::new();

        if !first.eq_ignore_ascii_case(BUSINESS_GOAL_HEADER) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingBusinessGoalHeader,
                "Description should start with \"Business goal\"",
            ));
        }

        match business_goal_text(&lines) {
            Some(goal) if self.business_goal.is_match(goal) => {}
            Some(_) => diagnostics.push(Diagnostic::new(
                DiagnosticKind::BusinessGoalPhrasing,
                "Business goal should regard QB rules",
            )),
            None => diagnostics.push(Diagnostic::new(
                DiagnosticKind::BusinessGoalNotFound,
                "Business goal not found",
            )),
        }

        diagnostics.extend(scan_steps(step_table(&lines).iter().copied()));

        tracing::debug!(
            lines = lines.len(),
            diagnostics = diagnostics.len(),
            "validated description"
        );
        Ok(diagnostics)
    }
}

/// Non-empty trimmed lines
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Business goal cell: first table row with its leading pipes removed
fn business_goal_text<'a>(lines: &[&'a str]) -> Option<&'a str> {
    lines
        .iter()
        .find(|line| line.starts_with('|'))
        .map(|line| line.trim_start_matches('|').trim_start())
}

/// Lines from the first step row (`||1|` or `|1|`, spaces ignored) onwards
#[must_use]
pub fn step_table<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let start = lines
        .iter()
        .position(|line| {
            let compact: String = line.chars().filter(|c| *c != ' ').collect();
            compact.starts_with("||1|") || compact.starts_with("|1|")
        })
        .unwrap_or(lines.len());
    &lines[start..]
}

/// Run the step scanner over the step table
pub fn scan_steps<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Diagnostic> {
    let mut state = ScanState::START;
    let mut diagnostics = Vec::new();
    for line in lines {
        let transition = state.advance(line);
        diagnostics.extend(transition.diagnostic);
        state = transition.next;
        if state == ScanState::Stopped {
            break;
        }
    }
    diagnostics
}

/// Position of the step scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Next line must open step `n`
    ExpectStep(usize),
    /// Next line continues step `n`
    ExpectContinuation(usize),
    /// A line of the wrong shape was found; nothing further is read
    Stopped,
}

/// Result of feeding one line to the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State for the next line
    pub next: ScanState,
    /// Finding produced by this line, if any
    pub diagnostic: Option<Diagnostic>,
}

impl Transition {
    fn to(next: ScanState) -> Self {
        Self {
            next,
            diagnostic: None,
        }
    }

    fn stop(kind: DiagnosticKind, message: String) -> Self {
        Self {
            next: ScanState::Stopped,
            diagnostic: Some(Diagnostic::new(kind, message)),
        }
    }
}

impl ScanState {
    /// Initial state: expecting step 1
    pub const START: Self = Self::ExpectStep(1);

    /// Consume one trimmed line
    #[must_use]
    pub fn advance(self, line: &str) -> Transition {
        match self {
            Self::ExpectStep(n) => {
                if !line.starts_with("||") {
                    return Transition::stop(
                        DiagnosticKind::StepExpected,
                        format!("Step {n} expected, but regular line found"),
                    );
                }
                if !line.starts_with(&format!("||{n}|")) {
                    return Transition::stop(
                        DiagnosticKind::WrongNumeration,
                        format!(
                            "Wrong numeration: expected step {n}, but step {} found",
                            step_token(line)
                        ),
                    );
                }
                Transition::to(Self::after_line(n, line))
            }
            Self::ExpectContinuation(n) => {
                if line.starts_with("||") {
                    return Transition::stop(
                        DiagnosticKind::RegularLineExpected,
                        format!(
                            "Regular line expected for the step {n}, but step {} found",
                            step_token(line)
                        ),
                    );
                }
                Transition::to(Self::after_line(n, line))
            }
            Self::Stopped => Transition::to(Self::Stopped),
        }
    }

    /// A line ending with `|` closes step `n`
    fn after_line(n: usize, line: &str) -> Self {
        if line.ends_with('|') {
            Self::ExpectStep(n + 1)
        } else {
            Self::ExpectContinuation(n)
        }
    }
}

/// First non-empty cell of a table line
fn step_token(line: &str) -> &str {
    line.split('|')
        .map(str::trim)
        .find(|token| !token.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GOAL: &str = "^User can ";

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    fn description(steps: &str) -> String {
        format!(
            "h2. Business Goal\n\n| User can log in |\nh2. Pre-Conditions\n\n\
             ||Pre-condition Item||Pre-condition information||Reference links||\n\
             ||Environment| N/A | N/A |\nh2. Scenario\n\n\
             ||Seq#||User Interaction sequence||Expected outcome||\n{steps}"
        )
    }

    #[test]
    fn valid_description_has_no_diagnostics() {
        let text = description("||1| Open | Shown |\n||2| Submit | Done |\n");
        assert!(validate(&text, GOAL).unwrap().is_empty());
    }

    #[test]
    fn empty_text_is_fatal() {
        assert_eq!(validate(" \r\n \n", GOAL), Err(ValidateError::EmptyDescription));
    }

    #[test]
    fn invalid_pattern_is_fatal() {
        assert!(matches!(
            validate("h2. Business Goal", "(unclosed"),
            Err(ValidateError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn header_is_case_insensitive() {
        let text = description("||1| a | b |\n").replace("h2. Business Goal", "H2. BUSINESS GOAL");
        assert!(validate(&text, GOAL).unwrap().is_empty());
    }

    #[test]
    fn wrong_header_keeps_scanning() {
        let text = description("||1| a | b |\n||3| c | d |\n").replacen("h2. Business Goal", "h2. Goal", 1);
        let diagnostics = validate(&text, GOAL).unwrap();
        assert_eq!(
            messages(&diagnostics),
            vec![
                "Description should start with \"Business goal\"",
                "Wrong numeration: expected step 2, but step 3 found",
            ]
        );
    }

    #[test]
    fn business_goal_must_match_pattern() {
        let text = description("||1| a | b |\n").replace("User can log in", "Login works");
        let diagnostics = validate(&text, GOAL).unwrap();
        assert_eq!(messages(&diagnostics), vec!["Business goal should regard QB rules"]);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::BusinessGoalPhrasing);
    }

    #[test]
    fn missing_business_goal_row_is_reported() {
        let diagnostics = validate("h2. Business Goal\nno table here", GOAL).unwrap();
        assert_eq!(diagnostics[0].kind, DiagnosticKind::BusinessGoalNotFound);
    }

    #[test]
    fn wrapped_step_is_accepted() {
        let text = description("||1| Open the page\nand scroll down | Footer shown |\n||2| a | b |\n");
        assert!(validate(&text, GOAL).unwrap().is_empty());
    }

    #[test]
    fn step_start_tolerates_spaces_when_locating_table() {
        let lines = ["h2. Scenario", "|| 1 | a | b |"];
        assert_eq!(step_table(&lines), &["|| 1 | a | b |"]);
        let diagnostics = scan_steps(step_table(&lines).iter().copied());
        assert_eq!(
            messages(&diagnostics),
            vec!["Wrong numeration: expected step 1, but step 1 found"]
        );
    }

    #[test]
    fn single_pipe_start_is_not_a_step() {
        let diagnostics = scan_steps(["|1| a | b |"]);
        assert_eq!(messages(&diagnostics), vec!["Step 1 expected, but regular line found"]);
    }

    #[test]
    fn new_step_inside_wrapped_step_stops_scan() {
        let diagnostics = scan_steps(["||1| a", "||2| b | c |", "||7| x | y |"]);
        assert_eq!(
            messages(&diagnostics),
            vec!["Regular line expected for the step 1, but step 2 found"]
        );
    }

    #[test]
    fn regular_line_where_step_expected_stops_scan() {
        let diagnostics = scan_steps(["||1| a | b |", "plain text", "||9| x | y |"]);
        assert_eq!(
            messages(&diagnostics),
            vec!["Step 2 expected, but regular line found"]
        );
        assert!(diagnostics[0].kind.stops_scan());
    }

    #[test]
    fn gap_in_numbering_is_reported_once() {
        let diagnostics = scan_steps(["||1| a | b |", "||2| a | b |", "||4| a | b |", "||5| a | b |"]);
        assert_eq!(
            messages(&diagnostics),
            vec!["Wrong numeration: expected step 3, but step 4 found"]
        );
    }

    #[test]
    fn no_step_table_means_no_step_diagnostics() {
        let text = "h2. Business Goal\n| User can log in |\nh2. Scenario\n";
        assert!(validate(text, GOAL).unwrap().is_empty());
    }

    #[test]
    fn transition_function_is_explicit() {
        assert_eq!(ScanState::START.advance("||1| a | b |").next, ScanState::ExpectStep(2));
        assert_eq!(ScanState::START.advance("||1| a").next, ScanState::ExpectContinuation(1));
        assert_eq!(
            ScanState::ExpectContinuation(1).advance("b |").next,
            ScanState::ExpectStep(2)
        );
        assert_eq!(
            ScanState::ExpectContinuation(1).advance("still going").next,
            ScanState::ExpectContinuation(1)
        );
        let t = ScanState::Stopped.advance("||1| a | b |");
        assert_eq!(t.next, ScanState::Stopped);
        assert!(t.diagnostic.is_none());
    }

    #[test]
    fn crlf_line_endings() {
        let text = description("||1| a | b |\n||2| c | d |\n").replace('\n', "\r\n");
        assert!(validate(&text, GOAL).unwrap().is_empty());
    }
}
