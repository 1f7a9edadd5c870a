//! Non-fatal findings
//!
//! Validators accumulate [`Diagnostic`]s instead of failing. The kind makes
//! findings matchable in code; the message is what gets reported.

use serde::Serialize;

/// Category of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// First line is not the Business Goal header
    MissingBusinessGoalHeader,
    /// No table row holding the business goal
    BusinessGoalNotFound,
    /// Business goal text does not match the required phrasing
    BusinessGoalPhrasing,
    /// A numbered step was expected but a plain line was found
    StepExpected,
    /// A step carries the wrong number
    WrongNumeration,
    /// A continuation line was expected but a new step was found
    RegularLineExpected,
    /// Test suite category custom field is missing or unexpected
    TestSuiteCategory,
    /// A link uses the wrong relation for the linked issue type
    RelationMismatch,
    /// A dependency is linked but not mentioned in the description
    LinkedNotMentioned,
    /// A dependency is mentioned in the description but not linked
    MentionedNotLinked,
}

impl DiagnosticKind {
    /// Whether this finding ends the step-table scan
    #[inline]
    #[must_use]
    pub fn stops_scan(self) -> bool {
        matches!(
            self,
            Self::StepExpected | Self::WrongNumeration | Self::RegularLineExpected
        )
    }
}

/// A single reported finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Kind of finding
    pub kind: DiagnosticKind,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create diagnostic
    #[inline]
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
