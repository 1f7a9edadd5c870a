//! Issue types the tools care about

use serde::{Deserialize, Serialize};

/// Tracker issue type
///
/// Only a handful of types carry meaning here; everything else is kept
/// verbatim in [`IssueType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueType {
    /// Quality attribute (Secure, Fast, ...)
    Attribute,
    /// Product capability area
    FunctionalArea,
    /// The ticket kind descriptions are written for
    EndToEndTest,
    /// Engineering defect
    EngProblem,
    /// Any other type name
    Other(String),
}

impl IssueType {
    /// Name as used by the tracker
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Attribute => "Attribute",
            Self::FunctionalArea => "Functional Area",
            Self::EndToEndTest => "End-to-end Test",
            Self::EngProblem => "Eng Problem",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for IssueType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Attribute" => Self::Attribute,
            "Functional Area" => Self::FunctionalArea,
            "End-to-end Test" => Self::EndToEndTest,
            "Eng Problem" => Self::EngProblem,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for IssueType {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<IssueType> for String {
    fn from(issue_type: IssueType) -> Self {
        match issue_type {
            IssueType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
