//! Error types for ticket auditing
//!
//! Every variant here is a rejection: the operation stops and no report is
//! produced. Findings that merely fail a ticket are
//! [`Diagnostic`](e2e_model::Diagnostic)s inside the report instead.

use e2e_description::{RenderError, ValidateError};
use e2e_links::LinkError;
use e2e_model::{IssueKey, IssueType, KeyError};
use std::path::PathBuf;

/// Main audit error type
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Reference did not yield an issue key
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// Description could not be rendered
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Stored description could not be scanned
    #[error("validation error: {0}")]
    Validate(#[from] ValidateError),

    /// Link set contains a link of another issue
    #[error("link error: {0}")]
    Link(#[from] LinkError),

    /// Tracker lookup failed
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),

    /// Configuration unusable
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Ticket is not an End-to-end Test
    #[error("Ticket type should be \"End-to-end Test\", but \"{found}\" found")]
    WrongIssueType {
        /// Actual issue type
        found: IssueType,
    },

    /// Ticket workflow state does not allow a description update
    #[error("Ticket is in wrong status: {0}")]
    WrongStatus(String),

    /// Source document names another attribute than the ticket summary
    #[error("Expected \"{expected}\" attribute, but ticket attribute is \"{found}\"")]
    AttributeMismatch {
        /// Attribute named in the source document
        expected: String,
        /// Attribute parsed from the ticket summary
        found: String,
    },

    /// Ticket summary does not follow the creation template
    #[error("Can't parse ticket summary: {0}")]
    UnparsableSummary(String),

    /// Attribute has no issue key in the configuration
    #[error("attribute \"{0}\" has no issue configured")]
    UnknownAttribute(String),
}

/// Errors raised by a [`TrackerClient`](crate::TrackerClient)
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// No issue with this key
    #[error("issue {0} not found")]
    IssueNotFound(IssueKey),

    /// Snapshot file could not be read
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        /// Snapshot path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Snapshot content is not valid JSON of the expected shape
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Errors loading or checking a [`ToolConfig`](crate::ToolConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config content is not valid JSON of the expected shape
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    /// Project name is missing
    #[error("project name is empty")]
    EmptyProjectName,

    /// Project name cannot be used in key patterns
    #[error(transparent)]
    Project(#[from] KeyError),

    /// Business goal pattern does not compile
    #[error(transparent)]
    BusinessGoal(#[from] ValidateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages() {
        let err = AuditError::WrongIssueType {
            found: IssueType::from("Story"),
        };
        assert_eq!(
            err.to_string(),
            "Ticket type should be \"End-to-end Test\", but \"Story\" found"
        );

        let err = AuditError::AttributeMismatch {
            expected: "Fast".into(),
            found: "Secure".into(),
        };
        assert_eq!(
            err.to_string(),
            "Expected \"Fast\" attribute, but ticket attribute is \"Secure\""
        );
    }

    #[test]
    fn tracker_error_converts() {
        let err: AuditError = TrackerError::IssueNotFound(IssueKey::new("PROJ-5")).into();
        assert_eq!(err.to_string(), "tracker error: issue PROJ-5 not found");
    }
}
