//! Error types for the source document model
//!
//! Every variant here is a rejection: the document (or reference) is
//! unusable and no partial value is produced.

use std::path::PathBuf;

/// Errors while loading or constructing a source document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A required text field is empty or whitespace
    #[error("{field} can't be empty")]
    EmptyField {
        /// Human-readable field name
        field: &'static str,
    },

    /// A precondition row does not have exactly two items
    #[error("There should be 2 items in \"data\" section ({category}, found {found})")]
    DataRowArity {
        /// Category label the row belongs to
        category: &'static str,
        /// Number of items actually present
        found: usize,
    },

    /// A precondition category is not a list of text rows
    #[error("There should be 2 items in \"data\" section ({category}: {reason})")]
    MalformedData {
        /// Category label of the section
        category: &'static str,
        /// What is wrong with its shape
        reason: &'static str,
    },

    /// A step row does not have exactly two items
    #[error("There should be 2 items in \"step {step}\" section")]
    StepRowArity {
        /// 1-based step number
        step: usize,
        /// Number of items actually present
        found: usize,
    },

    /// Source file is missing (also checked against the fallback directory)
    #[error("File \"{}\" doesn't exist", path.display())]
    NotFound {
        /// Path as given by the caller
        path: PathBuf,
    },

    /// IO error while reading the source file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// YAML could not be deserialized into the document shape
    #[error("syntax error in source document: {0}")]
    Syntax(#[from] serde_yaml::Error),
}

impl DocumentError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while extracting an issue key from a ticket reference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Reference is neither an https URL ending in a key nor a bare key
    #[error("Unknown jira ticket: {reference}")]
    UnknownTicket {
        /// Reference as supplied
        reference: String,
    },

    /// Project prefix is empty or contains characters a key cannot carry
    #[error("invalid project name: '{0}'")]
    InvalidProject(String),
}
