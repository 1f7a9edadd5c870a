//! E2E Source Document Model
//!
//! Typed representation of the structured documents End-to-end Test
//! descriptions are generated from, plus the pieces shared by every other
//! crate in the workspace: step text rules, diagnostics and issue keys.
//!
//! # Example
//!
//! ```rust
//! use e2e_model::{IssueKey, ProjectKey, SourceDocument};
//!
//! let doc = SourceDocument::from_yaml_str(
//!     "ticket: https://tracker.example.com/browse/PROJ-1\n\
//!      summary: Login works\n\
//!      businessGoal: User can log in\n\
//!      steps:\n  - [Open login page, Form is shown]\n",
//! )
//! .unwrap();
//!
//! let project = ProjectKey::new("PROJ").unwrap();
//! let key = IssueKey::extract(doc.ticket_reference(), &project).unwrap();
//! assert_eq!(key.as_str(), "PROJ-1");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod diagnostic;
pub mod document;
pub mod error;
pub mod issue;
pub mod key;
pub mod rules;

// Re-exports
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use document::{
    DataRow, PreconditionCategory, PreconditionSet, SourceDocument, SourceLoader, StepRow,
};
pub use error::{DocumentError, KeyError};
pub use issue::IssueType;
pub use key::{IssueKey, ProjectKey};
pub use rules::{TextRule, STEP_RULES};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with source documents
    pub use crate::{
        DataRow, Diagnostic, DiagnosticKind, DocumentError, IssueKey, IssueType, KeyError,
        PreconditionCategory, PreconditionSet, ProjectKey, SourceDocument, SourceLoader, StepRow,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
