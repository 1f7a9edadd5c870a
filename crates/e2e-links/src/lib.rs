//! E2E Link Graph Consistency
//!
//! Normalizes the tracker's inward/outward link pairs to the perspective of
//! one ticket and cross-checks them against the ticket's description.
//!
//! # Example
//!
//! ```rust
//! use e2e_links::{LinkChecker, IssueLink};
//! use e2e_model::{IssueKey, ProjectKey};
//!
//! let checker = LinkChecker::new(ProjectKey::new("PROJ").unwrap());
//! let me = IssueKey::new("PROJ-1");
//! let links = vec![
//!     IssueLink::new("PROJ-1", "PROJ-10", "is covered by", "covers", "Attribute"),
//!     IssueLink::new("PROJ-1", "PROJ-20", "is covered by", "covers", "Functional Area"),
//! ];
//!
//! let report = checker.check(&me, "no dependencies", &links).unwrap();
//! assert!(report.passed());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod checker;
pub mod edge;
pub mod error;

// Re-exports
pub use checker::{check_links, LinkCheckReport, LinkChecker, RelationRule, RELATION_RULES};
pub use edge::{resolve_relation, IssueLink, LinkEdge, COVERS, DEPENDS_ON};
pub use error::LinkError;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for link checking
    pub use crate::{
        check_links, resolve_relation, IssueLink, LinkCheckReport, LinkChecker, LinkEdge,
        LinkError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
