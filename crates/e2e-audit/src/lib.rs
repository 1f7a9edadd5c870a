//! E2E Ticket Audit
//!
//! Ties the description and link checks to the issue tracker:
//!
//! - [`TicketAuditor`] audits an existing End-to-end Test ticket and
//!   reports pass or fail with every finding.
//! - [`CreationPlanner`] prepares the changes that bring a ticket in line
//!   with a source document, without writing anything.
//!
//! Tracker access goes through [`TrackerClient`]; [`InMemoryTracker`]
//! serves a JSON snapshot.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use e2e_audit::{InMemoryTracker, Issue, TicketAuditor, ToolConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let tracker = InMemoryTracker::new();
//! tracker.insert_issue(Issue::new("PROJ-1", "Story", "Open", "Not a test"));
//!
//! let config = ToolConfig::new("PROJ", ".+");
//! let auditor = TicketAuditor::new(&config, Arc::new(tracker)).unwrap();
//! let err = auditor.audit("PROJ-1").await.unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Ticket type should be \"End-to-end Test\", but \"Story\" found"
//! );
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod audit;
pub mod config;
pub mod error;
pub mod plan;
pub mod tracker;

// Re-exports
pub use audit::{
    check_test_suite_category, AuditReport, TicketAuditor, TEST_SUITE_CATEGORIES,
    TEST_SUITE_CATEGORY,
};
pub use config::ToolConfig;
pub use error::{AuditError, ConfigError, TrackerError};
pub use plan::{parse_ticket_summary, CreationPlan, CreationPlanner, PlannedLink, TicketSummary};
pub use tracker::{
    InMemoryTracker, Issue, LinkEnd, LinkType, StoredLink, TrackerClient, TrackerSnapshot,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for auditing tickets
    pub use crate::{
        AuditError, AuditReport, CreationPlan, CreationPlanner, InMemoryTracker, Issue,
        TicketAuditor, ToolConfig, TrackerClient,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
