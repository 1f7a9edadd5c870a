//! Ticket audit
//!
//! Fetches a ticket and its links, runs the description validator, the
//! test suite category check and the link checker, and aggregates their
//! diagnostics into one [`AuditReport`].

use crate::config::ToolConfig;
use crate::error::AuditError;
use crate::tracker::{Issue, TrackerClient};
use e2e_description::DescriptionValidator;
use e2e_links::LinkChecker;
use e2e_model::{Diagnostic, DiagnosticKind, IssueKey, IssueType, ProjectKey};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Custom field holding the suite a test belongs to
pub const TEST_SUITE_CATEGORY: &str = "TestSuite Category";
/// Accepted values of [`TEST_SUITE_CATEGORY`]
pub const TEST_SUITE_CATEGORIES: [&str; 2] = ["Smoke", "Regression"];

/// Outcome of auditing one ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Audited ticket
    pub issue_key: IssueKey,
    /// Findings in report order
    pub diagnostics: Vec<Diagnostic>,
    /// Links to Attribute issues
    pub attribute_links: usize,
    /// Links to Functional Area issues
    pub functional_area_links: usize,
}

impl AuditReport {
    /// Exactly one Attribute, exactly one Functional Area, no diagnostics
    #[must_use]
    pub fn passed(&self) -> bool {
        self.attribute_links == 1 && self.functional_area_links == 1 && self.diagnostics.is_empty()
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Attributes linked: {}", self.attribute_links)?;
        writeln!(f, "Functional Areas linked: {}", self.functional_area_links)?;
        if self.passed() {
            return writeln!(f, "Passed");
        }
        writeln!(f, "Failed")?;
        for diagnostic in &self.diagnostics {
            writeln!(f, " - {diagnostic}")?;
        }
        Ok(())
    }
}

/// Diagnostic for a missing or unexpected test suite category
#[must_use]
pub fn check_test_suite_category(issue: &Issue) -> Option<Diagnostic> {
    let category = issue.custom_field(TEST_SUITE_CATEGORY);
    match category.as_deref() {
        Some(value) if TEST_SUITE_CATEGORIES.contains(&value) => None,
        _ => Some(Diagnostic::new(
            DiagnosticKind::TestSuiteCategory,
            format!("{TEST_SUITE_CATEGORY} should be \"Smoke\" or \"Regression\""),
        )),
    }
}

/// Audits End-to-end Test tickets
pub struct TicketAuditor {
    project: ProjectKey,
    validator: DescriptionValidator,
    links: LinkChecker,
    tracker: Arc<dyn TrackerClient>,
}

impl TicketAuditor {
    /// Create auditor from configuration
    ///
    /// # Errors
    /// [`AuditError::Config`] when the configuration does not validate.
    pub fn new(config: &ToolConfig, tracker: Arc<dyn TrackerClient>) -> Result<Self, AuditError> {
        let project = config.project_key()?;
        Ok(Self {
            validator: config.description_validator()?,
            links: LinkChecker::new(project.clone()),
            project,
            tracker,
        })
    }

    /// Audit the ticket behind a URL or bare key
    ///
    /// # Errors
    /// Rejections: unknown reference, tracker failure, ticket of another
    /// type, empty description, or a link the ticket is not part of.
    pub async fn audit(&self, reference: &str) -> Result<AuditReport, AuditError> {
        let key = IssueKey::extract(reference, &self.project)?;

        info!(issue = %key, "getting ticket");
        let issue = self.tracker.get_issue(&key).await?;
        if issue.issue_type != IssueType::EndToEndTest {
            return Err(AuditError::WrongIssueType {
                found: issue.issue_type,
            });
        }

        info!(issue = %key, "getting links");
        let links = self.tracker.get_links(&key).await?;
        debug!(issue = %key, links = links.len(), "fetched links");

        let mut diagnostics = self.validator.validate(&issue.description)?;
        diagnostics.extend(check_test_suite_category(&issue));

        let link_report = self.links.check(&key, &issue.description, &links)?;
        diagnostics.extend(link_report.diagnostics);

        let report = AuditReport {
            issue_key: key,
            diagnostics,
            attribute_links: link_report.attribute_links,
            functional_area_links: link_report.functional_area_links,
        };
        info!(
            issue = %report.issue_key,
            passed = report.passed(),
            diagnostics = report.diagnostics.len(),
            "audit finished"
        );
        Ok(report)
    }
}

impl fmt::Debug for TicketAuditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketAuditor")
            .field("project", &self.project.name())
            .finish_non_exhaustive()
    }
}
