//! Link graph consistency checker
//!
//! Cross-checks the links of an End-to-end Test against its description:
//!
//! - every linked Attribute, Functional Area and End-to-end Test must use the
//!   relation [`RELATION_RULES`] requires for its type;
//! - every linked End-to-end Test must be mentioned in the description;
//! - every key of the project mentioned in the description must be linked
//!   as an End-to-end Test.
//!
//! Attribute and Functional Area links are counted; a ticket passes only
//! with exactly one of each and no diagnostics.

use crate::edge::{IssueLink, LinkEdge, COVERS, DEPENDS_ON};
use crate::error::LinkError;
use e2e_model::{Diagnostic, DiagnosticKind, IssueKey, IssueType, ProjectKey};
use indexmap::IndexMap;
use serde::Serialize;

/// Relation required for links to one issue type
#[derive(Debug, Clone, Copy)]
pub struct RelationRule {
    /// Issue type on the other end
    pub issue_type: &'static str,
    /// Required relation from the checked issue's perspective
    pub relation: &'static str,
    /// How the other issue is named in messages; `{key}` is replaced
    pub subject: &'static str,
}

/// Required relations per linked issue type
pub const RELATION_RULES: &[RelationRule] = &[
    RelationRule {
        issue_type: "Attribute",
        relation: COVERS,
        subject: "Attribute \"{key}\"",
    },
    RelationRule {
        issue_type: "Functional Area",
        relation: COVERS,
        subject: "Functional area \"{key}\"",
    },
    RelationRule {
        issue_type: "End-to-end Test",
        relation: DEPENDS_ON,
        subject: "E2E {key}",
    },
];

impl RelationRule {
    /// Rule for an issue type, if any
    #[must_use]
    pub fn for_type(issue_type: &IssueType) -> Option<&'static RelationRule> {
        RELATION_RULES
            .iter()
            .find(|rule| rule.issue_type == issue_type.as_str())
    }

    /// Mismatch diagnostic for an edge, if its relation is wrong
    #[must_use]
    pub fn check(&self, edge: &LinkEdge) -> Option<Diagnostic> {
        (edge.relation != self.relation).then(|| {
            Diagnostic::new(
                DiagnosticKind::RelationMismatch,
                format!(
                    "{} should be linked with relation \"{}\", but is linked with \"{}\"",
                    self.subject.replace("{key}", edge.other_issue_key.as_str()),
                    self.relation,
                    edge.relation
                ),
            )
        })
    }
}

/// Outcome of a link check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCheckReport {
    /// Findings in edge order, unlinked mentions last
    pub diagnostics: Vec<Diagnostic>,
    /// Number of linked Attribute issues
    pub attribute_links: usize,
    /// Number of linked Functional Area issues
    pub functional_area_links: usize,
}

impl LinkCheckReport {
    /// Exactly one Attribute, exactly one Functional Area, no findings
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.attribute_links == 1 && self.functional_area_links == 1 && self.diagnostics.is_empty()
    }
}

/// Checker bound to a project prefix
#[derive(Debug, Clone)]
pub struct LinkChecker {
    project: ProjectKey,
}

impl LinkChecker {
    /// Create checker for a project
    #[inline]
    #[must_use]
    pub fn new(project: ProjectKey) -> Self {
        Self { project }
    }

    /// Check raw tracker links of `issue_key`
    ///
    /// # Errors
    /// [`LinkError::NotAParticipant`] if any link does not involve
    /// `issue_key`; no report is produced in that case.
    pub fn check(
        &self,
        issue_key: &IssueKey,
        description: &str,
        links: &[IssueLink],
    ) -> Result<LinkCheckReport, LinkError> {
        let edges = LinkEdge::resolve_all(links, issue_key)?;
        let report = self.check_edges(description, &edges);
        tracing::debug!(
            issue = %issue_key,
            links = links.len(),
            attributes = report.attribute_links,
            functional_areas = report.functional_area_links,
            diagnostics = report.diagnostics.len(),
            "checked links"
        );
        Ok(report)
    }

    /// Check already resolved edges
    #[must_use]
    pub fn check_edges(&self, description: &str, edges: &[LinkEdge]) -> LinkCheckReport {
        let mut mentioned: IndexMap<IssueKey, bool> = self
            .project
            .mentioned_keys(description)
            .into_iter()
            .map(|key| (key, false))
            .collect();

        let mut report = LinkCheckReport::default();
        for edge in edges {
            match edge.other_issue_type {
                IssueType::Attribute => report.attribute_links += 1,
                IssueType::FunctionalArea => report.functional_area_links += 1,
                _ => {}
            }

            if let Some(diagnostic) =
                RelationRule::for_type(&edge.other_issue_type).and_then(|rule| rule.check(edge))
            {
                report.diagnostics.push(diagnostic);
            }

            if edge.other_issue_type == IssueType::EndToEndTest {
                match mentioned.get_mut(&edge.other_issue_key) {
                    Some(linked) => *linked = true,
                    None => report.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::LinkedNotMentioned,
                        format!(
                            "Ticket is linked with \"{}\", but it isn't mentioned in description",
                            edge.other_issue_key
                        ),
                    )),
                }
            }
        }

        report.diagnostics.extend(
            mentioned
                .into_iter()
                .filter(|(_, linked)| !linked)
                .map(|(key, _)| {
                    Diagnostic::new(
                        DiagnosticKind::MentionedNotLinked,
                        format!(
                            "Ticket \"{key}\" is mentioned in description, but isn't linked to the current ticket"
                        ),
                    )
                }),
        );
        report
    }
}

/// Check links with a one-off checker
///
/// # Errors
/// See [`LinkChecker::check`].
pub fn check_links(
    issue_key: &IssueKey,
    description: &str,
    links: &[IssueLink],
    project: &ProjectKey,
) -> Result<LinkCheckReport, LinkError> {
    LinkChecker::new(project.clone()).check(issue_key, description, links)
}
