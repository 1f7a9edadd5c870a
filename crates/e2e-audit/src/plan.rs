//! Preparing a ticket for a generated description
//!
//! A [`CreationPlan`] lists every change the tracker would need: new
//! summary and description, custom fields, links, Eng Problems to close and
//! the workflow transition. Building it performs no writes.

use crate::audit::TEST_SUITE_CATEGORY;
use crate::config::ToolConfig;
use crate::error::AuditError;
use crate::tracker::{Issue, TrackerClient};
use e2e_description::render;
use e2e_links::{IssueLink, LinkEdge};
use e2e_model::{IssueKey, IssueType, ProjectKey, SourceDocument};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Statuses a ticket may have when its description is (re)generated
pub const EDITABLE_STATUSES: [&str; 2] = ["Open", STATUS_DEFINITION];
/// Status a freshly defined ticket moves to
pub const STATUS_DEFINITION: &str = "E2E Definition";
/// Eng Problem status that is closed on creation
pub const STATUS_IDENTIFIED: &str = "Identified";
/// Transition applied to identified Eng Problems
pub const TRANSITION_NOT_NEEDED: &str = "Not Needed";
/// Custom field linking the ticket to its Functional Area
pub const PRODUCT_FEATURES: &str = "Product Feature(s) covered";
/// Link type between the ticket and its Attribute issue
pub const ATTRIBUTE_LINK_TYPE: &str = "Functional Area Coverage";
/// Link type between a dependency and the ticket
pub const DEPENDENCY_LINK_TYPE: &str = "Depends On";

const ATTRIBUTE_NAMES: &str = "Accessible|Consistent|Fast|Secure|Traceable";

/// Functional Area and attribute named in a ticket summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSummary {
    /// Functional Area the scenario covers
    pub functional_area: IssueKey,
    /// Quality attribute name
    pub attribute: String,
}

/// Parse `Create ACC E2E scenario for FA <KEY> - <Attribute>`
///
/// # Errors
/// [`AuditError::UnparsableSummary`] when the summary does not follow the
/// template.
pub fn parse_ticket_summary(summary: &str, project: &ProjectKey) -> Result<TicketSummary, AuditError> {
    let pattern = format!(
        r"Create ACC E2E scenario for FA ({}-\d+) - ({ATTRIBUTE_NAMES})",
        regex::escape(project.name())
    );
    let unparsable = || AuditError::UnparsableSummary(summary.to_string());
    let template = Regex::new(&pattern).map_err(|_| unparsable())?;

    let captures = template.captures(summary).ok_or_else(unparsable)?;
    match (captures.get(1), captures.get(2)) {
        (Some(area), Some(attribute)) => Ok(TicketSummary {
            functional_area: IssueKey::new(area.as_str()),
            attribute: attribute.as_str().to_string(),
        }),
        _ => Err(unparsable()),
    }
}

/// A link to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedLink {
    /// Issue the link starts at
    pub from: IssueKey,
    /// Issue the link points to
    pub to: IssueKey,
    /// Tracker link type name
    pub link_type: String,
}

/// Changes that bring a ticket in line with its source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationPlan {
    /// Ticket being updated
    pub issue_key: IssueKey,
    /// New summary
    pub summary: String,
    /// New description
    pub description: String,
    /// Functional Area from the current summary
    pub functional_area: IssueKey,
    /// Attribute from the current summary
    pub attribute: String,
    /// Issue representing the attribute
    pub attribute_issue: IssueKey,
    /// Custom field values to set
    pub custom_fields: BTreeMap<String, Vec<String>>,
    /// Links to create
    pub links: Vec<PlannedLink>,
    /// Keys mentioned in the new description
    pub dependencies: Vec<IssueKey>,
    /// Identified Eng Problems to transition to Not Needed
    pub eng_problems_to_close: Vec<IssueKey>,
    /// Whether the ticket moves from Open to E2E Definition
    pub transition_to_definition: bool,
}

impl CreationPlan {
    /// Check preconditions and assemble the plan
    ///
    /// # Errors
    /// Rejections for a ticket of another type or status, a summary off the
    /// template, an attribute differing from the document's, an attribute
    /// without configured issue, a document failing to render, or a link
    /// the ticket is not part of.
    pub fn prepare(
        doc: &SourceDocument,
        issue: &Issue,
        links: &[IssueLink],
        config: &ToolConfig,
    ) -> Result<Self, AuditError> {
        let project = config.project_key()?;

        if issue.issue_type != IssueType::EndToEndTest {
            return Err(AuditError::WrongIssueType {
                found: issue.issue_type.clone(),
            });
        }
        if !EDITABLE_STATUSES.contains(&issue.status.as_str()) {
            return Err(AuditError::WrongStatus(issue.status.clone()));
        }

        let parsed = parse_ticket_summary(&issue.summary, &project)?;
        if let Some(expected) = doc.attribute() {
            if !expected.eq_ignore_ascii_case(&parsed.attribute) {
                return Err(AuditError::AttributeMismatch {
                    expected: expected.to_string(),
                    found: parsed.attribute,
                });
            }
        }
        let attribute_issue = config
            .attribute_issue(&parsed.attribute)
            .cloned()
            .ok_or_else(|| AuditError::UnknownAttribute(parsed.attribute.clone()))?;

        let description = render(doc)?;
        let dependencies: Vec<IssueKey> = project
            .mentioned_keys(description.as_str())
            .into_iter()
            .collect();

        let eng_problems_to_close = LinkEdge::resolve_all(links, &issue.key)?
            .into_iter()
            .filter(|edge| {
                edge.other_issue_type == IssueType::EngProblem
                    && edge.other_issue_status == STATUS_IDENTIFIED
            })
            .map(|edge| edge.other_issue_key)
            .collect();

        let mut planned = vec![PlannedLink {
            from: issue.key.clone(),
            to: attribute_issue.clone(),
            link_type: ATTRIBUTE_LINK_TYPE.to_string(),
        }];
        planned.extend(dependencies.iter().map(|dependency| PlannedLink {
            from: dependency.clone(),
            to: issue.key.clone(),
            link_type: DEPENDENCY_LINK_TYPE.to_string(),
        }));

        let mut custom_fields = BTreeMap::new();
        custom_fields.insert(TEST_SUITE_CATEGORY.to_string(), vec!["Smoke".to_string()]);

        Ok(Self {
            issue_key: issue.key.clone(),
            summary: doc.summary().to_string(),
            description: description.into_string(),
            functional_area: parsed.functional_area,
            attribute: parsed.attribute,
            attribute_issue,
            custom_fields,
            links: planned,
            dependencies,
            eng_problems_to_close,
            transition_to_definition: issue.status == "Open",
        })
    }

    /// With the product feature field pointing at the Functional Area issue
    #[must_use]
    pub fn with_functional_area(mut self, area: &Issue) -> Self {
        let label = format!("{}: {}", area.key, area.summary);
        let value = serde_json::json!({ "label": label, "value": label }).to_string();
        self.custom_fields.insert(PRODUCT_FEATURES.to_string(), vec![value]);
        self
    }
}

impl fmt::Display for CreationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ticket: {}", self.issue_key)?;
        writeln!(f, "Summary: {}", self.summary)?;
        writeln!(f, "Functional Area: {}", self.functional_area)?;
        writeln!(f, "Attribute: {} ({})", self.attribute, self.attribute_issue)?;
        for (name, values) in &self.custom_fields {
            writeln!(f, "Set {name}: {}", values.join(", "))?;
        }
        for link in &self.links {
            writeln!(f, "Link {} -> {} ({})", link.from, link.to, link.link_type)?;
        }
        writeln!(
            f,
            "Eng Problems to close: {}",
            self.eng_problems_to_close.len()
        )?;
        for key in &self.eng_problems_to_close {
            writeln!(f, " - {key} -> {TRANSITION_NOT_NEEDED}")?;
        }
        if self.transition_to_definition {
            writeln!(f, "Move to {STATUS_DEFINITION}")?;
        }
        writeln!(f, "Description:")?;
        f.write_str(&self.description)
    }
}

/// Builds [`CreationPlan`]s from tracker state
pub struct CreationPlanner {
    config: ToolConfig,
    project: ProjectKey,
    tracker: Arc<dyn TrackerClient>,
}

impl CreationPlanner {
    /// Create planner from configuration
    ///
    /// # Errors
    /// [`AuditError::Config`] when the configuration does not validate.
    pub fn new(config: ToolConfig, tracker: Arc<dyn TrackerClient>) -> Result<Self, AuditError> {
        config.validate()?;
        let project = config.project_key()?;
        Ok(Self {
            config,
            project,
            tracker,
        })
    }

    /// Plan the update of the ticket the document refers to
    ///
    /// # Errors
    /// Reference, tracker and precondition rejections.
    pub async fn plan(&self, doc: &SourceDocument) -> Result<CreationPlan, AuditError> {
        let key = IssueKey::extract(doc.ticket_reference(), &self.project)?;

        info!(issue = %key, "getting ticket");
        let issue = self.tracker.get_issue(&key).await?;
        let links = self.tracker.get_links(&key).await?;
        let plan = CreationPlan::prepare(doc, &issue, &links, &self.config)?;

        info!(issue = %plan.functional_area, "getting functional area");
        let area = self.tracker.get_issue(&plan.functional_area).await?;
        let plan = plan.with_functional_area(&area);

        debug!(
            issue = %plan.issue_key,
            links = plan.links.len(),
            eng_problems = plan.eng_problems_to_close.len(),
            "prepared creation plan"
        );
        Ok(plan)
    }
}

impl fmt::Debug for CreationPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreationPlanner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
