//! Links as returned by the tracker, and their resolution into edges
//!
//! The tracker stores a link once, as an inward/outward pair with one label
//! per direction. Seen from one of the two issues, the relation is the
//! label pointing away from it: the outward label when the issue is the
//! inward member, the inward label when it is the outward member.

use crate::error::LinkError;
use e2e_model::{IssueKey, IssueType};
use serde::{Deserialize, Serialize};

/// Relation an Attribute or Functional Area must be linked with
pub const COVERS: &str = "covers";
/// Relation another End-to-end Test must be linked with
pub const DEPENDS_ON: &str = "depends on";

/// A link between the issue links were fetched for and another issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
    /// Key of the inward member
    pub inward_key: IssueKey,
    /// Key of the outward member
    pub outward_key: IssueKey,
    /// Label read from the outward member towards the inward one
    pub inward_label: String,
    /// Label read from the inward member towards the outward one
    pub outward_label: String,
    /// Type of the issue on the other end
    pub other_issue_type: IssueType,
    /// Workflow status of the issue on the other end
    #[serde(default)]
    pub other_issue_status: String,
}

impl IssueLink {
    /// Create link from its pair of keys and labels
    #[must_use]
    pub fn new(
        inward_key: impl Into<String>,
        outward_key: impl Into<String>,
        inward_label: impl Into<String>,
        outward_label: impl Into<String>,
        other_issue_type: impl Into<IssueType>,
    ) -> Self {
        Self {
            inward_key: IssueKey::new(inward_key),
            outward_key: IssueKey::new(outward_key),
            inward_label: inward_label.into(),
            outward_label: outward_label.into(),
            other_issue_type: other_issue_type.into(),
            other_issue_status: String::new(),
        }
    }

    /// With status of the other issue
    #[inline]
    #[must_use]
    pub fn with_other_status(mut self, status: impl Into<String>) -> Self {
        self.other_issue_status = status.into();
        self
    }
}

/// Relation label seen from `self_key`
///
/// # Errors
/// [`LinkError::NotAParticipant`] when `self_key` is neither member.
pub fn resolve_relation<'a>(link: &'a IssueLink, self_key: &IssueKey) -> Result<&'a str, LinkError> {
    if &link.inward_key == self_key {
        Ok(&link.outward_label)
    } else if &link.outward_key == self_key {
        Ok(&link.inward_label)
    } else {
        Err(LinkError::not_a_participant(self_key, link))
    }
}

/// A link normalized to the perspective of one issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEdge {
    /// Key of the issue on the other end
    pub other_issue_key: IssueKey,
    /// Type of the issue on the other end
    pub other_issue_type: IssueType,
    /// Status of the issue on the other end
    pub other_issue_status: String,
    /// Relation label from this issue's perspective
    pub relation: String,
}

impl LinkEdge {
    /// Create edge directly (relation already resolved)
    #[must_use]
    pub fn new(
        other_issue_key: impl Into<String>,
        other_issue_type: impl Into<IssueType>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            other_issue_key: IssueKey::new(other_issue_key),
            other_issue_type: other_issue_type.into(),
            other_issue_status: String::new(),
            relation: relation.into(),
        }
    }

    /// Resolve a tracker link from the perspective of `self_key`
    ///
    /// # Errors
    /// [`LinkError::NotAParticipant`] when `self_key` is neither member.
    pub fn resolve(link: &IssueLink, self_key: &IssueKey) -> Result<Self, LinkError> {
        let relation = resolve_relation(link, self_key)?;
        let other = if &link.inward_key == self_key {
            &link.outward_key
        } else {
            &link.inward_key
        };
        Ok(Self {
            other_issue_key: other.clone(),
            other_issue_type: link.other_issue_type.clone(),
            other_issue_status: link.other_issue_status.clone(),
            relation: relation.to_string(),
        })
    }

    /// Resolve every link, failing on the first one `self_key` is not part of
    ///
    /// # Errors
    /// [`LinkError::NotAParticipant`] for the first foreign link.
    pub fn resolve_all(links: &[IssueLink], self_key: &IssueKey) -> Result<Vec<Self>, LinkError> {
        links
            .iter()
            .map(|link| Self::resolve(link, self_key))
            .collect()
    }
}
