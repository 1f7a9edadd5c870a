//! Access to the issue tracker
//!
//! The audit only reads from the tracker, through [`TrackerClient`].
//! [`InMemoryTracker`] serves issues and links from a JSON snapshot:
//!
//! ```json
//! {
//!   "issues": [
//!     { "key": "PROJ-1", "type": "End-to-end Test", "status": "Open",
//!       "summary": "...", "description": "...",
//!       "customFields": { "TestSuite Category": ["Smoke"] } }
//!   ],
//!   "links": [
//!     { "linkType": { "name": "Covers", "inward": "is covered by", "outward": "covers" },
//!       "inward": { "key": "PROJ-1", "type": "End-to-end Test", "status": "Open" },
//!       "outward": { "key": "PROJ-10", "type": "Attribute", "status": "Done" } }
//!   ]
//! }
//! ```

use crate::error::TrackerError;
use e2e_links::IssueLink;
use e2e_model::{IssueKey, IssueType};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// An issue as fetched from the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Issue key
    pub key: IssueKey,
    /// Issue type
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Workflow status
    pub status: String,
    /// One-line summary
    #[serde(default)]
    pub summary: String,
    /// Stored description markup
    #[serde(default)]
    pub description: String,
    /// Custom field name to its values
    #[serde(default)]
    pub custom_fields: BTreeMap<String, Vec<String>>,
}

impl Issue {
    /// Create issue without description or custom fields
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        issue_type: impl Into<IssueType>,
        status: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            key: IssueKey::new(key),
            issue_type: issue_type.into(),
            status: status.into(),
            summary: summary.into(),
            description: String::new(),
            custom_fields: BTreeMap::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With a single-valued custom field
    #[inline]
    #[must_use]
    pub fn with_custom_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(name.into(), vec![value.into()]);
        self
    }

    /// Values of a custom field joined into one string, if the field is set
    #[must_use]
    pub fn custom_field(&self, name: &str) -> Option<String> {
        self.custom_fields.get(name).map(|values| values.concat())
    }
}

/// Read access to the tracker
#[async_trait::async_trait]
pub trait TrackerClient: Send + Sync {
    /// Fetch one issue
    async fn get_issue(&self, key: &IssueKey) -> Result<Issue, TrackerError>;

    /// Fetch every link the issue takes part in
    async fn get_links(&self, key: &IssueKey) -> Result<Vec<IssueLink>, TrackerError>;
}

/// Link type as stored by the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkType {
    /// Link type name
    pub name: String,
    /// Label read from the outward issue
    pub inward: String,
    /// Label read from the inward issue
    pub outward: String,
}

/// One end of a stored link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEnd {
    /// Issue key
    pub key: IssueKey,
    /// Issue type
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Workflow status
    #[serde(default)]
    pub status: String,
}

impl LinkEnd {
    /// Create link end
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        issue_type: impl Into<IssueType>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            key: IssueKey::new(key),
            issue_type: issue_type.into(),
            status: status.into(),
        }
    }
}

/// A link as stored once by the tracker, independent of either end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLink {
    /// Type with its two labels
    pub link_type: LinkType,
    /// Inward member
    pub inward: LinkEnd,
    /// Outward member
    pub outward: LinkEnd,
}

impl StoredLink {
    /// The link as fetched for `key`, if `key` is one of its members
    #[must_use]
    pub fn view_from(&self, key: &IssueKey) -> Option<IssueLink> {
        let other = if &self.inward.key == key {
            &self.outward
        } else if &self.outward.key == key {
            &self.inward
        } else {
            return None;
        };

        let link = IssueLink::new(
            self.inward.key.as_str(),
            self.outward.key.as_str(),
            self.link_type.inward.as_str(),
            self.link_type.outward.as_str(),
            other.issue_type.clone(),
        );
        Some(link.with_other_status(other.status.as_str()))
    }
}

/// Serialized tracker state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    /// Every known issue
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Every stored link
    #[serde(default)]
    pub links: Vec<StoredLink>,
}

#[derive(Debug, Default)]
struct TrackerState {
    issues: HashMap<IssueKey, Issue>,
    links: Vec<StoredLink>,
}

/// Tracker backed by an in-memory snapshot
#[derive(Debug, Default)]
pub struct InMemoryTracker {
    state: RwLock<TrackerState>,
}

impl InMemoryTracker {
    /// Create empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create tracker holding a snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: TrackerSnapshot) -> Self {
        let tracker = Self::new();
        for issue in snapshot.issues {
            tracker.insert_issue(issue);
        }
        for link in snapshot.links {
            tracker.insert_link(link);
        }
        tracker
    }

    /// Parse a JSON snapshot
    ///
    /// # Errors
    /// [`TrackerError::Snapshot`] for malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, TrackerError> {
        let snapshot: TrackerSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Read a JSON snapshot file
    ///
    /// # Errors
    /// [`TrackerError::Io`] or [`TrackerError::Snapshot`].
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| TrackerError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let tracker = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            issues = tracker.issue_count(),
            "loaded tracker snapshot"
        );
        Ok(tracker)
    }

    /// Add or replace an issue
    pub fn insert_issue(&self, issue: Issue) {
        self.state.write().issues.insert(issue.key.clone(), issue);
    }

    /// Add a link
    pub fn insert_link(&self, link: StoredLink) {
        self.state.write().links.push(link);
    }

    /// Number of known issues
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.state.read().issues.len()
    }
}

#[async_trait::async_trait]
impl TrackerClient for InMemoryTracker {
    async fn get_issue(&self, key: &IssueKey) -> Result<Issue, TrackerError> {
        self.state
            .read()
            .issues
            .get(key)
            .cloned()
            .ok_or_else(|| TrackerError::IssueNotFound(key.clone()))
    }

    async fn get_links(&self, key: &IssueKey) -> Result<Vec<IssueLink>, TrackerError> {
        let state = self.state.read();
        if !state.issues.contains_key(key) {
            return Err(TrackerError::IssueNotFound(key.clone()));
        }
        Ok(state.links.iter().filter_map(|link| link.view_from(key)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covers(from: &str, to: &str, to_type: &str) -> StoredLink {
        StoredLink {
            link_type: LinkType {
                name: "Covers".into(),
                inward: "is covered by".into(),
                outward: "covers".into(),
            },
            inward: LinkEnd::new(from, "End-to-end Test", "Open"),
            outward: LinkEnd::new(to, to_type, "Done"),
        }
    }

    #[test]
    fn view_from_either_end() {
        let link = covers("PROJ-1", "PROJ-10", "Attribute");

        let seen = link.view_from(&IssueKey::new("PROJ-1")).unwrap();
        assert_eq!(seen.other_issue_type, IssueType::Attribute);
        assert_eq!(seen.other_issue_status, "Done");

        let seen = link.view_from(&IssueKey::new("PROJ-10")).unwrap();
        assert_eq!(seen.other_issue_type, IssueType::EndToEndTest);
        assert_eq!(seen.inward_key, "PROJ-1");

        assert!(link.view_from(&IssueKey::new("PROJ-2")).is_none());
    }

    #[test]
    fn custom_field_values_are_joined() {
        let mut issue = Issue::new("PROJ-1", "End-to-end Test", "Open", "s");
        assert!(issue.custom_field("TestSuite Category").is_none());
        issue
            .custom_fields
            .insert("Labels".into(), vec!["Smo".into(), "ke".into()]);
        assert_eq!(issue.custom_field("Labels").as_deref(), Some("Smoke"));
    }

    #[tokio::test]
    async fn serves_issues_and_links() {
        let tracker = InMemoryTracker::new();
        tracker.insert_issue(Issue::new("PROJ-1", "End-to-end Test", "Open", "s"));
        tracker.insert_link(covers("PROJ-1", "PROJ-10", "Attribute"));
        tracker.insert_link(covers("PROJ-3", "PROJ-10", "Attribute"));

        let key = IssueKey::new("PROJ-1");
        assert_eq!(tracker.get_issue(&key).await.unwrap().status, "Open");
        assert_eq!(tracker.get_links(&key).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_issue_is_not_found() {
        let tracker = InMemoryTracker::new();
        let err = tracker.get_issue(&IssueKey::new("PROJ-9")).await.unwrap_err();
        assert!(matches!(err, TrackerError::IssueNotFound(key) if key == "PROJ-9"));
    }

    #[test]
    fn parses_snapshot_json() {
        let json = r#"{
            "issues": [{"key": "PROJ-1", "type": "End-to-end Test", "status": "Open",
                        "summary": "s", "customFields": {"TestSuite Category": ["Smoke"]}}],
            "links": [{"linkType": {"name": "Covers", "inward": "is covered by", "outward": "covers"},
                       "inward": {"key": "PROJ-1", "type": "End-to-end Test"},
                       "outward": {"key": "PROJ-10", "type": "Attribute"}}]
        }"#;
        let tracker = InMemoryTracker::from_json_str(json).unwrap();
        assert_eq!(tracker.issue_count(), 1);
        assert!(InMemoryTracker::from_json_str("{").is_err());
    }
}
