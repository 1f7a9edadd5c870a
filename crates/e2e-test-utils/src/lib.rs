//! Testing utilities for the E2E tools workspace
//!
//! Shared fixtures: a sample source document, a matching configuration and
//! a builder for tracker snapshots.

#![allow(missing_docs)]

use e2e_audit::{
    InMemoryTracker, Issue, LinkEnd, LinkType, StoredLink, ToolConfig, TrackerSnapshot,
    TEST_SUITE_CATEGORY,
};
use e2e_description::render;
use e2e_model::SourceDocument;

pub const PROJECT: &str = "PROJ";
pub const TICKET: &str = "PROJ-1";
pub const ATTRIBUTE_ISSUE: &str = "PROJ-10";
pub const FUNCTIONAL_AREA: &str = "PROJ-20";
pub const DEPENDENCY: &str = "PROJ-42";
pub const BUSINESS_GOAL_REGEX: &str = "^User can";
pub const TICKET_SUMMARY: &str = "Create ACC E2E scenario for FA PROJ-20 - Secure";

pub const SAMPLE_YAML: &str = r#"
attribute: Secure
ticket: https://tracker.example.com/browse/PROJ-1
summary: Login is protected
businessGoal: User can log in only with valid credentials
preconditions:
  environment: [Staging, https://staging.example.com]
  userCredentials:
    - [Admin user, https://vault/admin]
    - [Guest user, https://vault/guest]
  dataPrerequisites: [Scenario PROJ-42 completed, https://tracker.example.com/browse/PROJ-42]
steps:
  - [Open login page, Login form is shown]
  - [Submit invalid credentials, Error is shown]
  - [Submit valid credentials, Dashboard is shown in less than 2 seconds]
"#;

pub fn sample_document() -> SourceDocument {
    SourceDocument::from_yaml_str(SAMPLE_YAML).unwrap()
}

pub fn sample_description() -> String {
    render(&sample_document()).unwrap().into_string()
}

pub fn sample_config() -> ToolConfig {
    ToolConfig::new(PROJECT, BUSINESS_GOAL_REGEX).with_attribute("Secure", ATTRIBUTE_ISSUE)
}

pub fn e2e_ticket(key: &str, status: &str) -> Issue {
    Issue::new(key, "End-to-end Test", status, TICKET_SUMMARY)
}

fn link_type(name: &str, inward: &str, outward: &str) -> LinkType {
    LinkType {
        name: name.to_string(),
        inward: inward.to_string(),
        outward: outward.to_string(),
    }
}

/// Builds tracker snapshots link by link
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: TrackerSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(mut self, issue: Issue) -> Self {
        self.snapshot.issues.push(issue);
        self
    }

    pub fn link(mut self, link_type: LinkType, inward: LinkEnd, outward: LinkEnd) -> Self {
        self.snapshot.links.push(StoredLink {
            link_type,
            inward,
            outward,
        });
        self
    }

    /// `test` covers `target`; seen from `test` the relation is "covers"
    pub fn covers(self, test: &str, target: &str, target_type: &str) -> Self {
        self.link(
            link_type("Covers", "is covered by", "covers"),
            LinkEnd::new(test, "End-to-end Test", "Open"),
            LinkEnd::new(target, target_type, "Done"),
        )
    }

    /// `test` depends on `dependency`; seen from `test` the relation is "depends on"
    pub fn depends_on(self, test: &str, dependency: &str) -> Self {
        self.link(
            link_type("Dependency", "depends on", "is depended on by"),
            LinkEnd::new(dependency, "End-to-end Test", "Closed"),
            LinkEnd::new(test, "End-to-end Test", "Open"),
        )
    }

    /// `test` relates to `target`
    pub fn relates(self, test: &str, target: &str, target_type: &str, target_status: &str) -> Self {
        self.link(
            link_type("Relates", "relates to", "relates to"),
            LinkEnd::new(test, "End-to-end Test", "Open"),
            LinkEnd::new(target, target_type, target_status),
        )
    }

    pub fn build(self) -> TrackerSnapshot {
        self.snapshot
    }

    pub fn tracker(self) -> InMemoryTracker {
        InMemoryTracker::from_snapshot(self.snapshot)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.snapshot).unwrap()
    }
}

/// Snapshot in which [`TICKET`] passes the audit
pub fn passing_snapshot() -> SnapshotBuilder {
    SnapshotBuilder::new()
        .issue(
            e2e_ticket(TICKET, "E2E Definition")
                .with_description(sample_description())
                .with_custom_field(TEST_SUITE_CATEGORY, "Smoke"),
        )
        .issue(Issue::new(ATTRIBUTE_ISSUE, "Attribute", "Done", "Secure"))
        .issue(Issue::new(FUNCTIONAL_AREA, "Functional Area", "Done", "Login"))
        .issue(Issue::new(DEPENDENCY, "End-to-end Test", "Closed", "Sign up"))
        .covers(TICKET, ATTRIBUTE_ISSUE, "Attribute")
        .covers(TICKET, FUNCTIONAL_AREA, "Functional Area")
        .depends_on(TICKET, DEPENDENCY)
}
