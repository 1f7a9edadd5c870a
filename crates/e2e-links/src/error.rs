//! Error types for link checking

use crate::edge::IssueLink;
use e2e_model::IssueKey;

/// Errors that abort a link check
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// The checked issue is not a member of a link returned for it
    #[error("Unknown link: {issue} is neither {inward} nor {outward}")]
    NotAParticipant {
        /// Issue being checked
        issue: IssueKey,
        /// Inward member of the link
        inward: IssueKey,
        /// Outward member of the link
        outward: IssueKey,
    },
}

impl LinkError {
    /// Create not-a-participant error for a link
    #[must_use]
    pub fn not_a_participant(issue: &IssueKey, link: &IssueLink) -> Self {
        Self::NotAParticipant {
            issue: issue.clone(),
            inward: link.inward_key.clone(),
            outward: link.outward_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_participant_display() {
        let link = IssueLink::new("PROJ-2", "PROJ-3", "a", "b", "Attribute");
        let err = LinkError::not_a_participant(&IssueKey::new("PROJ-1"), &link);
        assert_eq!(
            err.to_string(),
            "Unknown link: PROJ-1 is neither PROJ-2 nor PROJ-3"
        );
    }
}
