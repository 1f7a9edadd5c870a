//! Project prefixes and issue keys
//!
//! Issue keys have the form `<PROJECT>-<digits>`. A [`ProjectKey`] carries the
//! prefix and the patterns derived from it; it is built once from
//! configuration and reused for every extraction.

use crate::error::KeyError;
use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tracker issue key such as `PROJ-123`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    /// Wrap a key already known to be well-formed (e.g. returned by the tracker)
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Extract the key from a ticket URL or bare key
    ///
    /// A reference containing `://` must use the `https://` scheme and end
    /// with the key; anything else must be exactly a key.
    ///
    /// # Errors
    /// [`KeyError::UnknownTicket`] when neither form applies.
    pub fn extract(reference: &str, project: &ProjectKey) -> Result<Self, KeyError> {
        let reference = reference.trim();
        let unknown = || KeyError::UnknownTicket {
            reference: reference.to_string(),
        };

        if reference.contains("://") {
            let secure = reference
                .get(..HTTPS.len())
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case(HTTPS));
            if !secure {
                return Err(unknown());
            }
            return project
                .trailing
                .find(reference)
                .map(|m| Self::new(m.as_str()))
                .ok_or_else(unknown);
        }

        if project.exact.is_match(reference) {
            Ok(Self::new(reference))
        } else {
            Err(unknown())
        }
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for IssueKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for IssueKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

const HTTPS: &str = "https://";

/// Project prefix with its compiled key patterns
#[derive(Debug, Clone)]
pub struct ProjectKey {
    name: String,
    mention: Regex,
    trailing: Regex,
    exact: Regex,
}

impl ProjectKey {
    /// Build from project prefix (letters, digits and underscores)
    ///
    /// # Errors
    /// [`KeyError::InvalidProject`] for an empty or malformed prefix.
    pub fn new(name: impl Into<String>) -> Result<Self, KeyError> {
        let name = name.into();
        let well_formed =
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !well_formed {
            return Err(KeyError::InvalidProject(name));
        }

        let key = format!(r"{}-\d+", regex::escape(&name));
        let compile =
            |pattern: String| Regex::new(&pattern).map_err(|_| KeyError::InvalidProject(name.clone()));

        Ok(Self {
            mention: compile(key.clone())?,
            trailing: compile(format!("{key}$"))?,
            exact: compile(format!("^{key}$"))?,
            name,
        })
    }

    /// Project prefix
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every key of this project mentioned in `text`
    ///
    /// Deduplicated, in order of first occurrence.
    #[must_use]
    pub fn mentioned_keys(&self, text: &str) -> IndexSet<IssueKey> {
        self.mention
            .find_iter(text)
            .map(|m| IssueKey::new(m.as_str()))
            .collect()
    }
}

impl PartialEq for ProjectKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ProjectKey {}
