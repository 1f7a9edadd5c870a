//! Tool configuration
//!
//! Read from a camelCase JSON file:
//!
//! ```json
//! {
//!   "projectName": "PROJ",
//!   "businessGoalRegex": "^As a .+ I want",
//!   "sourceFile": "scenario.yaml",
//!   "attributes": { "Secure": "PROJ-10", "Fast": "PROJ-11" }
//! }
//! ```

use crate::error::ConfigError;
use e2e_description::DescriptionValidator;
use e2e_model::{IssueKey, ProjectKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    /// Tracker project prefix of every issue key
    #[serde(alias = "jiraProjectName")]
    pub project_name: String,
    /// Pattern a business goal must match
    pub business_goal_regex: String,
    /// Source document used when none is given on the command line
    #[serde(default, alias = "yamlFile")]
    pub source_file: Option<PathBuf>,
    /// Attribute name to the issue representing it
    #[serde(default)]
    pub attributes: BTreeMap<String, IssueKey>,
}

impl ToolConfig {
    /// Create configuration for a project
    #[must_use]
    pub fn new(project_name: impl Into<String>, business_goal_regex: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            business_goal_regex: business_goal_regex.into(),
            ..Self::default()
        }
    }

    /// Load and validate configuration from a JSON file
    ///
    /// # Errors
    /// IO, JSON and validation failures.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), project = %config.project_name, "loaded config");
        Ok(config)
    }

    /// Parse and validate configuration from JSON text
    ///
    /// # Errors
    /// JSON and validation failures.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the project name and business goal pattern are usable
    ///
    /// # Errors
    /// [`ConfigError::EmptyProjectName`], [`ConfigError::Project`] or
    /// [`ConfigError::BusinessGoal`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.project_key()?;
        self.description_validator()?;
        Ok(())
    }

    /// Compiled project prefix
    ///
    /// # Errors
    /// When the project name is empty or malformed.
    pub fn project_key(&self) -> Result<ProjectKey, ConfigError> {
        if self.project_name.trim().is_empty() {
            return Err(ConfigError::EmptyProjectName);
        }
        Ok(ProjectKey::new(self.project_name.trim())?)
    }

    /// Validator for stored descriptions
    ///
    /// # Errors
    /// When the business goal pattern does not compile.
    pub fn description_validator(&self) -> Result<DescriptionValidator, ConfigError> {
        Ok(DescriptionValidator::new(&self.business_goal_regex)?)
    }

    /// Issue configured for an attribute
    #[must_use]
    pub fn attribute_issue(&self, attribute: &str) -> Option<&IssueKey> {
        self.attributes.get(attribute)
    }

    /// With attribute issue
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>, issue: impl Into<String>) -> Self {
        self.attributes.insert(attribute.into(), IssueKey::new(issue));
        self
    }

    /// With default source document
    #[inline]
    #[must_use]
    pub fn with_source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = Some(path.into());
        self
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            business_goal_regex: ".+".to_string(),
            source_file: None,
            attributes: BTreeMap::new(),
        }
    }
}
