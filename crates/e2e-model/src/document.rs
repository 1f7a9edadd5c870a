//! Source document model
//!
//! The structured input a description is generated from: summary, business
//! goal, target ticket, five precondition categories of two-column rows and
//! an ordered list of two-column interaction steps.
//!
//! Documents are deserialized from YAML through a loose raw shape and then
//! checked into the typed model, so every [`SourceDocument`] in hand already
//! satisfies the load-time invariants (non-empty required fields, exactly two
//! items per row).

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Named precondition category, in rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreconditionCategory {
    /// Target environment
    Environment,
    /// Accounts used by the scenario
    UserCredentials,
    /// System-level settings
    SystemSettings,
    /// Application-level configuration
    ApplicationConfiguration,
    /// Data that must exist before the scenario
    DataPrerequisites,
}

impl PreconditionCategory {
    /// All categories in the fixed order they are rendered
    pub const ALL: [Self; 5] = [
        Self::Environment,
        Self::UserCredentials,
        Self::SystemSettings,
        Self::ApplicationConfiguration,
        Self::DataPrerequisites,
    ];

    /// Label used in the first column of the pre-conditions table
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Environment => "Environment",
            Self::UserCredentials => "User credentials",
            Self::SystemSettings => "System settings",
            Self::ApplicationConfiguration => "Application configuration",
            Self::DataPrerequisites => "Data prerequisites",
        }
    }
}

impl std::fmt::Display for PreconditionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One pre-condition row: an item and its reference links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRow {
    /// Pre-condition information
    pub item: String,
    /// Reference links for the item
    pub reference_links: String,
}

impl DataRow {
    /// Create row from its two cells
    #[inline]
    #[must_use]
    pub fn new(item: impl Into<String>, reference_links: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            reference_links: reference_links.into(),
        }
    }

    /// Row rendered for a category without any rows
    #[inline]
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new("N/A", "N/A")
    }

    /// Build row from raw items, rejecting anything but exactly two
    pub fn from_items(
        category: PreconditionCategory,
        items: Vec<String>,
    ) -> Result<Self, DocumentError> {
        let found = items.len();
        match <[String; 2]>::try_from(items) {
            Ok([item, links]) => Ok(Self::new(item, links)),
            Err(_) => Err(DocumentError::DataRowArity {
                category: category.label(),
                found,
            }),
        }
    }
}

/// One scenario step: what the user does and what should happen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRow {
    /// User interaction
    pub user_interaction: String,
    /// Expected outcome
    pub expected_outcome: String,
}

impl StepRow {
    /// Create step from its two cells
    #[inline]
    #[must_use]
    pub fn new(user_interaction: impl Into<String>, expected_outcome: impl Into<String>) -> Self {
        Self {
            user_interaction: user_interaction.into(),
            expected_outcome: expected_outcome.into(),
        }
    }

    /// Build step from raw items; `step` is 1-based and only used for errors
    pub fn from_items(step: usize, items: Vec<String>) -> Result<Self, DocumentError> {
        let found = items.len();
        match <[String; 2]>::try_from(items) {
            Ok([interaction, outcome]) => Ok(Self::new(interaction, outcome)),
            Err(_) => Err(DocumentError::StepRowArity { step, found }),
        }
    }

    /// Both cells, interaction first
    #[inline]
    #[must_use]
    pub fn cells(&self) -> [&str; 2] {
        [&self.user_interaction, &self.expected_outcome]
    }
}

/// Rows of the five precondition categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreconditionSet {
    environment: Vec<DataRow>,
    user_credentials: Vec<DataRow>,
    system_settings: Vec<DataRow>,
    application_configuration: Vec<DataRow>,
    data_prerequisites: Vec<DataRow>,
}

impl PreconditionSet {
    /// Create empty set (every category renders as placeholder)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace rows of a category
    #[must_use]
    pub fn with_rows(mut self, category: PreconditionCategory, rows: Vec<DataRow>) -> Self {
        *self.rows_mut(category) = rows;
        self
    }

    /// Rows of a category, possibly empty
    #[must_use]
    pub fn rows(&self, category: PreconditionCategory) -> &[DataRow] {
        match category {
            PreconditionCategory::Environment => &self.environment,
            PreconditionCategory::UserCredentials => &self.user_credentials,
            PreconditionCategory::SystemSettings => &self.system_settings,
            PreconditionCategory::ApplicationConfiguration => &self.application_configuration,
            PreconditionCategory::DataPrerequisites => &self.data_prerequisites,
        }
    }

    fn rows_mut(&mut self, category: PreconditionCategory) -> &mut Vec<DataRow> {
        match category {
            PreconditionCategory::Environment => &mut self.environment,
            PreconditionCategory::UserCredentials => &mut self.user_credentials,
            PreconditionCategory::SystemSettings => &mut self.system_settings,
            PreconditionCategory::ApplicationConfiguration => &mut self.application_configuration,
            PreconditionCategory::DataPrerequisites => &mut self.data_prerequisites,
        }
    }

    /// Iterate categories in rendering order with their rows
    pub fn iter(&self) -> impl Iterator<Item = (PreconditionCategory, &[DataRow])> + '_ {
        PreconditionCategory::ALL
            .into_iter()
            .map(move |category| (category, self.rows(category)))
    }
}

/// Validated source document
///
/// Immutable once constructed; fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    attribute: Option<String>,
    ticket_reference: String,
    summary: String,
    business_goal: String,
    preconditions: PreconditionSet,
    steps: Vec<StepRow>,
}

impl SourceDocument {
    /// Create document, checking required fields
    ///
    /// # Errors
    /// [`DocumentError::EmptyField`] when summary, business goal or ticket
    /// reference is empty or whitespace.
    pub fn new(
        ticket_reference: impl Into<String>,
        summary: impl Into<String>,
        business_goal: impl Into<String>,
        preconditions: PreconditionSet,
        steps: Vec<StepRow>,
    ) -> Result<Self, DocumentError> {
        let doc = Self {
            attribute: None,
            ticket_reference: ticket_reference.into(),
            summary: summary.into(),
            business_goal: business_goal.into(),
            preconditions,
            steps,
        };
        doc.check_required()?;
        Ok(doc)
    }

    /// With quality attribute name (blank names are dropped)
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        self.attribute = (!attribute.trim().is_empty()).then_some(attribute);
        self
    }

    fn check_required(&self) -> Result<(), DocumentError> {
        let required = [
            ("Summary", &self.summary),
            ("Business goal", &self.business_goal),
            ("Ticket", &self.ticket_reference),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DocumentError::EmptyField { field });
            }
        }
        Ok(())
    }

    /// Parse document from YAML text
    ///
    /// # Errors
    /// Syntax errors, empty required fields and row arity violations.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DocumentError> {
        let raw: RawDocument = serde_yaml::from_str(yaml)?;
        raw.into_document()
    }

    /// Quality attribute name, if the document names one
    #[inline]
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// URL or key of the ticket the description belongs to
    #[inline]
    #[must_use]
    pub fn ticket_reference(&self) -> &str {
        &self.ticket_reference
    }

    /// Ticket summary
    #[inline]
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Business goal sentence
    #[inline]
    #[must_use]
    pub fn business_goal(&self) -> &str {
        &self.business_goal
    }

    /// Precondition rows
    #[inline]
    #[must_use]
    pub fn preconditions(&self) -> &PreconditionSet {
        &self.preconditions
    }

    /// Steps in source order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[StepRow] {
        &self.steps
    }
}

/// Reads source documents from disk
///
/// A relative path that does not exist is retried against the fallback
/// directory (usually the directory the tool is installed in).
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    fallback_dir: Option<PathBuf>,
}

impl SourceLoader {
    /// Loader without fallback directory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With directory consulted when the path does not exist as given
    #[inline]
    #[must_use]
    pub fn with_fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fallback_dir = Some(dir.into());
        self
    }

    /// Resolve the file that would be read for `path`
    ///
    /// # Errors
    /// [`DocumentError::NotFound`] when neither location exists.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf, DocumentError> {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        if let Some(dir) = &self.fallback_dir {
            let candidate = dir.join(path);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(DocumentError::NotFound {
            path: path.to_path_buf(),
        })
    }

    /// Load and validate a document
    ///
    /// # Errors
    /// Missing file, IO failure, or any [`SourceDocument::from_yaml_str`] error.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<SourceDocument, DocumentError> {
        let resolved = self.resolve(path.as_ref())?;
        let text =
            fs::read_to_string(&resolved).map_err(|e| DocumentError::io_error(&resolved, e))?;
        let doc = SourceDocument::from_yaml_str(&text)?;
        tracing::debug!(
            path = %resolved.display(),
            steps = doc.steps().len(),
            "loaded source document"
        );
        Ok(doc)
    }
}

/// Loose on-disk shape, checked into [`SourceDocument`]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    attribute: Option<String>,
    #[serde(default, alias = "ticketReference")]
    ticket: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    business_goal: Option<String>,
    #[serde(default)]
    preconditions: Option<RawPreconditions>,
    #[serde(default)]
    steps: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPreconditions {
    #[serde(default)]
    environment: Option<Value>,
    #[serde(default)]
    user_credentials: Option<Value>,
    #[serde(default)]
    system_settings: Option<Value>,
    #[serde(default)]
    application_configuration: Option<Value>,
    #[serde(default)]
    data_prerequisites: Option<Value>,
}

/// Text of a scalar cell; YAML reads `8080` or `true` as non-strings
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn row_items(
    category: PreconditionCategory,
    cells: Vec<Value>,
) -> Result<Vec<String>, DocumentError> {
    cells
        .into_iter()
        .map(|cell| {
            scalar_text(cell).ok_or(DocumentError::MalformedData {
                category: category.label(),
                reason: "item is not text",
            })
        })
        .collect()
}

/// A category is absent, one flat row, or a list of rows
fn category_rows(
    category: PreconditionCategory,
    section: Value,
) -> Result<Vec<DataRow>, DocumentError> {
    let items = match section {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        _ => {
            return Err(DocumentError::MalformedData {
                category: category.label(),
                reason: "expected a list",
            })
        }
    };
    if items.is_empty() {
        return Ok(Vec::new());
    }

    if !items.iter().any(Value::is_sequence) {
        return Ok(vec![DataRow::from_items(category, row_items(category, items)?)?]);
    }

    items
        .into_iter()
        .map(|row| match row {
            Value::Sequence(cells) => DataRow::from_items(category, row_items(category, cells)?),
            _ => Err(DocumentError::MalformedData {
                category: category.label(),
                reason: "rows and items are mixed",
            }),
        })
        .collect()
}

impl RawPreconditions {
    fn take(&mut self, category: PreconditionCategory) -> Option<Value> {
        match category {
            PreconditionCategory::Environment => self.environment.take(),
            PreconditionCategory::UserCredentials => self.user_credentials.take(),
            PreconditionCategory::SystemSettings => self.system_settings.take(),
            PreconditionCategory::ApplicationConfiguration => self.application_configuration.take(),
            PreconditionCategory::DataPrerequisites => self.data_prerequisites.take(),
        }
    }
}

impl RawDocument {
    fn into_document(self) -> Result<SourceDocument, DocumentError> {
        // Required fields first, then rows.
        let required = SourceDocument {
            attribute: None,
            ticket_reference: self.ticket.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            business_goal: self.business_goal.unwrap_or_default(),
            preconditions: PreconditionSet::new(),
            steps: Vec::new(),
        };
        required.check_required()?;

        let mut raw = self.preconditions.unwrap_or_default();
        let mut preconditions = PreconditionSet::new();
        for category in PreconditionCategory::ALL {
            if let Some(section) = raw.take(category) {
                preconditions = preconditions.with_rows(category, category_rows(category, section)?);
            }
        }

        let steps = self
            .steps
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, items)| StepRow::from_items(i + 1, items))
            .collect::<Result<Vec<_>, _>>()?;

        let doc = SourceDocument {
            preconditions,
            steps,
            ..required
        };
        Ok(match self.attribute {
            Some(attribute) => doc.with_attribute(attribute),
            None => doc,
        })
    }
}
