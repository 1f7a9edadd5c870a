//! Subcommand implementations
//!
//! Each command writes its report to `out` and returns whether the checked
//! thing passed; rejections come back as errors.

use anyhow::{Context, Result};
use e2e_audit::{CreationPlanner, InMemoryTracker, TicketAuditor, ToolConfig};
use e2e_description::render as render_description;
use e2e_model::{SourceDocument, SourceLoader};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Result of a command that did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report
    Passed,
    /// Diagnostics were reported
    Failed,
}

impl Outcome {
    /// Process exit code
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::Failed => 1,
        }
    }
}

fn load_document(loader: &SourceLoader, source: &Path) -> Result<SourceDocument> {
    loader
        .load(source)
        .with_context(|| format!("failed to load source document {}", source.display()))
}

async fn load_tracker(snapshot: &Path) -> Result<InMemoryTracker> {
    InMemoryTracker::from_file(snapshot)
        .await
        .with_context(|| format!("failed to load tracker snapshot {}", snapshot.display()))
}

/// Print the description generated from a source document
///
/// # Errors
/// When the document cannot be loaded or rendered.
pub fn render(loader: &SourceLoader, source: &Path, out: &mut dyn Write) -> Result<Outcome> {
    let doc = load_document(loader, source)?;
    let description = render_description(&doc)
        .with_context(|| format!("failed to render {}", source.display()))?;
    info!(source = %source.display(), steps = doc.steps().len(), "rendered description");
    out.write_all(description.as_str().as_bytes())?;
    Ok(Outcome::Passed)
}

/// Validate a stored description
///
/// # Errors
/// When the file cannot be read, the pattern is invalid or the description
/// is empty.
pub fn validate(config: &ToolConfig, description: &Path, out: &mut dyn Write) -> Result<Outcome> {
    let text = std::fs::read_to_string(description)
        .with_context(|| format!("failed to read description {}", description.display()))?;
    let diagnostics = config.description_validator()?.validate(&text)?;

    if diagnostics.is_empty() {
        writeln!(out, "Passed")?;
        return Ok(Outcome::Passed);
    }
    writeln!(out, "Failed")?;
    for diagnostic in &diagnostics {
        writeln!(out, " - {diagnostic}")?;
    }
    Ok(Outcome::Failed)
}

/// Audit a ticket against a tracker snapshot
///
/// # Errors
/// When the snapshot cannot be loaded or the audit is rejected.
pub async fn check(
    config: &ToolConfig,
    snapshot: &Path,
    ticket: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let tracker = load_tracker(snapshot).await?;
    let auditor = TicketAuditor::new(config, Arc::new(tracker))?;
    let report = auditor
        .audit(ticket)
        .await
        .with_context(|| format!("failed to check {ticket}"))?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(out, "{report}")?;
    }
    Ok(if report.passed() {
        Outcome::Passed
    } else {
        Outcome::Failed
    })
}

/// Print the changes that bring a ticket in line with a source document
///
/// # Errors
/// When inputs cannot be loaded or a precondition rejects the ticket.
pub async fn plan(
    config: &ToolConfig,
    loader: &SourceLoader,
    snapshot: &Path,
    source: &Path,
    json: bool,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let doc = load_document(loader, source)?;
    let tracker = load_tracker(snapshot).await?;
    let planner = CreationPlanner::new(config.clone(), Arc::new(tracker))?;
    let plan = planner
        .plan(&doc)
        .await
        .with_context(|| format!("failed to plan {}", doc.ticket_reference()))?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&plan)?)?;
    } else {
        write!(out, "{plan}")?;
    }
    Ok(Outcome::Passed)
}
