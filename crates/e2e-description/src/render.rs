//! Description renderer
//!
//! Turns a [`SourceDocument`] into the canonical wiki markup stored on the
//! ticket. Output is byte-identical for equal input; rendering either
//! produces the whole text or fails.

use crate::error::RenderError;
use e2e_model::rules::{first_violation, TextRule};
use e2e_model::{DataRow, SourceDocument, STEP_RULES};
use std::fmt::Write as _;

/// Header opening every description
pub const BUSINESS_GOAL_HEADER: &str = "h2. Business Goal";
/// Header of the pre-conditions table
pub const PRECONDITIONS_HEADER: &str = "h2. Pre-Conditions";
/// Header of the scenario table
pub const SCENARIO_HEADER: &str = "h2. Scenario";
/// Column headers of the pre-conditions table
pub const PRECONDITIONS_COLUMNS: &str =
    "||Pre-condition Item||Pre-condition information||Reference links||";
/// Column headers of the scenario table
pub const SCENARIO_COLUMNS: &str = "||Seq#||User Interaction sequence||Expected outcome||";

/// Label used for rows continuing the category above
const CONTINUATION_LABEL: &str = " ";

/// Canonical description text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderedDescription(String);

impl RenderedDescription {
    /// Text as stored on the ticket
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the text
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RenderedDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RenderedDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Render with the default step rules
///
/// # Errors
/// [`RenderError::RuleViolation`] for the first step cell breaking a rule.
pub fn render(doc: &SourceDocument) -> Result<RenderedDescription, RenderError> {
    DescriptionRenderer::new().render(doc)
}

/// Renderer holding the rule table steps are checked against
#[derive(Debug, Clone, Copy)]
pub struct DescriptionRenderer {
    rules: &'static [TextRule],
}

impl Default for DescriptionRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptionRenderer {
    /// Renderer with [`STEP_RULES`]
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { rules: STEP_RULES }
    }

    /// Renderer with a custom rule table
    #[inline]
    #[must_use]
    pub fn with_rules(rules: &'static [TextRule]) -> Self {
        Self { rules }
    }

    /// Render document into description markup
    ///
    /// # Errors
    /// [`RenderError::RuleViolation`] for the first step cell breaking a rule.
    pub fn render(&self, doc: &SourceDocument) -> Result<RenderedDescription, RenderError> {
        self.check_steps(doc)?;

        let mut out = String::new();
        push_line(&mut out, BUSINESS_GOAL_HEADER);
        push_line(&mut out, "");
        push_line(&mut out, &format!("| {} |", doc.business_goal()));

        push_line(&mut out, PRECONDITIONS_HEADER);
        push_line(&mut out, "");
        push_line(&mut out, PRECONDITIONS_COLUMNS);
        for (category, rows) in doc.preconditions().iter() {
            if rows.is_empty() {
                push_row(&mut out, category.label(), &DataRow::placeholder());
                continue;
            }
            for (i, row) in rows.iter().enumerate() {
                let label = if i == 0 { category.label() } else { CONTINUATION_LABEL };
                push_row(&mut out, label, row);
            }
        }

        push_line(&mut out, SCENARIO_HEADER);
        push_line(&mut out, "");
        push_line(&mut out, SCENARIO_COLUMNS);
        for (i, step) in doc.steps().iter().enumerate() {
            let _ = writeln!(
                out,
                "||{}| {} | {} |",
                i + 1,
                step.user_interaction.trim(),
                step.expected_outcome.trim()
            );
        }

        tracing::debug!(
            steps = doc.steps().len(),
            bytes = out.len(),
            "rendered description"
        );
        Ok(RenderedDescription(out))
    }

    fn check_steps(&self, doc: &SourceDocument) -> Result<(), RenderError> {
        for (i, step) in doc.steps().iter().enumerate() {
            let number = i + 1;
            for cell in step.cells() {
                if let Some(rule) = first_violation(self.rules, cell) {
                    tracing::warn!(rule = rule.id, step = number, "{}", rule.description);
                    return Err(RenderError::RuleViolation {
                        rule: rule.id,
                        step: number,
                        message: rule.message_for(number),
                    });
                }
            }
        }
        Ok(())
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_row(out: &mut String, label: &str, row: &DataRow) {
    let _ = writeln!(
        out,
        "||{}| {} | {} |",
        label,
        row.item.trim(),
        row.reference_links.trim()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use e2e_model::{PreconditionCategory, PreconditionSet, StepRow};
    use pretty_assertions::assert_eq;

    fn doc(preconditions: PreconditionSet, steps: Vec<StepRow>) -> SourceDocument {
        SourceDocument::new(
            "https://tracker.example.com/browse/PROJ-1",
            "Summary",
            "User can log in",
            preconditions,
            steps,
        )
        .unwrap()
    }

    #[test]
    fn renders_full_template() {
        let preconditions = PreconditionSet::new()
            .with_rows(
                PreconditionCategory::Environment,
                vec![DataRow::new(" Staging ", "https://staging")],
            )
            .with_rows(
                PreconditionCategory::UserCredentials,
                vec![
                    DataRow::new("Admin", "https://vault/admin"),
                    DataRow::new("Guest", "https://vault/guest"),
                ],
            );
        let steps = vec![
            StepRow::new("Open login page", "Form is shown"),
            StepRow::new("  Submit  ", " Dashboard "),
        ];

        let rendered = render(&doc(preconditions, steps)).unwrap();

        let expected = "\
h2. Business Goal

| User can log in |
h2. Pre-Conditions

||Pre-condition Item||Pre-condition information||Reference links||
||Environment| Staging | https://staging |
||User credentials| Admin | https://vault/admin |
|| | Guest | https://vault/guest |
||System settings| N/A | N/A |
||Application configuration| N/A | N/A |
||Data prerequisites| N/A | N/A |
h2. Scenario

||Seq#||User Interaction sequence||Expected outcome||
||1| Open login page | Form is shown |
||2| Submit | Dashboard |
";
        assert_eq!(rendered.as_str(), expected);
    }

    #[test]
    fn empty_category_renders_placeholder() {
        let rendered = render(&doc(PreconditionSet::new(), Vec::new())).unwrap();
        assert!(rendered.as_str().contains("||Environment| N/A | N/A |\n"));
        assert!(rendered.as_str().contains("||Data prerequisites| N/A | N/A |\n"));
    }

    #[test]
    fn render_is_deterministic() {
        let d = doc(
            PreconditionSet::new(),
            vec![StepRow::new("a", "b"), StepRow::new("c", "d")],
        );
        assert_eq!(render(&d).unwrap(), render(&d).unwrap());
    }

    #[test]
    fn typo_in_outcome_rejects_render() {
        let d = doc(
            PreconditionSet::new(),
            vec![
                StepRow::new("Open page", "Shown"),
                StepRow::new("Wait", "Response in LESS THEN 2s"),
            ],
        );
        let err = render(&d).unwrap_err();
        assert_eq!(
            err,
            RenderError::RuleViolation {
                rule: "typo-less-then",
                step: 2,
                message: "Typo \"less then\" found in the step 2".to_string(),
            }
        );
    }

    #[test]
    fn custom_rules_are_applied() {
        fn has_todo(cell: &str) -> bool {
            cell.contains("TODO")
        }

        static NO_TODO: &[TextRule] = &[TextRule {
            id: "no-todo",
            description: "unfinished step",
            matches: has_todo,
            message: "Step {step} is unfinished",
        }];

        let d = doc(PreconditionSet::new(), vec![StepRow::new("TODO", "x")]);
        let err = DescriptionRenderer::with_rules(NO_TODO).render(&d).unwrap_err();
        assert_eq!(err.to_string(), "Step 1 is unfinished");

        // The default typo rule is not part of the custom table.
        let d = doc(PreconditionSet::new(), vec![StepRow::new("less then", "x")]);
        assert!(DescriptionRenderer::with_rules(NO_TODO).render(&d).is_ok());
    }
}
