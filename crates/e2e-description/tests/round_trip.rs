use e2e_description::{render, validate, RenderError};
use e2e_model::{DataRow, DiagnosticKind, PreconditionCategory, PreconditionSet, SourceDocument, StepRow};
use proptest::prelude::*;

const GOAL_PATTERN: &str = "^User can ";

fn cell() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ,.:/-]{0,30}"
        .prop_filter("typo guard", |s| !s.to_lowercase().contains("less then"))
}

fn data_rows() -> impl Strategy<Value = Vec<DataRow>> {
    proptest::collection::vec((cell(), cell()), 0..4)
        .prop_map(|rows| rows.into_iter().map(|(a, b)| DataRow::new(a, b)).collect())
}

fn steps(max: usize) -> impl Strategy<Value = Vec<StepRow>> {
    proptest::collection::vec((cell(), cell()), 0..max)
        .prop_map(|rows| rows.into_iter().map(|(a, b)| StepRow::new(a, b)).collect())
}

fn document(max_steps: usize) -> impl Strategy<Value = SourceDocument> {
    (
        "[a-z][a-z ]{0,20}",
        proptest::collection::vec(data_rows(), 5),
        steps(max_steps),
    )
        .prop_map(|(goal, categories, steps)| {
            let preconditions = PreconditionCategory::ALL
                .into_iter()
                .zip(categories)
                .fold(PreconditionSet::new(), |set, (category, rows)| {
                    set.with_rows(category, rows)
                });
            SourceDocument::new(
                "https://tracker.example.com/browse/PROJ-1",
                "Generated scenario",
                format!("User can {goal}"),
                preconditions,
                steps,
            )
            .unwrap()
        })
}

proptest! {
    #[test]
    fn prop_rendered_descriptions_validate_clean(doc in document(10)) {
        let rendered = render(&doc).unwrap();
        let diagnostics = validate(rendered.as_str(), GOAL_PATTERN).unwrap();
        prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn prop_renumbered_step_is_reported(
        doc in document(10).prop_filter("at least two steps", |d| d.steps().len() >= 2),
        pick in any::<prop::sample::Index>(),
        offset in 1usize..5,
    ) {
        // Step 1 anchors the scenario table, so only later steps are renumbered.
        let n = doc.steps().len();
        let target = 2 + pick.index(n - 1);
        let wrong = target + offset;

        let rendered = render(&doc).unwrap().into_string();
        let tampered = rendered.replacen(&format!("||{target}|"), &format!("||{wrong}|"), 1);

        let diagnostics = validate(&tampered, GOAL_PATTERN).unwrap();
        prop_assert_eq!(diagnostics.len(), 1);
        prop_assert_eq!(diagnostics[0].kind, DiagnosticKind::WrongNumeration);
        prop_assert_eq!(
            &diagnostics[0].message,
            &format!("Wrong numeration: expected step {target}, but step {wrong} found")
        );
    }

    #[test]
    fn prop_typo_rejects_render_anywhere(
        doc in document(6).prop_filter("at least one step", |d| !d.steps().is_empty()),
        pick in any::<prop::sample::Index>(),
        in_outcome in any::<bool>(),
        upper in any::<bool>(),
    ) {
        let typo = if upper { "LESS THEN" } else { "less Then" };
        let index = pick.index(doc.steps().len());
        let mut steps = doc.steps().to_vec();
        if in_outcome {
            steps[index].expected_outcome.push_str(&format!(" {typo} 5"));
        } else {
            steps[index].user_interaction.insert_str(0, typo);
        }
        let tampered = SourceDocument::new(
            doc.ticket_reference(),
            doc.summary(),
            doc.business_goal(),
            doc.preconditions().clone(),
            steps,
        )
        .unwrap();

        let err = render(&tampered).unwrap_err();
        let RenderError::RuleViolation { step, .. } = err;
        prop_assert_eq!(step, index + 1);
    }
}

#[test]
fn empty_categories_render_placeholder_pairs() {
    let doc = SourceDocument::new(
        "PROJ-1",
        "Summary",
        "User can do things",
        PreconditionSet::new(),
        vec![StepRow::new("a", "b")],
    )
    .unwrap();

    let rendered = render(&doc).unwrap();
    for category in PreconditionCategory::ALL {
        let line = format!("||{}| N/A | N/A |", category.label());
        assert!(rendered.as_str().contains(&line), "missing {line}");
    }
    assert!(validate(rendered.as_str(), GOAL_PATTERN).unwrap().is_empty());
}

#[test]
fn yaml_document_round_trips() {
    let yaml = r#"
ticket: https://tracker.example.com/browse/PROJ-5
summary: Checkout
businessGoal: User can pay for the order
preconditions:
  environment: [Staging, https://staging]
  dataPrerequisites:
    - [Cart with items, https://wiki/cart]
    - [Saved card, https://wiki/card]
steps:
  - [Open cart, Cart is shown]
  - [Press pay, Payment form is shown]
  - [Confirm, Order is placed]
"#;
    let doc = SourceDocument::from_yaml_str(yaml).unwrap();
    let rendered = render(&doc).unwrap();

    assert!(rendered.as_str().contains("||Data prerequisites| Cart with items | https://wiki/cart |\n|| | Saved card | https://wiki/card |\n"));
    assert!(rendered.as_str().ends_with("||3| Confirm | Order is placed |\n"));
    assert!(validate(rendered.as_str(), GOAL_PATTERN).unwrap().is_empty());
}
