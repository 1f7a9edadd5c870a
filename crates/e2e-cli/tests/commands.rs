use e2e_cli::{cli, log_level, run, Outcome};
use e2e_test_utils::{passing_snapshot, sample_description, SAMPLE_YAML};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = r#"{
            "projectName": "PROJ",
            "businessGoalRegex": "^User can",
            "sourceFile": "SOURCE",
            "attributes": { "Secure": "PROJ-10" }
        }"#
        .replace("SOURCE", &dir.path().join("scenario.yaml").display().to_string());
        std::fs::write(dir.path().join("options.json"), config).unwrap();
        std::fs::write(dir.path().join("scenario.yaml"), SAMPLE_YAML).unwrap();
        std::fs::write(dir.path().join("snapshot.json"), passing_snapshot().to_json()).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    async fn run(&self, args: &[&str]) -> (anyhow::Result<Outcome>, String) {
        let config = self.path("options.json");
        let mut argv = vec!["e2e-tools", "--config", path_str(&config)];
        argv.extend_from_slice(args);

        let matches = cli().try_get_matches_from(argv).unwrap();
        let mut out = Vec::new();
        let outcome = run(&matches, &mut out).await;
        (outcome, String::from_utf8(out).unwrap())
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[tokio::test]
async fn render_uses_configured_source() {
    let ws = Workspace::new();
    let (outcome, out) = ws.run(&["render"]).await;
    assert_eq!(outcome.unwrap(), Outcome::Passed);
    assert_eq!(out, sample_description());
}

#[tokio::test]
async fn validate_reports_diagnostics() {
    let ws = Workspace::new();
    let good = ws.write("good.txt", &sample_description());
    let (outcome, out) = ws.run(&["validate", "--description", path_str(&good)]).await;
    assert_eq!(outcome.unwrap(), Outcome::Passed);
    assert_eq!(out, "Passed\n");

    let bad = ws.write("bad.txt", &sample_description().replace("User can", "Users may"));
    let (outcome, out) = ws.run(&["validate", "--description", path_str(&bad)]).await;
    assert_eq!(outcome.unwrap(), Outcome::Failed);
    assert_eq!(out, "Failed\n - Business goal should regard QB rules\n");
}

#[tokio::test]
async fn check_prints_report() {
    let ws = Workspace::new();
    let snapshot = ws.path("snapshot.json");
    let (outcome, out) = ws
        .run(&["check", "--snapshot", path_str(&snapshot), "PROJ-1"])
        .await;
    assert_eq!(outcome.unwrap(), Outcome::Passed);
    assert_eq!(out, "Attributes linked: 1\nFunctional Areas linked: 1\nPassed\n");
}

#[tokio::test]
async fn check_as_json() {
    let ws = Workspace::new();
    let snapshot = ws.path("snapshot.json");
    let (outcome, out) = ws
        .run(&["check", "--snapshot", path_str(&snapshot), "--json", "PROJ-1"])
        .await;
    assert_eq!(outcome.unwrap(), Outcome::Passed);
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["issueKey"], "PROJ-1");
    assert_eq!(report["attributeLinks"], 1);
}

#[tokio::test]
async fn check_rejects_unknown_reference() {
    let ws = Workspace::new();
    let snapshot = ws.path("snapshot.json");
    let (outcome, out) = ws
        .run(&["check", "--snapshot", path_str(&snapshot), "OTHER-1"])
        .await;
    let err = outcome.unwrap_err();
    assert!(format!("{err:#}").contains("Unknown jira ticket: OTHER-1"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn plan_prints_changes() {
    let ws = Workspace::new();
    let snapshot = ws.path("snapshot.json");
    let (outcome, out) = ws.run(&["plan", "--snapshot", path_str(&snapshot)]).await;
    assert_eq!(outcome.unwrap(), Outcome::Passed);
    assert!(out.starts_with("Ticket: PROJ-1\nSummary: Login is protected\n"));
    assert!(out.ends_with(&sample_description()));
}

#[tokio::test]
async fn missing_config_is_an_error() {
    let ws = Workspace::new();
    std::fs::remove_file(ws.path("options.json")).unwrap();
    let (outcome, _) = ws.run(&["render"]).await;
    assert!(format!("{:#}", outcome.unwrap_err()).contains("failed to load config"));
}

#[test]
fn log_level_flag_is_global() {
    let matches = cli()
        .try_get_matches_from(["e2e-tools", "render", "--log-level", "debug"])
        .unwrap();
    assert_eq!(log_level(&matches), Some("debug"));

    let matches = cli().try_get_matches_from(["e2e-tools", "render"]).unwrap();
    assert_eq!(log_level(&matches), None);
}

#[test]
fn subcommand_is_required() {
    assert!(cli().try_get_matches_from(["e2e-tools"]).is_err());
    assert!(cli()
        .try_get_matches_from(["e2e-tools", "check", "PROJ-1"])
        .is_err());
}
