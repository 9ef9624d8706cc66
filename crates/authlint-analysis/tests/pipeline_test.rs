//! Pipeline behavior: determinism, failures, cancellation, configuration.

use authlint_analysis::matchers::issue_ids;
use authlint_analysis::{AuthAnalyzer, Layer, SourceFile, Vocabulary};
use authlint_core::config::CliOverrides;
use authlint_core::{AuthlintConfig, Cancellable, CancellationToken};

const ORDERED: &str = r#"
def lambda_handler(event, context):
    """GET /chat/sessions/{id}"""
    is_org_member(event)
    can_access_chat(event)
"#;

const UNORDERED: &str = r#"
def lambda_handler(event, context):
    """GET /kb/docs/{id}"""
    can_view_doc(event)
    is_org_member(event)
    if is_sys_admin(event):
        return ok()
"#;

const EMPTY_HANDLER: &str = r#"
def lambda_handler(event, context):
    """POST /files/upload"""
    return ok()
"#;

fn corpus() -> Vec<SourceFile> {
    let mut files = Vec::new();
    for i in 0..12 {
        let (module, source) = match i % 3 {
            0 => ("chat", ORDERED),
            1 => ("kb", UNORDERED),
            _ => ("files", EMPTY_HANDLER),
        };
        files.push(SourceFile::new(format!("functions/{module}/h{i}.py"), source));
    }
    files
}

fn analyzer_with_threads(threads: usize) -> AuthAnalyzer {
    let config = AuthlintConfig::from_toml(&format!("[scan]\nthreads = {threads}\n")).unwrap();
    AuthAnalyzer::new(&config).unwrap()
}

#[test]
fn test_runs_are_deterministic_across_thread_counts() {
    let files = corpus();
    let single = analyzer_with_threads(1).analyze(&files).unwrap();
    let many = analyzer_with_threads(4).analyze(&files).unwrap();
    let default = analyzer_with_threads(0).analyze(&files).unwrap();

    assert_eq!(single, many);
    assert_eq!(single, default);
    assert_eq!(single.by_module()["kb"].layer2.error_count, 8);
    assert_eq!(single.by_module()["files"].layer2.error_count, 8);
    assert!(!single.by_module().contains_key("chat"));
}

#[test]
fn test_input_order_does_not_matter() {
    let files = corpus();
    let mut reversed = files.clone();
    reversed.reverse();
    let analyzer = analyzer_with_threads(2);
    assert_eq!(analyzer.analyze(&files).unwrap(), analyzer.analyze(&reversed).unwrap());
}

#[test]
fn test_empty_input_gives_empty_report() {
    let report = analyzer_with_threads(0).analyze(&[]).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.stats().files_analyzed, 0);
    assert!(report.by_issue_type().is_empty());
}

#[test]
fn test_parse_errors_do_not_abort_the_run() {
    let files = vec![
        SourceFile::new("functions/chat/broken.py", "def lambda_handler(event:\n    return (\n"),
        SourceFile::new("functions/files/ok.py", EMPTY_HANDLER),
    ];
    let report = analyzer_with_threads(0).analyze(&files).unwrap();

    assert_eq!(report.parse_errors().len(), 1);
    assert_eq!(report.parse_errors()[0].file_path, "functions/chat/broken.py");
    assert_eq!(report.parse_errors()[0].error_code, "PARSE_ERROR");
    assert!(report.parse_errors()[0].line >= 1);
    assert_eq!(report.stats().files_analyzed, 1);
    assert_eq!(report.stats().files_failed, 1);
    assert_eq!(report.issues().len(), 2);
}

#[test]
fn test_all_parse_errors_still_produce_a_report() {
    let files = vec![SourceFile::new("a.py", "def (:\n"), SourceFile::new("b.py", "class\n")];
    let report = analyzer_with_threads(0).analyze(&files).unwrap();
    assert!(report.issues().is_empty());
    assert_eq!(report.parse_errors().len(), 2);
    assert!(!report.is_clean());
}

#[test]
fn test_cancelled_run_returns_partial_report() {
    let token = CancellationToken::new();
    token.cancel();
    let files = corpus();
    let report = analyzer_with_threads(0)
        .analyze_with_cancellation(&files, &token)
        .unwrap();
    assert_eq!(report.stats().files_skipped, files.len());
    assert_eq!(report.stats().files_analyzed, 0);
    assert!(report.issues().is_empty());
}

#[test]
fn test_analyze_paths_reads_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let chat = dir.path().join("chat");
    std::fs::create_dir_all(&chat).unwrap();
    let good = chat.join("handler.py");
    std::fs::write(&good, UNORDERED).unwrap();
    let missing = chat.join("missing.py");

    let report = analyzer_with_threads(0).analyze_paths(&[good, missing]).unwrap();

    assert_eq!(report.stats().files_analyzed, 1);
    assert_eq!(report.parse_errors().len(), 1);
    assert_eq!(report.parse_errors()[0].error_code, "IO_ERROR");
    assert_eq!(report.by_issue_type()[issue_ids::MISSING_SCOPE_BEFORE_PERMISSION], 1);
    assert_eq!(report.by_issue_type()[issue_ids::ADMIN_ROLE_OVERRIDE], 1);
}

#[test]
fn test_custom_vocabulary_from_config() {
    let config = AuthlintConfig::from_toml(
        r#"
[vocabulary]
extend_defaults = false

[[vocabulary.rules]]
role = "membership_check"
name = "assert_workspace_member"

[[vocabulary.rules]]
role = "permission_check"
pattern = "^may_[a-z_]+$"
"#,
    )
    .unwrap();
    let analyzer = AuthAnalyzer::new(&config).unwrap();
    let source = r#"
def lambda_handler(event, context):
    """GET /chat/sessions/{id}"""
    assert_workspace_member(event)
    may_read_session(event)
    is_sys_admin(event)
"#;
    let report = analyzer
        .analyze(&[SourceFile::new("functions/chat/h.py", source)])
        .unwrap();
    // `is_sys_admin` is unknown to this vocabulary.
    assert!(report.issues().is_empty());
}

#[test]
fn test_injected_vocabulary_replaces_config() {
    let vocabulary = Vocabulary::from_toml_str(
        r#"
[[rules]]
role = "admin_check"
name = "can_access_chat"
"#,
    )
    .unwrap();
    let analyzer = AuthAnalyzer::new(&AuthlintConfig::default())
        .unwrap()
        .with_vocabulary(vocabulary);
    let report = analyzer
        .analyze(&[SourceFile::new("functions/chat/h.py", ORDERED)])
        .unwrap();
    assert_eq!(report.by_issue_type()[issue_ids::ADMIN_ROLE_OVERRIDE], 1);
    assert_eq!(report.by_issue_type()[issue_ids::MISSING_OWNERSHIP_CHECK], 1);
}

#[test]
fn test_admin_prefix_from_project_config() {
    let home = tempfile::TempDir::new().unwrap();
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("authlint.toml"),
        "[routes]\nadmin_prefix = \"/files\"\n",
    )
    .unwrap();
    // Keep the developer's user config out of the run.
    std::env::set_var("HOME", home.path());
    let config = AuthlintConfig::load(dir.path(), Some(&CliOverrides::default())).unwrap();
    let analyzer = AuthAnalyzer::new(&config).unwrap();

    let report = analyzer
        .analyze(&[SourceFile::new("functions/files/h.py", EMPTY_HANDLER)])
        .unwrap();
    assert!(report.issues().is_empty());
    assert_eq!(report.stats().admin_handlers, 1);
}

#[test]
fn test_invalid_vocabulary_pattern_is_an_error() {
    let config = AuthlintConfig::from_toml(
        r#"
[[vocabulary.rules]]
role = "permission_check"
pattern = "^can_("
"#,
    )
    .unwrap();
    assert!(AuthAnalyzer::new(&config).is_err());
}

#[test]
fn test_layer_helpers() {
    let report = analyzer_with_threads(0).analyze(&corpus()).unwrap();
    assert!(report.has_errors(Layer::ResourceAuth));
    assert!(!report.has_errors(Layer::AdminAuth));
    assert_eq!(
        report.issues_for_layer(Layer::ResourceAuth).count(),
        report.issues().len()
    );
}

#[test]
fn test_run_with_tracing_installed() {
    authlint_core::tracing_setup::init_tracing_with_filter("authlint_analysis=debug");
    // A second install is a no-op.
    authlint_core::tracing_setup::init_tracing();
    let report = analyzer_with_threads(2).analyze(&corpus()).unwrap();
    assert_eq!(report.stats().files_analyzed, 12);
}
