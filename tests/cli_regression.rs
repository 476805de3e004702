// Regression tests for the synrules binary: output format and miette diagnostics.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const LET_RULES: &str = "(syntax-rules ()
  ((let ((var val) ...) body ...)
   ((lambda (var ...) body ...) val ...))
  ((let label ((var val) ...) body ...)
   ((lambda () (define (label var ...) body ...) (label val ...)))))";

const LET_BUNDLE: &str = "((let ((x 1) (y 2)) (+ x y) (foo))
 ()
 ((let ((var val) ...) body ...)
  ((lambda (var ...) body ...) val ...)))";

/// Writes `contents` to a per-test file in the temp dir; removed on drop.
struct TempFile(PathBuf);

impl TempFile {
    fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("synrules-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        TempFile(path)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

fn synrules() -> Command {
    let mut cmd = Command::cargo_bin("synrules").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("SYNRULES_LOG");
    cmd
}

#[test]
fn expand_prints_rewritten_form() {
    let rules = TempFile::new("expand.scm", LET_RULES);
    synrules()
        .arg("expand")
        .arg("--rules")
        .arg(&rules.0)
        .arg("(let ((x 1) (y 2)) (+ x y) (foo))")
        .assert()
        .success()
        .stdout("((lambda (x y) (+ x y) (foo)) 1 2)\n");
}

#[test]
fn expand_reads_form_from_stdin() {
    let rules = TempFile::new("stdin.scm", LET_RULES);
    synrules()
        .arg("expand")
        .arg("-r")
        .arg(&rules.0)
        .write_stdin("(let loop ((i 0)) (loop i))")
        .assert()
        .success()
        .stdout("((lambda () (define (loop i) (loop i)) (loop 0)))\n");
}

#[test]
fn expand_pretty_respects_width() {
    let rules = TempFile::new("pretty.scm", LET_RULES);
    synrules()
        .arg("expand")
        .arg("-r")
        .arg(&rules.0)
        .arg("--pretty")
        .arg("--width")
        .arg("10")
        .arg("(let ((x 1) (y 2)) (+ x y) (foo))")
        .assert()
        .success()
        .stdout("((lambda\n  (x y)\n  (+ x y)\n  (foo))\n 1\n 2)\n");
}

#[test]
fn expand_json_output() {
    let rules = TempFile::new("expand-json.scm", "(syntax-rules () ((_ a b) (b a)))");
    let output = synrules()
        .arg("expand")
        .arg("-r")
        .arg(&rules.0)
        .arg("--json")
        .arg("(swap x (y))")
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"List": [{"List": [{"Atom": "y"}]}, {"Atom": "x"}]})
    );
}

#[test]
fn verbose_flag_logs_rule_selection() {
    let rules = TempFile::new("verbose.scm", LET_RULES);
    synrules()
        .arg("-v")
        .arg("expand")
        .arg("-r")
        .arg(&rules.0)
        .arg("(let ((x 1)) x)")
        .assert()
        .success()
        .stdout("((lambda (x) x) 1)\n")
        .stderr(contains("rule matched"));
}

#[test]
fn quiet_by_default() {
    let rules = TempFile::new("quiet.scm", LET_RULES);
    synrules()
        .arg("expand")
        .arg("-r")
        .arg(&rules.0)
        .arg("(let ((x 1)) x)")
        .assert()
        .success()
        .stderr(contains("rule matched").not());
}

#[test]
fn run_expands_bundle() {
    let bundle = TempFile::new("bundle.scm", LET_BUNDLE);
    synrules()
        .arg("run")
        .arg(&bundle.0)
        .assert()
        .success()
        .stdout("((lambda (x y) (+ x y) (foo)) 1 2)\n");
}

#[test]
fn run_explain_shows_rule_and_diff() {
    let bundle = TempFile::new("explain.scm", LET_BUNDLE);
    synrules()
        .arg("run")
        .arg("--explain")
        .arg(&bundle.0)
        .assert()
        .success()
        .stdout(
            contains("--- rule 0: (let ((var val) ...) body ...) ---")
                .and(contains("var ... = x y"))
                .and(contains("-(let ((x 1) (y 2)) (+ x y) (foo))"))
                .and(contains("+((lambda (x y) (+ x y) (foo)) 1 2)")),
        );
}

#[test]
fn run_json_output() {
    let bundle = TempFile::new("json.scm", "((m a) () ((_ x) (x)))");
    let output = synrules().arg("run").arg("--json").arg(&bundle.0).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, serde_json::json!({"List": [{"Atom": "a"}]}));
}

#[test]
fn match_prints_bindings() {
    synrules()
        .arg("match")
        .arg("-p")
        .arg("(_ (k v) ...)")
        .arg("(m (a 1) (b 2))")
        .assert()
        .success()
        .stdout(contains("k ... = a b").and(contains("v ... = 1 2")));
}

#[test]
fn match_failure_is_reported() {
    synrules()
        .arg("match")
        .arg("-p")
        .arg("(_ else)")
        .arg("-l")
        .arg("(else)")
        .arg("(m otherwise)")
        .assert()
        .failure()
        .stderr(contains("synrules::rules::mismatch"));
}

#[test]
fn match_honours_ignore_keyword() {
    synrules()
        .arg("match")
        .arg("--ignore-keyword")
        .arg("-p")
        .arg("(_ x)")
        .arg("(m 1)")
        .assert()
        .success()
        .stdout("x = 1\n");
}

#[test]
fn match_rejects_ellipsis_literal() {
    synrules()
        .arg("match")
        .arg("-p")
        .arg("(_ x ...)")
        .arg("-l")
        .arg("(...)")
        .arg("(m 1)")
        .assert()
        .failure()
        .stderr(contains("synrules::rules::definition"));
}

#[test]
fn match_rejects_nested_ellipsis() {
    synrules()
        .arg("match")
        .arg("-p")
        .arg("(_ (k v ...) ...)")
        .arg("(m (a 1 2) (b 3))")
        .assert()
        .failure()
        .stderr(contains("nested ellipsis"));
}

#[test]
fn non_call_form_is_reported() {
    let rules = TempFile::new("noncall.scm", "(define-syntax swap (syntax-rules () ((_ a b) (b a))))");
    synrules()
        .arg("expand")
        .arg("-r")
        .arg(&rules.0)
        .arg("x")
        .assert()
        .failure()
        .stderr(contains("synrules::rules::not_a_call").and(contains("No macro named").not()));
}

#[test]
fn lenient_flag_allows_trailing_elements() {
    let bundle = TempFile::new("lenient.scm", "((m 1 2 3) () ((_ a) (one a)))");
    synrules()
        .arg("run")
        .arg(&bundle.0)
        .assert()
        .failure()
        .stderr(contains("synrules::rules::no_match"));
    synrules()
        .arg("run")
        .arg("--lenient")
        .arg(&bundle.0)
        .assert()
        .success()
        .stdout("(one 1)\n");
}

#[test]
fn config_file_sets_ellipsis() {
    let config = TempFile::new("config.json", r#"{"ellipsis": "..*"}"#);
    let bundle = TempFile::new("ellipsis.scm", "((m 1 2) () ((_ x ..*) (list x ..*)))");
    synrules()
        .arg("run")
        .arg("--config")
        .arg(&config.0)
        .arg(&bundle.0)
        .assert()
        .success()
        .stdout("(list 1 2)\n");
}

#[test]
fn fmt_normalises_brackets() {
    let source = TempFile::new("fmt.scm", "[a   {b c}]\n(d)");
    synrules()
        .arg("fmt")
        .arg(&source.0)
        .assert()
        .success()
        .stdout("(a (b c))\n(d)\n");
}

#[test]
fn cli_reports_miette_diagnostics_on_parse_error() {
    let bad_file = TempFile::new("bad.scm", "((let ((x 1)) x) ()" /* missing closing paren */);
    synrules()
        .arg("run")
        .arg(&bad_file.0)
        .assert()
        .failure()
        .stderr(contains("synrules::parse").and(contains("missing closing ')'")));
}

#[test]
fn unknown_macro_lists_defined_names() {
    let rules = TempFile::new("table.scm", "(define-syntax swap (syntax-rules () ((_ a b) (b a))))");
    synrules()
        .arg("expand")
        .arg("-r")
        .arg(&rules.0)
        .arg("(rotate 1 2)")
        .assert()
        .failure()
        .stderr(contains("synrules::rules::unknown_macro").and(contains("swap")));
}

#[test]
fn missing_file_is_an_io_error() {
    synrules()
        .arg("run")
        .arg("definitely/not/here.scm")
        .assert()
        .failure()
        .stderr(contains("synrules::io").or(contains("Failed to read")));
}
