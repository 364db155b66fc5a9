use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use spectest::domain::error::ScriptError;
use spectest::engine::batch::BatchRunner;
use tempfile::{TempDir, tempdir};

fn tests_dir_with(script: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let tests_dir = dir.path().join("tests");
    fs::create_dir(&tests_dir).expect("create tests dir");
    fs::write(tests_dir.join("checks.rhai"), script).expect("write script");
    (dir, tests_dir)
}

#[test]
fn multi_document_input_ands_segment_verdicts() {
    let (_dir, tests_dir) =
        tests_dir_with(r#"assert_equal(spec.kind, "Service", "kind is a service");"#);
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");

    // First document passes, second fails: the input verdict is false.
    let blob = b"kind: Service\n---\nkind: Pod\n";
    let verdict = batch.run_input(blob, "multi.yaml").expect("run input");
    assert!(!verdict);

    // Both documents passing yields a true verdict.
    let blob = b"kind: Service\n---\nkind: Service\n";
    assert!(batch.run_input(blob, "multi.yaml").expect("run input"));
}

#[test]
fn outcomes_do_not_leak_across_inputs() {
    let (_dir, tests_dir) =
        tests_dir_with(r#"assert_equal(spec.kind, "Service", "kind is a service");"#);
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");

    assert!(!batch.run_input(b"kind: Pod\n", "bad.yaml").expect("run bad"));
    // The previous failure must not bleed into the next input's verdict.
    assert!(
        batch
            .run_input(b"kind: Service\n", "good.yaml")
            .expect("run good")
    );
}

#[test]
fn error_outcomes_alone_do_not_flip_the_verdict() {
    // Containment over an integer is ill-formed: an error, not a failure.
    let (_dir, tests_dir) =
        tests_dir_with(r#"assert_contains(spec.replicas, 1, "replicas contain one");"#);
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    assert!(batch.run_input(b"replicas: 3\n", "deploy.yaml").expect("run"));
}

#[test]
fn commented_out_document_passes_vacuously() {
    let (_dir, tests_dir) = tests_dir_with(r#"fail("never reached");"#);
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    assert!(
        batch
            .run_input(b"# nothing here\n# at all\n", "commented.yaml")
            .expect("run")
    );
}

#[test]
fn empty_input_passes_with_zero_documents() {
    let (_dir, tests_dir) = tests_dir_with(r#"fail("never reached");"#);
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    assert!(batch.run_input(b"", "empty.yaml").expect("run"));
}

#[test]
fn script_runtime_errors_abort_the_run() {
    let (_dir, tests_dir) = tests_dir_with("no_such_function();");
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    let error = batch
        .run_input(b"kind: Service\n", "deploy.yaml")
        .expect_err("engine error is fatal");
    assert!(matches!(error, ScriptError::RunScript { .. }));
}

#[test]
fn missing_tests_directory_fails_before_any_document() {
    let result = BatchRunner::new(
        std::path::Path::new("/definitely/not/here"),
        &HashMap::new(),
    );
    assert!(matches!(
        result,
        Err(ScriptError::MissingTestDir { .. })
    ));
}
