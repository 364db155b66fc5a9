use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use spectest::engine::batch::BatchRunner;
use tempfile::{TempDir, tempdir};

fn tests_dir_with(script: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let tests_dir = dir.path().join("tests");
    fs::create_dir(&tests_dir).expect("create tests dir");
    fs::write(tests_dir.join("bindings.rhai"), script).expect("write script");
    (dir, tests_dir)
}

const DOCUMENT: &[u8] = br#"
kind: Deployment
metadata:
  name: demo
  labels:
    app: demo
ports: [80, 443]
replicas: 3
owner: null
"#;

#[test]
fn all_assertion_primitives_are_bound_under_their_stable_names() {
    let (_dir, tests_dir) = tests_dir_with(
        r#"
assert_equal(spec.kind, "Deployment", "kind matches");
assert_not_equal(spec.kind, "Service", "kind is not a service");
assert_contains(spec.kind, "Deploy", "kind substring");
assert_contains(spec.metadata.labels, "app", "label key present");
assert_contains(spec.ports, 443, "https port exposed");
assert_not_contains(spec.ports, 8080, "no alt port");
assert_nil(spec.owner, "owner unset");
assert_not_nil(spec.metadata, "metadata present");
assert_empty(spec.missing, "absent key is empty");
assert_not_empty(spec.ports, "ports listed");
assert_true(spec.replicas > 1, "replicated");
assert_false(spec.replicas > 5, "not over-replicated");
"#,
    );
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    assert!(batch.run_input(DOCUMENT, "deploy.yaml").expect("run"));
}

#[test]
fn fail_flips_the_verdict() {
    let (_dir, tests_dir) = tests_dir_with(r#"fail("always fails");"#);
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    assert!(!batch.run_input(DOCUMENT, "deploy.yaml").expect("run"));
}

#[test]
fn fail_now_records_an_error_and_does_not_flip_the_verdict() {
    // fail_now marks a broken assertion setup; it neither aborts the script
    // nor counts as a test failure.
    let (_dir, tests_dir) = tests_dir_with(
        r#"
fail_now("setup went sideways");
assert_equal(spec.kind, "Deployment", "still runs after fail_now");
"#,
    );
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    assert!(batch.run_input(DOCUMENT, "deploy.yaml").expect("run"));
}

#[test]
fn assertions_short_circuit_on_their_boolean_return() {
    let (_dir, tests_dir) = tests_dir_with(
        r#"
if assert_not_nil(spec.metadata, "metadata present") {
    assert_equal(spec.metadata.name, "demo", "name matches");
}
"#,
    );
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    assert!(batch.run_input(DOCUMENT, "deploy.yaml").expect("run"));
}

#[test]
fn nil_and_empty_are_distinct_for_present_containers() {
    let (_dir, tests_dir) = tests_dir_with(
        r#"
assert_not_nil(spec.selectors, "present container is not nil");
assert_empty(spec.selectors, "but it is empty");
"#,
    );
    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    assert!(
        batch
            .run_input(b"selectors: []\n", "svc.yaml")
            .expect("run")
    );
}

#[test]
fn scripts_in_subdirectories_run_too() {
    let dir = tempdir().expect("tempdir");
    let tests_dir = dir.path().join("tests");
    fs::create_dir_all(tests_dir.join("nested")).expect("create dirs");
    fs::write(
        tests_dir.join("nested/deep.rhai"),
        r#"fail("found in a subdirectory");"#,
    )
    .expect("write script");

    let batch = BatchRunner::new(&tests_dir, &HashMap::new()).expect("batch runner");
    assert!(!batch.run_input(DOCUMENT, "deploy.yaml").expect("run"));
}
