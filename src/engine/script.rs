//! Test script discovery and execution on the embedded rhai engine.
//!
//! Scripts are plain `.rhai` files discovered recursively under the test
//! directory and compiled once up front. Each document gets a fresh scope
//! carrying the stable binding surface (`file_name`, `spec`, `env` and the
//! assertion primitives); the engine itself is a collaborator behind a fixed
//! value-marshalling contract.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rhai::{AST, Dynamic, Engine, Scope};

use crate::domain::error::ScriptError;
use crate::domain::value::{DocValue, Document};
use crate::engine::assert::Assertions;

/// File suffix a test script must carry to be picked up.
pub const SCRIPT_SUFFIX: &str = "rhai";

struct CompiledScript {
    path: PathBuf,
    ast: AST,
}

/// Runs every discovered test script against one document at a time.
///
/// Scripts run sequentially in discovery order; the shared outcome log stays
/// single-writer by construction.
pub struct ScriptRunner {
    engine: Engine,
    scripts: Vec<CompiledScript>,
    env: Dynamic,
}

impl ScriptRunner {
    pub fn new(
        tests_dir: &Path,
        assertions: Assertions,
        env: &HashMap<String, String>,
    ) -> Result<Self, ScriptError> {
        if !tests_dir.is_dir() {
            return Err(ScriptError::MissingTestDir {
                path: tests_dir.display().to_string(),
            });
        }

        let mut engine = Engine::new();
        register_assertions(&mut engine, &assertions);

        let mut scripts = Vec::new();
        for path in discover_scripts(tests_dir)? {
            let text = fs::read_to_string(&path).map_err(|source| ScriptError::ReadScript {
                path: path.display().to_string(),
                source,
            })?;
            let ast = engine
                .compile(&text)
                .map_err(|source| ScriptError::CompileScript {
                    path: path.display().to_string(),
                    source,
                })?;
            scripts.push(CompiledScript { path, ast });
        }

        let mut env_map = rhai::Map::new();
        for (name, value) in env {
            env_map.insert(name.clone().into(), Dynamic::from(value.clone()));
        }

        Ok(Self {
            engine,
            scripts,
            env: Dynamic::from_map(env_map),
        })
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    /// Executes every script against `doc`. An engine-level error is fatal
    /// to the whole run, never downgraded to an assertion failure.
    pub fn run_document(&self, doc: &Document) -> Result<(), ScriptError> {
        let spec = to_dynamic(&doc.value);
        for script in &self.scripts {
            let mut scope = Scope::new();
            scope.push_constant("file_name", doc.source.clone());
            scope.push_constant_dynamic("spec", spec.clone());
            scope.push_constant_dynamic("env", self.env.clone());
            self.engine
                .run_ast_with_scope(&mut scope, &script.ast)
                .map_err(|source| ScriptError::RunScript {
                    path: script.path.display().to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

/// Recursively collects `.rhai` files under `dir` in directory-walk order.
fn discover_scripts(dir: &Path) -> Result<Vec<PathBuf>, ScriptError> {
    let mut scripts = Vec::new();
    collect_scripts(dir, &mut scripts)?;
    Ok(scripts)
}

fn collect_scripts(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ScriptError> {
    let scan_error = |source| ScriptError::ScanTestDir {
        path: dir.display().to_string(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(scan_error)? {
        let path = entry.map_err(scan_error)?.path();
        if path.is_dir() {
            collect_scripts(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == SCRIPT_SUFFIX) {
            out.push(path);
        }
    }
    Ok(())
}

fn register_assertions(engine: &mut Engine, assertions: &Assertions) {
    let a = assertions.clone();
    engine.register_fn(
        "assert_equal",
        move |actual: Dynamic, expected: Dynamic, msg: &str| {
            a.equal(&from_dynamic(actual), &from_dynamic(expected), msg)
        },
    );
    let a = assertions.clone();
    engine.register_fn(
        "assert_not_equal",
        move |actual: Dynamic, expected: Dynamic, msg: &str| {
            a.not_equal(&from_dynamic(actual), &from_dynamic(expected), msg)
        },
    );
    let a = assertions.clone();
    engine.register_fn(
        "assert_contains",
        move |container: Dynamic, element: Dynamic, msg: &str| {
            a.contains(&from_dynamic(container), &from_dynamic(element), msg)
        },
    );
    let a = assertions.clone();
    engine.register_fn(
        "assert_not_contains",
        move |container: Dynamic, element: Dynamic, msg: &str| {
            a.not_contains(&from_dynamic(container), &from_dynamic(element), msg)
        },
    );
    let a = assertions.clone();
    engine.register_fn("assert_nil", move |value: Dynamic, msg: &str| {
        a.nil(&from_dynamic(value), msg)
    });
    let a = assertions.clone();
    engine.register_fn("assert_not_nil", move |value: Dynamic, msg: &str| {
        a.not_nil(&from_dynamic(value), msg)
    });
    let a = assertions.clone();
    engine.register_fn("assert_empty", move |value: Dynamic, msg: &str| {
        a.empty(&from_dynamic(value), msg)
    });
    let a = assertions.clone();
    engine.register_fn("assert_not_empty", move |value: Dynamic, msg: &str| {
        a.not_empty(&from_dynamic(value), msg)
    });
    let a = assertions.clone();
    engine.register_fn("assert_true", move |value: bool, msg: &str| {
        a.is_true(value, msg)
    });
    let a = assertions.clone();
    engine.register_fn("assert_false", move |value: bool, msg: &str| {
        a.is_false(value, msg)
    });
    let a = assertions.clone();
    engine.register_fn("fail", move |msg: &str| a.fail(msg));
    let a = assertions.clone();
    engine.register_fn("fail_now", move |msg: &str| a.fail_now(msg));
}

/// Marshals a document value into an engine value. Non-string mapping keys
/// are stringified because engine maps only index by string; timestamps
/// cross the boundary as RFC 3339 strings.
pub(crate) fn to_dynamic(value: &DocValue) -> Dynamic {
    match value {
        DocValue::Nil => Dynamic::UNIT,
        DocValue::Bool(b) => (*b).into(),
        DocValue::Int(i) => (*i).into(),
        DocValue::Float(x) => (*x).into(),
        DocValue::Str(s) => s.clone().into(),
        DocValue::Bytes(bytes) => Dynamic::from_blob(bytes.clone()),
        DocValue::Seq(items) => Dynamic::from_array(items.iter().map(to_dynamic).collect()),
        DocValue::Map(entries) => {
            let mut map = rhai::Map::new();
            for (key, value) in entries {
                map.insert(key.text_form().into(), to_dynamic(value));
            }
            Dynamic::from_map(map)
        }
        DocValue::Timestamp(ts) => ts.to_rfc3339().into(),
        DocValue::Callable(_) | DocValue::Opaque(_) => Dynamic::UNIT,
    }
}

/// Marshals an engine value back into a document value. Function pointers
/// become [`DocValue::Callable`]; any other custom type is opaque.
pub(crate) fn from_dynamic(value: Dynamic) -> DocValue {
    let value = value.flatten();
    if value.is_unit() {
        return DocValue::Nil;
    }
    if let Some(b) = value.clone().try_cast::<bool>() {
        return DocValue::Bool(b);
    }
    if let Some(i) = value.clone().try_cast::<rhai::INT>() {
        return DocValue::Int(i);
    }
    if let Some(x) = value.clone().try_cast::<rhai::FLOAT>() {
        return DocValue::Float(x);
    }
    if let Ok(s) = value.clone().into_string() {
        return DocValue::Str(s);
    }
    if let Some(c) = value.clone().try_cast::<char>() {
        return DocValue::Str(c.to_string());
    }
    if let Ok(blob) = value.clone().into_blob() {
        return DocValue::Bytes(blob);
    }
    if let Ok(items) = value.clone().into_array() {
        return DocValue::Seq(items.into_iter().map(from_dynamic).collect());
    }
    if let Some(map) = value.clone().try_cast::<rhai::Map>() {
        return DocValue::Map(
            map.into_iter()
                .map(|(key, value)| (DocValue::Str(key.to_string()), from_dynamic(value)))
                .collect(),
        );
    }
    if let Some(fn_ptr) = value.clone().try_cast::<rhai::FnPtr>() {
        return DocValue::Callable(fn_ptr.fn_name().to_string());
    }
    DocValue::Opaque(value.type_name().to_string())
}
