use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use crate::domain::error::RunError;
use crate::engine::batch::BatchRunner;
use crate::io;

/// Input arguments for run command execution API.
#[derive(Debug, Clone)]
pub struct RunCommandArgs {
    /// Input files; an empty list means the stdin stream is the one input.
    pub files: Vec<PathBuf>,
    /// Directory holding the `.rhai` test scripts.
    pub tests_dir: PathBuf,
    /// Environment variable names exposed to scripts as the `env` map.
    pub env_vars: Vec<String>,
}

/// Runs every input through the batch runner and ANDs the verdicts.
///
/// Configuration problems (missing test directory, unreadable input) and
/// engine-level script errors are returned as [`RunError`]; assertion
/// failures only flip the returned verdict.
pub fn run_with_stdin<R: Read>(args: &RunCommandArgs, stdin: R) -> Result<bool, RunError> {
    let env = environment(&args.env_vars);
    let batch = BatchRunner::new(&args.tests_dir, &env)?;

    if args.files.is_empty() {
        let blob = io::read_stream(stdin)?;
        return Ok(batch.run_input(&blob, "stdin")?);
    }

    let mut passed = true;
    for file in &args.files {
        let blob = io::read_file(file)?;
        if !batch.run_input(&blob, &file.display().to_string())? {
            passed = false;
        }
    }
    Ok(passed)
}

/// Resolves the environment pass-through allowlist. Unset or empty variables
/// are skipped so scripts only ever see meaningful values.
fn environment(names: &[String]) -> HashMap<String, String> {
    let mut env = HashMap::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        match std::env::var(trimmed) {
            Ok(value) if !value.is_empty() => {
                tracing::info!(variable = trimmed, "passing through environment variable");
                env.insert(trimmed.to_string(), value);
            }
            _ => tracing::info!(variable = trimmed, "skipping empty environment variable"),
        }
    }
    env
}
