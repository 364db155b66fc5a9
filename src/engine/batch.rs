//! Splits raw input into YAML documents and aggregates script verdicts.
//!
//! One batch runner owns the outcome log for its whole invocation. The log
//! is drained after every document, so outcomes never leak across segments,
//! and the input verdict is the AND of every segment verdict.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use crate::domain::error::ScriptError;
use crate::domain::outcome::{OutcomeKind, OutcomeLog};
use crate::domain::value::{DocValue, Document};
use crate::engine::assert::Assertions;
use crate::engine::script::ScriptRunner;

/// Token that separates documents inside a multi-document input.
const DOCUMENT_SEPARATOR: &[u8] = b"---";

pub struct BatchRunner {
    runner: ScriptRunner,
    log: Rc<RefCell<OutcomeLog>>,
}

impl BatchRunner {
    pub fn new(tests_dir: &Path, env: &HashMap<String, String>) -> Result<Self, ScriptError> {
        let log = Rc::new(RefCell::new(OutcomeLog::new()));
        let runner = ScriptRunner::new(tests_dir, Assertions::new(Rc::clone(&log)), env)?;
        tracing::debug!(scripts = runner.script_count(), "compiled test scripts");
        Ok(Self { runner, log })
    }

    /// Runs every document in `blob` and returns the input's verdict.
    pub fn run_input(&self, blob: &[u8], source: &str) -> Result<bool, ScriptError> {
        if blob.is_empty() {
            tracing::error!("the document {source} appears to be empty");
        }

        let mut passed = true;
        for segment in split_documents(blob) {
            if segment.is_empty() {
                continue;
            }
            if !self.run_segment(segment, source)? {
                passed = false;
            }
        }
        Ok(passed)
    }

    /// Parses one document segment, runs the scripts and drains the log.
    ///
    /// A segment with no content (fully commented, or unparseable) passes
    /// vacuously: there is nothing to assert against, but commented-out
    /// documents are a legitimate use, so this warns instead of failing.
    fn run_segment(&self, raw: &[u8], source: &str) -> Result<bool, ScriptError> {
        debug_assert!(self.log.borrow().is_empty());

        let value = match serde_yaml::from_slice::<serde_yaml::Value>(raw) {
            Ok(serde_yaml::Value::Null) => {
                tracing::warn!("the document {source} does not contain any content");
                return Ok(true);
            }
            Ok(value) => DocValue::from(value),
            Err(error) => {
                tracing::warn!("the document {source} could not be parsed: {error}");
                return Ok(true);
            }
        };

        let doc = Document {
            source: source.to_string(),
            value,
        };
        self.runner.run_document(&doc)?;

        let mut passed = true;
        let outcomes = self.log.borrow_mut().drain();
        for outcome in outcomes {
            let message = format!("{source} {}", outcome.message);
            match outcome.kind {
                OutcomeKind::Error => tracing::error!("{message}"),
                OutcomeKind::Failure => {
                    tracing::warn!("{message}");
                    passed = false;
                }
                OutcomeKind::Success => tracing::info!("{message}"),
            }
        }
        Ok(passed)
    }
}

/// Returns the line ending convention used by `blob`. Carriage returns are
/// only honored on Windows, matching how the documents are authored there.
pub fn detect_line_break(blob: &[u8]) -> &'static str {
    let has_crlf = blob.windows(2).any(|pair| pair == b"\r\n");
    if has_crlf && cfg!(windows) { "\r\n" } else { "\n" }
}

/// Splits a raw blob into document segments on the `---` separator followed
/// by the detected line ending. Empty segments are kept; callers skip them.
pub fn split_documents(blob: &[u8]) -> Vec<&[u8]> {
    let separator = [DOCUMENT_SEPARATOR, detect_line_break(blob).as_bytes()].concat();
    split_on(blob, &separator)
}

fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut index = 0;
    while index + needle.len() <= haystack.len() {
        if &haystack[index..index + needle.len()] == needle {
            segments.push(&haystack[start..index]);
            index += needle.len();
            start = index;
        } else {
            index += 1;
        }
    }
    segments.push(&haystack[start..]);
    segments
}
