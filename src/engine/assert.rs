//! Assertion primitives exposed to test scripts.
//!
//! Every primitive evaluates a comparator predicate, appends one outcome to
//! the shared log and returns `true` only on success so scripts can
//! short-circuit. No primitive terminates script execution; even `fail_now`
//! only records an error outcome and leaves control flow to the script.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::outcome::{AssertionOutcome, OutcomeKind, OutcomeLog};
use crate::domain::value::DocValue;
use crate::engine::compare;

/// Recorder handle shared between the engine bindings and the batch runner.
#[derive(Debug, Clone)]
pub struct Assertions {
    log: Rc<RefCell<OutcomeLog>>,
}

impl Assertions {
    pub fn new(log: Rc<RefCell<OutcomeLog>>) -> Self {
        Self { log }
    }

    pub fn equal(&self, actual: &DocValue, expected: &DocValue, msg: &str) -> bool {
        match compare::equal(actual, expected) {
            Err(reason) => self.error(format!(
                "invalid operation: {expected} == {actual} ({reason})"
            )),
            Ok(true) => self.success(msg),
            Ok(false) => {
                let (expected, actual) = render_operands(expected, actual);
                self.failure(format!(
                    "{msg} but doesn't. expected: {expected} actual: {actual}"
                ))
            }
        }
    }

    pub fn not_equal(&self, actual: &DocValue, expected: &DocValue, msg: &str) -> bool {
        match compare::equal(actual, expected) {
            Err(reason) => self.error(format!(
                "invalid operation: {expected} != {actual} ({reason})"
            )),
            Ok(true) => self.failure(format!("{msg} but does. actual: {actual}")),
            Ok(false) => self.success(msg),
        }
    }

    pub fn contains(&self, container: &DocValue, element: &DocValue, msg: &str) -> bool {
        match compare::contains(container, element) {
            Err(reason) => self.error(format!("invalid containment check in {msg} ({reason})")),
            Ok(true) => self.success(msg),
            Ok(false) => self.failure(format!("{container} does not contain {element}")),
        }
    }

    pub fn not_contains(&self, container: &DocValue, element: &DocValue, msg: &str) -> bool {
        match compare::contains(container, element) {
            Err(reason) => self.error(format!("invalid containment check in {msg} ({reason})")),
            Ok(true) => self.failure(format!("{container} should not contain {element}")),
            Ok(false) => self.success(msg),
        }
    }

    pub fn nil(&self, value: &DocValue, msg: &str) -> bool {
        if compare::is_nil(value) {
            self.success(msg)
        } else {
            self.failure(format!("{msg} expected nil, but got: {value}"))
        }
    }

    pub fn not_nil(&self, value: &DocValue, msg: &str) -> bool {
        if compare::is_nil(value) {
            self.failure(format!("{msg} expected value not to be nil"))
        } else {
            self.success(msg)
        }
    }

    pub fn empty(&self, value: &DocValue, msg: &str) -> bool {
        if compare::is_empty(value) {
            self.success(msg)
        } else {
            self.failure(format!("{msg} should be empty, but was {value}"))
        }
    }

    pub fn not_empty(&self, value: &DocValue, msg: &str) -> bool {
        if compare::is_empty(value) {
            self.failure(format!("{msg} should not be empty"))
        } else {
            self.success(msg)
        }
    }

    pub fn is_true(&self, value: bool, msg: &str) -> bool {
        if value {
            self.success(msg)
        } else {
            self.failure(msg.to_string())
        }
    }

    pub fn is_false(&self, value: bool, msg: &str) -> bool {
        if value {
            self.failure(msg.to_string())
        } else {
            self.success(msg)
        }
    }

    /// Unconditionally records a failure.
    pub fn fail(&self, msg: &str) -> bool {
        self.failure(msg.to_string())
    }

    /// Unconditionally records an error outcome.
    ///
    /// Despite the name this does not abort the script; terminating on a
    /// fatal assertion-setup problem is the script author's responsibility.
    pub fn fail_now(&self, msg: &str) -> bool {
        self.error(msg.to_string())
    }

    fn success(&self, msg: &str) -> bool {
        self.record(OutcomeKind::Success, msg.to_string());
        true
    }

    fn failure(&self, message: String) -> bool {
        self.record(OutcomeKind::Failure, message);
        false
    }

    fn error(&self, message: String) -> bool {
        self.record(OutcomeKind::Error, message);
        false
    }

    fn record(&self, kind: OutcomeKind, message: String) {
        self.log
            .borrow_mut()
            .record(AssertionOutcome { message, kind });
    }
}

/// Renders a mismatched operand pair, qualifying both with their runtime
/// types when the variants differ so cross-type mismatches stand out.
fn render_operands(expected: &DocValue, actual: &DocValue) -> (String, String) {
    if expected.type_name() != actual.type_name() {
        (
            format!("{}({expected})", expected.type_name()),
            format!("{}({actual})", actual.type_name()),
        )
    } else {
        (expected.to_string(), actual.to_string())
    }
}
