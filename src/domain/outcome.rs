use serde::Serialize;

/// Severity of one recorded assertion.
///
/// `Error` marks a malformed assertion invocation (for example function
/// operands to an equality check); `Failure` marks a well-formed assertion
/// whose condition did not hold. Only failures flip a document's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Error,
    Failure,
    Success,
}

/// One assertion result as recorded by a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionOutcome {
    pub message: String,
    pub kind: OutcomeKind,
}

/// Ordered accumulator of assertion outcomes for the current document.
///
/// Append-only while scripts run, then drained exactly once by the batch
/// runner. Shared by reference with the engine bindings; never a global.
#[derive(Debug, Default)]
pub struct OutcomeLog {
    outcomes: Vec<AssertionOutcome>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: AssertionOutcome) {
        self.outcomes.push(outcome);
    }

    /// Returns all recorded outcomes in insertion order and clears the log.
    pub fn drain(&mut self) -> Vec<AssertionOutcome> {
        std::mem::take(&mut self.outcomes)
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }
}
