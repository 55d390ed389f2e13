//! Scripted oracle for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::oracle::{Oracle, Turn};

/// An [`Oracle`] that replays canned outputs.
///
/// Outputs are returned in order; the last one repeats once the script runs
/// out. Every conversation it receives is recorded for inspection.
#[derive(Debug, Default)]
pub struct MockOracle {
    script: Mutex<VecDeque<Result<String>>>,
    last: Mutex<Option<String>>,
    calls: Mutex<Vec<Vec<Turn>>>,
}

impl MockOracle {
    /// Replay `outputs` in order.
    pub fn new<S: Into<String>>(outputs: impl IntoIterator<Item = S>) -> Self {
        Self {
            script: Mutex::new(outputs.into_iter().map(|s| Ok(s.into())).collect()),
            ..Self::default()
        }
    }

    /// Return `output` on every call.
    pub fn repeating(output: impl Into<String>) -> Self {
        Self::new([output])
    }

    /// Append a failure to the script.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Err(AgentError::OracleError {
                provider: "Mock".into(),
                message: message.into(),
            }));
        }
        self
    }

    /// Every conversation passed to [`Oracle::complete`], in call order.
    pub fn calls(&self) -> Vec<Vec<Turn>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Oracle for MockOracle {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(turns.to_vec());
        }

        let next = self.script.lock().ok().and_then(|mut script| script.pop_front());
        let mut last = self.last.lock().map_err(|_| AgentError::OracleError {
            provider: "Mock".into(),
            message: "mock state poisoned".into(),
        })?;

        match next {
            Some(Ok(output)) => {
                *last = Some(output.clone());
                Ok(output)
            }
            Some(Err(e)) => Err(e),
            None => last.clone().ok_or_else(|| AgentError::OracleError {
                provider: "Mock".into(),
                message: "script is empty".into(),
            }),
        }
    }
}
