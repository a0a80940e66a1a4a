//! One-shot and poll loop tests.

mod once_test;
mod poll_test;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use edac_monitor::edac::{ExecutionError, ReportSource};

/// Report source replaying a script; the last entry repeats forever.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<&str, &str>>) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(String::from).map_err(String::from))
                    .collect(),
            ),
        }
    }

    pub fn always(report: &str) -> Self {
        Self::new(vec![Ok(report)])
    }
}

#[async_trait]
impl ReportSource for ScriptedSource {
    async fn fetch(&self) -> Result<String, ExecutionError> {
        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        };
        next.map_err(|binary| ExecutionError::NotFound { binary })
    }
}
