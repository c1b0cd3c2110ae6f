//! Scripted runner used by tests in place of real host programs

use super::mechanism::Mechanism;
use super::runner::{CommandRunner, MechanismError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeed,
    Fail,
    Missing,
}

/// Answers by program name; unlisted programs are reported missing
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outcomes: HashMap<&'static str, Outcome>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, program: &'static str, outcome: Outcome) -> Self {
        self.outcomes.insert(program, outcome);
        self
    }

    /// Make every run take this long, as a slow host program would
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Mechanisms run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, mechanism: &Mechanism) -> Result<(), MechanismError> {
        self.calls.lock().unwrap().push(mechanism.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let program = mechanism.program.to_string();
        match self.outcomes.get(mechanism.program).copied() {
            Some(Outcome::Succeed) => Ok(()),
            Some(Outcome::Fail) => Err(MechanismError::Failed {
                program,
                status: "exit status: 1".into(),
            }),
            Some(Outcome::Missing) | None => Err(MechanismError::NotFound { program }),
        }
    }
}
