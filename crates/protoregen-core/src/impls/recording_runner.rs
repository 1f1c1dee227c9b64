//! RecordingRunner - プロセスを起動せずに呼び出しを記録する CommandRunner（テスト用）

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{CommandSpec, GenError};
use crate::ports::CommandRunner;

type Effect = Box<dyn Fn(&CommandSpec) + Send + Sync>;

/// Records every command it is asked to run.
///
/// Programs registered with `fail_program` report a non-zero exit;
/// `on_run` lets a test simulate what the real tool would leave on disk.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    failures: HashMap<String, i32>,
    effect: Option<Effect>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_program(mut self, program: impl Into<String>, code: i32) -> Self {
        self.failures.insert(program.into(), code);
        self
    }

    pub fn on_run(mut self, effect: impl Fn(&CommandSpec) + Send + Sync + 'static) -> Self {
        self.effect = Some(Box::new(effect));
        self
    }

    pub async fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().await.clone()
    }

    pub async fn calls_to(&self, program: &str) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.program() == program)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> Result<(), GenError> {
        self.calls.lock().await.push(command.clone());

        if let Some(&code) = self.failures.get(command.program()) {
            return Err(GenError::CommandFailed {
                program: command.program().to_string(),
                code: Some(code),
            });
        }
        if let Some(effect) = &self.effect {
            effect(command);
        }
        Ok(())
    }
}
