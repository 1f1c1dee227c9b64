//! PipelineBuilder - パイプラインの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 同名の Task の二重登録はその場でエラー
//! - expect_tasks() で期待される Task 名を登録
//! - build() 時に「期待集合 ⊆ 登録済み集合」をチェック

use std::collections::HashSet;

use crate::domain::{GenError, TaskName};
use crate::tasks::Task;

use super::{Context, Pipeline};

pub struct PipelineBuilder {
    tasks: Vec<Box<dyn Task>>,
    names: HashSet<TaskName>,
    expected_tasks: Option<Vec<String>>,
    force: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("task '{0}' is already registered")]
    DuplicateTask(TaskName),

    #[error("Missing tasks: {0:?}. These tasks were expected but not registered.")]
    MissingTasks(Vec<String>),

    #[error("failed to prepare task")]
    Prepare(#[from] GenError),
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            names: HashSet::new(),
            expected_tasks: None,
            force: false,
        }
    }

    /// Appends a task. Tasks run in registration order.
    pub fn register(mut self, task: impl Task + 'static) -> Result<Self, BuildError> {
        let name = task.name().clone();
        if !self.names.insert(name.clone()) {
            return Err(BuildError::DuplicateTask(name));
        }
        self.tasks.push(Box::new(task));
        Ok(self)
    }

    pub fn expect_tasks(mut self, names: &[&str]) -> Self {
        self.expected_tasks = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Treat every task as stale.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn build(self, context: Context) -> Result<Pipeline, BuildError> {
        if let Some(expected_tasks) = &self.expected_tasks {
            let missing_tasks: Vec<String> = expected_tasks
                .iter()
                .filter(|n| !self.names.contains(&TaskName::new(n.as_str())))
                .cloned()
                .collect();
            if !missing_tasks.is_empty() {
                return Err(BuildError::MissingTasks(missing_tasks));
            }
        }
        Ok(Pipeline::new(self.tasks, context, self.force))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
