//! Pipeline - 宣言順に Task を評価・実行する
//!
//! 並行性はない。1 つずつ check し、Stale のものだけ run する。
//! 失敗したらその場で中断し、後続の Task には触れない。

use tracing::{info, warn};

use crate::domain::{GenError, RunReport, StaleReason, Staleness, TaskName, TaskOutcome};
use crate::tasks::Task;

use super::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Run,
    Check,
}

pub struct Pipeline {
    tasks: Vec<Box<dyn Task>>,
    context: Context,
    force: bool,
}

impl Pipeline {
    pub(crate) fn new(tasks: Vec<Box<dyn Task>>, context: Context, force: bool) -> Self {
        Self {
            tasks,
            context,
            force,
        }
    }

    pub fn task_names(&self) -> Vec<&TaskName> {
        self.tasks.iter().map(|t| t.name()).collect()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Runs every stale task in order; stops at the first failure.
    pub async fn run(&self) -> Result<RunReport, GenError> {
        self.execute(Mode::Run).await
    }

    /// Evaluates every condition without running any action.
    pub async fn check(&self) -> Result<RunReport, GenError> {
        self.execute(Mode::Check).await
    }

    async fn execute(&self, mode: Mode) -> Result<RunReport, GenError> {
        let mut report = RunReport::default();

        for task in &self.tasks {
            let name = task.name();
            let staleness = self.evaluate(&**task).await.map_err(|e| wrap(name, e))?;

            let reasons = match staleness {
                Staleness::Fresh => {
                    info!(task = %name, "up to date");
                    report.push(name.clone(), TaskOutcome::Skipped, Vec::new());
                    continue;
                }
                Staleness::Stale(reasons) => reasons,
            };

            if mode == Mode::Check {
                info!(task = %name, reasons = reasons.len(), "would run");
                report.push(name.clone(), TaskOutcome::WouldRun, reasons);
                continue;
            }

            info!(task = %name, reasons = reasons.len(), "running");
            if let Err(e) = task.run(&self.context).await {
                warn!(task = %name, error = %e, "task failed");
                return Err(wrap(name, e));
            }
            report.push(name.clone(), TaskOutcome::Ran, reasons);
        }

        Ok(report)
    }

    async fn evaluate(&self, task: &dyn Task) -> Result<Staleness, GenError> {
        if self.force {
            return Ok(Staleness::Stale(vec![StaleReason::Forced]));
        }
        task.check(&self.context).await
    }
}

fn wrap(name: &TaskName, source: GenError) -> GenError {
    GenError::Task {
        task: name.clone(),
        source: Box::new(source),
    }
}
