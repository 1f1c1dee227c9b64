//! Run report - パイプライン実行結果のビュー

use serde::{Deserialize, Serialize};

use super::{StaleReason, TaskName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Condition held and the action completed.
    Ran,

    /// Condition did not hold; the action was not touched.
    Skipped,

    /// Condition held but the pipeline was only checking.
    WouldRun,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    pub name: TaskName,
    pub outcome: TaskOutcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<StaleReason>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub ran: usize,
    pub skipped: usize,
    pub would_run: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    pub fn push(&mut self, name: TaskName, outcome: TaskOutcome, reasons: Vec<StaleReason>) {
        self.tasks.push(TaskReport {
            name,
            outcome,
            reasons,
        });
    }

    pub fn get(&self, name: &str) -> Option<&TaskReport> {
        self.tasks.iter().find(|t| t.name.as_str() == name)
    }

    pub fn counts(&self) -> ReportCounts {
        let mut counts = ReportCounts::default();
        for task in &self.tasks {
            match task.outcome {
                TaskOutcome::Ran => counts.ran += 1,
                TaskOutcome::Skipped => counts.skipped += 1,
                TaskOutcome::WouldRun => counts.would_run += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_outcome() {
        let mut report = RunReport::default();
        report.push(TaskName::new("install-plugin"), TaskOutcome::Skipped, vec![]);
        report.push(
            TaskName::new("codegen"),
            TaskOutcome::Ran,
            vec![StaleReason::Forced],
        );

        assert_eq!(
            report.counts(),
            ReportCounts {
                ran: 1,
                skipped: 1,
                would_run: 0
            }
        );
        assert_eq!(report.get("codegen").map(|t| t.outcome), Some(TaskOutcome::Ran));
        assert!(report.get("missing").is_none());
    }

    #[test]
    fn skipped_task_omits_reasons_in_json() {
        let mut report = RunReport::default();
        report.push(TaskName::new("install-plugin"), TaskOutcome::Skipped, vec![]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "tasks": [{ "name": "install-plugin", "outcome": "skipped" }] })
        );
    }
}
