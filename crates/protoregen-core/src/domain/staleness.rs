//! Staleness - タスクを再実行すべきかどうかの判定結果

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a task is considered out of date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum StaleReason {
    /// A file the task is expected to produce does not exist.
    MissingFile(PathBuf),

    /// A tracked input hashes differently from the recorded baseline.
    InputChanged(PathBuf),

    /// A tracked input has never been recorded.
    NoBaseline(PathBuf),

    /// The caller asked to run everything.
    Forced,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::MissingFile(p) => write!(f, "missing {}", p.display()),
            StaleReason::InputChanged(p) => write!(f, "changed {}", p.display()),
            StaleReason::NoBaseline(p) => write!(f, "no baseline for {}", p.display()),
            StaleReason::Forced => f.write_str("forced"),
        }
    }
}

/// Result of evaluating a task's condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    Fresh,
    Stale(Vec<StaleReason>),
}

impl Staleness {
    /// `Fresh` when nothing was found, `Stale` otherwise.
    pub fn from_reasons(reasons: Vec<StaleReason>) -> Self {
        if reasons.is_empty() {
            Staleness::Fresh
        } else {
            Staleness::Stale(reasons)
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Staleness::Stale(_))
    }

    pub fn reasons(&self) -> &[StaleReason] {
        match self {
            Staleness::Fresh => &[],
            Staleness::Stale(reasons) => reasons,
        }
    }
}
