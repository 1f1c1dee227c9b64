//! Errors - パイプライン実行時のエラー
//!
//! 外部コマンドの失敗は `CommandFailed` の 1 種類だけ。
//! それ以外は起動失敗・ファイル I/O・ハッシュストアの破損など、周辺の失敗を表す。

use std::path::PathBuf;

use thiserror::Error;

use super::TaskName;

#[derive(Debug, Error)]
pub enum GenError {
    /// An external tool ran and exited unsuccessfully.
    #[error("`{program}` failed: {}", describe_exit(.code))]
    CommandFailed { program: String, code: Option<i32> },

    #[error("failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("hash store {} is unreadable", .path.display())]
    HashStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("search path cannot include {}", .0.display())]
    SearchPath(PathBuf),

    #[error("task {task} failed")]
    Task {
        task: TaskName,
        #[source]
        source: Box<GenError>,
    },
}

impl GenError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Unwraps `Task` wrappers down to the error that actually happened.
    pub fn root(&self) -> &GenError {
        match self {
            GenError::Task { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_command_failure(&self) -> bool {
        matches!(self.root(), GenError::CommandFailed { .. })
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}
