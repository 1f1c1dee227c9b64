//! ProcessRunner - 実際に子プロセスを起動する CommandRunner

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::{CommandSpec, GenError};
use crate::ports::CommandRunner;

/// Spawns the command and waits for it.
///
/// stdout and stderr are inherited, so whatever the tool prints reaches the
/// caller unmodified.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<(), GenError> {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        for (key, value) in spec.get_envs() {
            cmd.env(key, value);
        }
        if let Some(dir) = spec.get_current_dir() {
            cmd.current_dir(dir);
        }

        debug!(command = %spec, "spawning");
        let status = cmd.status().await.map_err(|source| GenError::Spawn {
            program: spec.program().to_string(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            warn!(program = spec.program(), %status, "command exited unsuccessfully");
            Err(GenError::CommandFailed {
                program: spec.program().to_string(),
                code: status.code(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_exit_is_ok() {
        ProcessRunner::new()
            .run(&CommandSpec::new("true"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_zero_exit_is_command_failed() {
        let err = ProcessRunner::new()
            .run(&CommandSpec::new("sh").args(["-c", "exit 3"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenError::CommandFailed { ref program, code: Some(3) } if program == "sh"
        ));
    }

    #[tokio::test]
    async fn unknown_program_is_spawn_error() {
        let err = ProcessRunner::new()
            .run(&CommandSpec::new("protoregen-definitely-not-installed"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::Spawn { .. }));
    }

    #[tokio::test]
    async fn env_override_reaches_child() {
        let err = ProcessRunner::new()
            .run(
                &CommandSpec::new("sh")
                    .args(["-c", "test \"$PROTOREGEN_PROBE\" = yes || exit 7"])
                    .env("PROTOREGEN_PROBE", "no"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::CommandFailed { code: Some(7), .. }));

        ProcessRunner::new()
            .run(
                &CommandSpec::new("sh")
                    .args(["-c", "test \"$PROTOREGEN_PROBE\" = yes"])
                    .env("PROTOREGEN_PROBE", "yes"),
            )
            .await
            .unwrap();
    }
}
