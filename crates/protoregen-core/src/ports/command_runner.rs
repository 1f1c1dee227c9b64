use async_trait::async_trait;

use crate::domain::{CommandSpec, GenError};

/// Runs an external command to completion.
///
/// A non-zero exit must come back as `GenError::CommandFailed`; the caller
/// never retries.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandSpec) -> Result<(), GenError>;
}
