//! Task - 条件付きで実行される作業単位
//!
//! 各 Task は「実行すべきか」を判定する `check` と、副作用を持つ `run` を持つ。
//! パイプラインは `check` が `Stale` を返したときにだけ `run` を呼ぶ。

pub mod codegen;
pub mod installer;

pub use self::codegen::CodegenRunner;
pub use self::installer::ToolInstaller;

use async_trait::async_trait;

use crate::app::Context;
use crate::domain::{GenError, Staleness, TaskName};

/// A named unit of work guarded by a staleness condition.
///
/// `run` should be safe to call again after a successful run; the pipeline
/// does not remember anything between invocations except what the task
/// records in the hash store.
#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &TaskName;

    /// Evaluates the condition. Must not have side effects.
    async fn check(&self, ctx: &Context) -> Result<Staleness, GenError>;

    async fn run(&self, ctx: &Context) -> Result<(), GenError>;
}
