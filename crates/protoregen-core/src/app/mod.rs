//! App - パイプラインの構築と実行
//!
//! - builder: PipelineBuilder（登録・起動時検証）
//! - context: Task が触れる外部資源（CommandRunner, HashStore）
//! - pipeline: 宣言順に check → run を回す実行ループ

pub mod builder;
pub mod context;
pub mod pipeline;

pub use self::builder::{BuildError, PipelineBuilder};
pub use self::context::Context;
pub use self::pipeline::Pipeline;

use crate::config::{GenConfig, ResolvedEnv};
use crate::tasks::codegen::CODEGEN_TASK;
use crate::tasks::installer::INSTALL_TASK;
use crate::tasks::{CodegenRunner, ToolInstaller};

/// The two-step pipeline: install the plugin, then regenerate bindings.
pub fn standard_pipeline(
    config: &GenConfig,
    env: &ResolvedEnv,
    context: Context,
    force: bool,
) -> Result<Pipeline, BuildError> {
    PipelineBuilder::new()
        .register(ToolInstaller::from_config(config, env))?
        .register(CodegenRunner::from_config(config, env)?)?
        .expect_tasks(&[INSTALL_TASK, CODEGEN_TASK])
        .force(force)
        .build(context)
}
