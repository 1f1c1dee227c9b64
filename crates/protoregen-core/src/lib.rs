//! protoregen-core
//!
//! Building blocks for the staleness-checked codegen pipeline.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（task_name, staleness, digest, command, report, errors）
//! - **ports**: 抽象化レイヤー（CommandRunner, HashStore）
//! - **impls**: 実装（ProcessRunner, JsonHashStore と、テスト用の in-memory 実装）
//! - **tasks**: パイプラインに載る具体的な Task（ToolInstaller, CodegenRunner）
//! - **app**: パイプラインの構築と実行（builder, context, pipeline）
//! - **config**: 設定ファイルと環境変数の解決

pub mod domain;
pub mod ports;
pub mod impls;
pub mod tasks;
pub mod app;
pub mod config;

pub use app::{BuildError, Context, Pipeline, PipelineBuilder, standard_pipeline};
pub use config::{ConfigError, GenConfig, ResolvedEnv};
pub use domain::{GenError, RunReport, Staleness, TaskName};
