//! Ports - 抽象化レイヤー
//!
//! パイプラインが外の世界に触れるのは 2 か所だけ:
//! - 外部プロセスの起動（CommandRunner）
//! - 入力ハッシュの基準値の保存（HashStore）
//!
//! どちらも trait にしておき、テストでは記録用・in-memory の実装に差し替える。

pub mod command_runner;
pub mod hash_store;

pub use self::command_runner::CommandRunner;
pub use self::hash_store::HashStore;
