use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{ContentHash, GenError};

/// Baseline hashes of tracked inputs, keyed by the path the task was given.
///
/// # 設計
/// - `baseline` は読み取りのみ（判定中に状態を変えない）
/// - `record` はアクション成功後にだけ呼ばれ、呼ばれた時点で永続化まで済ませる
#[async_trait]
pub trait HashStore: Send + Sync {
    async fn baseline(&self, input: &Path) -> Option<ContentHash>;

    async fn record(&self, entries: Vec<(PathBuf, ContentHash)>) -> Result<(), GenError>;
}
