//! InMemoryHashStore - 永続化しない HashStore（テスト・開発用）

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ContentHash, GenError};
use crate::ports::HashStore;

#[derive(Debug, Default)]
pub struct InMemoryHashStore {
    entries: Mutex<HashMap<PathBuf, ContentHash>>,
}

impl InMemoryHashStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = (PathBuf, ContentHash)>) -> Self {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }

    pub async fn snapshot(&self) -> HashMap<PathBuf, ContentHash> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl HashStore for InMemoryHashStore {
    async fn baseline(&self, input: &Path) -> Option<ContentHash> {
        self.entries.lock().await.get(input).cloned()
    }

    async fn record(&self, entries: Vec<(PathBuf, ContentHash)>) -> Result<(), GenError> {
        self.entries.lock().await.extend(entries);
        Ok(())
    }
}
