//! JsonHashStore - 入力ハッシュの基準値を JSON のサイドカーファイルに保存する
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "protob/messages.proto": { "sha256": "…", "recorded_at": "2026-10-19T08:00:00Z" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::{ContentHash, GenError};
use crate::ports::HashStore;

const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashEntry {
    pub sha256: ContentHash,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HashFile {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, HashEntry>,
}

impl Default for HashFile {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

pub struct JsonHashStore {
    path: PathBuf,
    state: Mutex<HashFile>,
}

impl JsonHashStore {
    /// Loads the sidecar file. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, GenError> {
        let path = path.into();
        let file = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file: HashFile =
                    serde_json::from_slice(&bytes).map_err(|source| GenError::HashStore {
                        path: path.clone(),
                        source,
                    })?;
                if file.version == STORE_VERSION {
                    file
                } else {
                    warn!(
                        path = %path.display(),
                        version = file.version,
                        "unknown hash store version, starting without baseline"
                    );
                    HashFile::default()
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashFile::default(),
            Err(e) => return Err(GenError::io(&path, e)),
        };
        debug!(path = %path.display(), entries = file.entries.len(), "hash store opened");

        Ok(Self {
            path,
            state: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn entry(&self, input: &Path) -> Option<HashEntry> {
        self.state.lock().await.entries.get(&key(input)).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Writes next to the target and renames over it.
    async fn write(&self, file: &HashFile) -> Result<(), GenError> {
        let bytes = serde_json::to_vec_pretty(file).map_err(|source| GenError::HashStore {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| GenError::io(parent, e))?;
            }
        }

        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| GenError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| GenError::io(&self.path, e))
    }
}

#[async_trait]
impl HashStore for JsonHashStore {
    async fn baseline(&self, input: &Path) -> Option<ContentHash> {
        self.entry(input).await.map(|e| e.sha256)
    }

    async fn record(&self, entries: Vec<(PathBuf, ContentHash)>) -> Result<(), GenError> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let now = Utc::now();
        for (input, sha256) in entries {
            next.entries.insert(
                key(&input),
                HashEntry {
                    sha256,
                    recorded_at: now,
                },
            );
        }

        self.write(&next).await?;
        debug!(path = %self.path.display(), entries = next.entries.len(), "hash store saved");
        *state = next;
        Ok(())
    }
}

fn key(input: &Path) -> String {
    input.to_string_lossy().into_owned()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
