//! Content hashes of tracked inputs.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::GenError;

/// SHA-256 of a file's bytes, kept as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    pub async fn of_file(path: &Path) -> Result<Self, GenError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| GenError::io(path, e))?;
        Ok(Self::of_bytes(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_known_vector() {
        let h = ContentHash::of_bytes(b"abc");
        assert_eq!(
            h.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn file_hash_matches_byte_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.proto");
        std::fs::write(&path, "syntax = \"proto2\";\n").unwrap();

        let from_file = ContentHash::of_file(&path).await.unwrap();
        assert_eq!(from_file, ContentHash::of_bytes(b"syntax = \"proto2\";\n"));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentHash::of_file(&dir.path().join("nope.proto"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));
    }
}
