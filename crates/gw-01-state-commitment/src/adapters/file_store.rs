//! # File-Backed Tree Store
//!
//! One record per tree id under a directory: the gzip snapshot blob plus a
//! small JSON sidecar carrying the root tag and save timestamp. Writes go
//! through a temp file and rename so a crash mid-save leaves the previous
//! record intact.

use crate::domain::errors::StateCommitmentError;
use crate::ports::outbound::{TreeRecord, TreeStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sidecar metadata stored next to the blob.
#[derive(Debug, Serialize, Deserialize)]
struct RecordMeta {
    root: String,
    updated_at: u64,
}

/// Directory-backed [`TreeStore`].
#[derive(Debug)]
pub struct FileTreeStore {
    dir: PathBuf,
}

impl FileTreeStore {
    /// Create a store rooted at `dir`. The directory is created on first
    /// save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn blob_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.leaves.gz", sanitize(id)))
    }

    fn meta_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.meta.json", sanitize(id)))
    }
}

/// Keep ids filesystem-safe; anything exotic maps to '_'.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await
}

#[async_trait]
impl TreeStore for FileTreeStore {
    async fn fetch(&self, id: &str) -> Result<Option<TreeRecord>, StateCommitmentError> {
        let meta_bytes = match tokio::fs::read(self.meta_path(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StateCommitmentError::Store(format!("read meta: {e}"))),
        };
        let meta: RecordMeta = serde_json::from_slice(&meta_bytes)
            .map_err(|e| StateCommitmentError::Store(format!("decode meta: {e}")))?;

        let leaves_gzip = tokio::fs::read(self.blob_path(id))
            .await
            .map_err(|e| StateCommitmentError::Store(format!("read blob: {e}")))?;

        Ok(Some(TreeRecord {
            root: meta.root,
            leaves_gzip,
            updated_at: meta.updated_at,
        }))
    }

    async fn put(&self, id: &str, record: TreeRecord) -> Result<(), StateCommitmentError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StateCommitmentError::Store(format!("create dir: {e}")))?;

        let meta = RecordMeta {
            root: record.root,
            updated_at: record.updated_at,
        };
        let meta_bytes = serde_json::to_vec(&meta)
            .map_err(|e| StateCommitmentError::Store(format!("encode meta: {e}")))?;

        write_atomic(&self.blob_path(id), &record.leaves_gzip)
            .await
            .map_err(|e| StateCommitmentError::Store(format!("write blob: {e}")))?;
        write_atomic(&self.meta_path(id), &meta_bytes)
            .await
            .map_err(|e| StateCommitmentError::Store(format!("write meta: {e}")))
    }
}
