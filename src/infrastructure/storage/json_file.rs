use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// ストレージエラー
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to replace {} with {}: {source}", .to.display(), .from.display())]
    Replace {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// 1つのJSON文書をファイルとして丸ごと読み書きする
///
/// 書き込みは一時ファイルに書いてからリネームするので、途中で失敗しても
/// 既存の文書は壊れない。複数プロセスからの同時更新は保護しない。
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    /// 文書全体を読み込む。ファイルが無ければ `None`
    pub async fn read_document(&self) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "document does not exist yet");
                Ok(None)
            }
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// 文書全体を上書きする
    pub async fn write_document(&self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let tmp_path = self.temp_path();
        tokio::fs::write(&tmp_path, contents)
            .await
            .map_err(|source| StorageError::Write {
                path: tmp_path.clone(),
                source,
            })?;

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StorageError::Replace {
                from: tmp_path.clone(),
                to: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), bytes = contents.len(), "document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_document_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("tables.json"));

        assert!(storage.read_document().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("Data").join("tables.json"));

        storage.write_document("[1]").await.unwrap();
        storage.write_document("[]").await.unwrap();

        assert_eq!(storage.read_document().await.unwrap().as_deref(), Some("[]"));
        assert!(!storage.temp_path().exists());
    }
}
