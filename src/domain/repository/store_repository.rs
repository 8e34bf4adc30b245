use async_trait::async_trait;
use crate::domain::entity::TableStore;
use crate::Error;

// ストアリポジトリのエラー
#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Document error: {0}")]
    DocumentError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StorageError(msg) => Error::Storage(msg),
            RepositoryError::DocumentError(msg) => Error::Storage(format!("Invalid document: {}", msg)),
            RepositoryError::InternalError(msg) => Error::Internal(msg),
        }
    }
}

/// ストアリポジトリ - テーブル集合全体を1つの文書として読み書きする抽象インターフェース
///
/// 部分的な更新はなく、`save` は常に文書全体を書き直す。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// 文書を読み込む。まだ文書が無ければ空のストアを返す
    async fn load(&self) -> Result<TableStore, RepositoryError>;

    /// ストア全体で文書を上書きする
    async fn save(&self, store: &TableStore) -> Result<(), RepositoryError>;
}
