use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entity::TableStore;
use crate::domain::repository::{RepositoryError, StoreRepository};

/// インメモリリポジトリの実装
///
/// 読み込みのたびに複製を返すので、ファイル版と同じく保存するまで変更は残らない。
#[derive(Debug, Default)]
pub struct MemoryStoreRepository {
    store: RwLock<TableStore>,
    saves: AtomicUsize,
}

impl MemoryStoreRepository {
    pub fn new(store: TableStore) -> Self {
        Self {
            store: RwLock::new(store),
            saves: AtomicUsize::new(0),
        }
    }

    /// これまでに `save` が呼ばれた回数
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> TableStore {
        self.store.read().await.clone()
    }
}

#[async_trait]
impl StoreRepository for MemoryStoreRepository {
    async fn load(&self) -> Result<TableStore, RepositoryError> {
        Ok(self.store.read().await.clone())
    }

    async fn save(&self, store: &TableStore) -> Result<(), RepositoryError> {
        *self.store.write().await = store.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
