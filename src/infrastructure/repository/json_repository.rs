use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::entity::TableStore;
use crate::domain::repository::{RepositoryError, StoreRepository};
use crate::infrastructure::storage::{JsonFileStorage, StorageError};

/// JSONファイルを永続化先とするリポジトリの実装
///
/// 文書はテーブルの配列をインデント付きで書き出したもの。
pub struct JsonStoreRepository {
    storage: JsonFileStorage,
}

impl JsonStoreRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: JsonFileStorage::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }
}

#[async_trait]
impl StoreRepository for JsonStoreRepository {
    async fn load(&self) -> Result<TableStore, RepositoryError> {
        let document = match self.storage.read_document().await? {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Ok(TableStore::new()),
        };

        let store: TableStore = serde_json::from_str(&document)
            .map_err(|e| RepositoryError::DocumentError(e.to_string()))?;

        debug!(path = %self.path().display(), tables = store.len(), "store loaded");
        Ok(store)
    }

    async fn save(&self, store: &TableStore) -> Result<(), RepositoryError> {
        let document = serde_json::to_string_pretty(store)
            .map_err(|e| RepositoryError::DocumentError(e.to_string()))?;

        self.storage.write_document(&document).await?;

        debug!(path = %self.path().display(), tables = store.len(), "store saved");
        Ok(())
    }
}

impl From<StorageError> for RepositoryError {
    fn from(error: StorageError) -> Self {
        RepositoryError::StorageError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Column, ColumnType, Interval, Row, Table, Value};
    use proptest::prelude::*;

    fn sample_store() -> TableStore {
        let mut people = Table::new(
            "People",
            vec![
                Column::new("id", ColumnType::Integer),
                Column::new("height", ColumnType::Real),
                Column::new("initial", ColumnType::Char),
                Column::new("bio", ColumnType::Text),
                Column::new("salary", ColumnType::Money),
                Column::new("shift", ColumnType::Interval),
                Column::new("born", ColumnType::from("date".to_string())),
            ],
        );
        people
            .add_row(&["1", "1.82", "J", "likes \"quotes\"", "1200.50", "9-17.5", "1990-01-01"])
            .unwrap();
        people
            .add_row(&["2", "1.6", "é", "", "0.10", "22-6", "?"])
            .unwrap();
        // 17桁の仮数を持つ値も最後の桁まで戻ってくること
        people
            .add_row(&["3", "1.0715660391465826e-75", "z", "x", "0", "0.30000000000000004-1.0715660391465826e75", ""])
            .unwrap();
        people.rows.push(Row::new(vec![
            Value::Integer(4),
            Value::Real(-1.81996730402717e-179),
            Value::Char('q'),
            Value::Text(String::new()),
            Value::Money("1".parse().unwrap()),
            Value::Interval(Interval::new(-1.603964615428183e143, 1.0715660391465826e-75)),
            Value::Text(String::new()),
        ]));

        TableStore::from_tables(vec![people, Table::new("Empty", Vec::new())])
    }

    #[tokio::test]
    async fn load_without_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonStoreRepository::new(dir.path().join("tables.json"));

        assert!(repository.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonStoreRepository::new(dir.path().join("tables.json"));
        let store = sample_store();

        repository.save(&store).await.unwrap();
        let loaded = repository.load().await.unwrap();
        assert_eq!(loaded, store);

        let first = std::fs::read_to_string(repository.path()).unwrap();
        repository.save(&loaded).await.unwrap();
        let second = std::fs::read_to_string(repository.path()).unwrap();
        assert_eq!(first, second);
    }

    fn finite_f64() -> impl Strategy<Value = f64> {
        any::<f64>().prop_filter("finite", |v| v.is_finite())
    }

    proptest! {
        #[test]
        fn arbitrary_floats_survive_save_and_load(
            real in finite_f64(),
            start in finite_f64(),
            end in finite_f64(),
        ) {
            let mut table = Table::new(
                "floats",
                vec![
                    Column::new("r", ColumnType::Real),
                    Column::new("span", ColumnType::Interval),
                ],
            );
            table.rows.push(Row::new(vec![
                Value::Real(real),
                Value::Interval(Interval::new(start, end)),
            ]));
            let store = TableStore::from_tables(vec![table]);

            let dir = tempfile::tempdir().unwrap();
            let repository = JsonStoreRepository::new(dir.path().join("tables.json"));
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let loaded = runtime.block_on(async {
                repository.save(&store).await.unwrap();
                repository.load().await.unwrap()
            });

            prop_assert_eq!(loaded, store);
        }
    }

    #[tokio::test]
    async fn document_is_indented_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonStoreRepository::new(dir.path().join("tables.json"));
        repository.save(&sample_store()).await.unwrap();

        let text = std::fs::read_to_string(repository.path()).unwrap();
        assert!(text.contains("\n  {\n    \"Name\": \"People\""));
        assert!(text.find("\"People\"").unwrap() < text.find("\"Empty\"").unwrap());
        assert!(text.contains("\"Type\": \"$Invl\""));
        assert!(text.contains("\"Money\": \"1200.50\""));
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonStoreRepository::new(&path).load().await.unwrap_err();
        assert!(matches!(err, RepositoryError::DocumentError(_)));
    }
}
