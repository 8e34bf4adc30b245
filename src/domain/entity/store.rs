use crate::domain::entity::table::Table;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Table {0} not found")]
    TableNotFound(String),

    #[error("Table {0} already exists")]
    TableAlreadyExists(String),
}

/// 全テーブルの集合。文書1つ分として丸ごと読み書きされる
///
/// テーブル名の比較はすべて大文字小文字を区別しない。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableStore {
    tables: Vec<Table>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// すべてのテーブルを保存順に取得する
    pub fn list_tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn into_tables(self) -> Vec<Table> {
        self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// 名前でテーブルを取得する
    pub fn find_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name_matches(name))
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name_matches(name))
    }

    /// テーブルを末尾に追加する。同名のテーブルがあれば失敗する
    pub fn add_table(&mut self, table: Table) -> Result<(), StoreError> {
        if self.find_by_name(&table.name).is_some() {
            return Err(StoreError::TableAlreadyExists(table.name));
        }
        self.tables.push(table);
        Ok(())
    }

    /// `original_name` のテーブルを同じ位置で置き換え、元のテーブルを返す
    ///
    /// 名前を変更する場合、他のテーブルとの重複確認は呼び出し側の責任。
    pub fn replace_table(&mut self, original_name: &str, updated: Table) -> Option<Table> {
        let slot = self.find_by_name_mut(original_name)?;
        Some(std::mem::replace(slot, updated))
    }

    /// テーブルを削除する。存在しなければ何もしない
    pub fn remove_table(&mut self, name: &str) -> Option<Table> {
        let index = self.tables.iter().position(|t| t.name_matches(name))?;
        Some(self.tables.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Column, ColumnType};

    fn store() -> TableStore {
        TableStore::from_tables(vec![
            Table::new("Users", vec![Column::new("id", ColumnType::Integer)]),
            Table::new("Orders", vec![Column::new("amt", ColumnType::Money)]),
            Table::new("Items", Vec::new()),
        ])
    }

    fn names(store: &TableStore) -> Vec<&str> {
        store.list_tables().iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn lookup_ignores_case() {
        let store = store();
        assert_eq!(store.find_by_name("orders").map(|t| t.name.as_str()), Some("Orders"));
        assert!(store.find_by_name("missing").is_none());
    }

    #[test]
    fn add_table_rejects_case_insensitive_duplicates() {
        let mut store = store();
        assert_eq!(
            store.add_table(Table::new("USERS", Vec::new())),
            Err(StoreError::TableAlreadyExists("USERS".to_string()))
        );
        store.add_table(Table::new("Logs", Vec::new())).unwrap();
        assert_eq!(names(&store), vec!["Users", "Orders", "Items", "Logs"]);
    }

    #[test]
    fn replace_table_keeps_position() {
        let mut store = store();
        let previous = store.replace_table("orders", Table::new("Purchases", Vec::new()));

        assert_eq!(previous.map(|t| t.name), Some("Orders".to_string()));
        assert_eq!(names(&store), vec!["Users", "Purchases", "Items"]);
        assert!(store.replace_table("nope", Table::new("x", Vec::new())).is_none());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_table_is_a_noop_when_absent() {
        let mut store = store();
        assert!(store.remove_table("ghost").is_none());
        assert_eq!(store.len(), 3);

        assert!(store.remove_table("ITEMS").is_some());
        assert_eq!(names(&store), vec!["Users", "Orders"]);
    }
}
