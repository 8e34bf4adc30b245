use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entity::{Column, StoreError, Table, TableError, TableStore};
use crate::domain::repository::StoreRepository;
use crate::Result;

/// テーブル操作のアプリケーションサービス
///
/// どの操作も「文書を読み込む → メモリ上で変更する → 文書全体を保存する」の順で動く。
/// 途中で失敗した場合は保存しないので、永続化された文書はそのまま残る。
/// 同時に呼ばれた更新同士は保護しない（後から保存した方が勝つ）。
pub struct TableService {
    repository: Arc<dyn StoreRepository>,
}

impl TableService {
    pub fn new(repository: Arc<dyn StoreRepository>) -> Self {
        Self { repository }
    }

    /// すべてのテーブルを保存順に取得する
    pub async fn list_tables(&self) -> Result<Vec<Table>> {
        let store = self.repository.load().await?;
        debug!(tables = store.len(), "listing tables");
        Ok(store.into_tables())
    }

    /// 名前でテーブルを取得する（大文字小文字は区別しない）
    pub async fn get_table(&self, name: &str) -> Result<Table> {
        let store = self.repository.load().await?;
        let table = store
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))?;
        Ok(table)
    }

    /// テーブルを作成する
    pub async fn create_table(&self, table: Table) -> Result<()> {
        if let Err(e) = table.validate() {
            warn!(table = %table.name, error = %e, "table rejected");
            return Err(e.into());
        }

        let mut store = self.repository.load().await?;
        let name = table.name.clone();
        store.add_table(table)?;
        self.repository.save(&store).await?;

        info!(table = %name, "table created");
        Ok(())
    }

    /// テーブルを丸ごと置き換える。名前が変わる場合は他のテーブルとの重複を確認する
    pub async fn update_table(&self, original_name: &str, table: Table) -> Result<()> {
        let store = self.repository.load().await?;
        if store.find_by_name(original_name).is_none() {
            return Err(StoreError::TableNotFound(original_name.to_string()).into());
        }
        self.replace_and_save(store, original_name, table).await
    }

    /// テーブル名とカラム定義だけを差し替え、保存済みの行は同じ読み込みの中で引き継ぐ
    pub async fn redefine_table(&self, original_name: &str, name: String, columns: Vec<Column>) -> Result<()> {
        let store = self.repository.load().await?;
        let rows = store
            .find_by_name(original_name)
            .map(|current| current.rows.clone())
            .ok_or_else(|| StoreError::TableNotFound(original_name.to_string()))?;

        let table = Table { name, columns, rows };
        self.replace_and_save(store, original_name, table).await
    }

    async fn replace_and_save(&self, mut store: TableStore, original_name: &str, table: Table) -> Result<()> {
        let renamed = !table.name_matches(original_name);
        if renamed && store.find_by_name(&table.name).is_some() {
            warn!(from = %original_name, to = %table.name, "rename collides with another table");
            return Err(StoreError::TableAlreadyExists(table.name).into());
        }
        table.validate()?;

        let name = table.name.clone();
        store.replace_table(original_name, table);
        self.repository.save(&store).await?;

        info!(table = %name, original = %original_name, "table updated");
        Ok(())
    }

    /// テーブルを削除する
    pub async fn delete_table(&self, name: &str) -> Result<()> {
        let mut store = self.repository.load().await?;
        store
            .remove_table(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))?;
        self.repository.save(&store).await?;

        info!(table = %name, "table deleted");
        Ok(())
    }

    /// 行を追加し、追加した行の位置を返す
    pub async fn add_row(&self, table_name: &str, values: &[String]) -> Result<usize> {
        let index = self
            .mutate_table(table_name, |table| table.add_row(values))
            .await?;
        info!(table = %table_name, row = index, "row added");
        Ok(index)
    }

    /// 行をまるごと置き換える
    pub async fn edit_row(&self, table_name: &str, row_index: usize, values: &[String]) -> Result<()> {
        self.mutate_table(table_name, |table| table.edit_row(row_index, values))
            .await?;
        info!(table = %table_name, row = row_index, "row edited");
        Ok(())
    }

    pub async fn delete_row(&self, table_name: &str, row_index: usize) -> Result<()> {
        self.mutate_table(table_name, |table| table.delete_row(row_index))
            .await?;
        info!(table = %table_name, row = row_index, "row deleted");
        Ok(())
    }

    pub async fn rename_column(&self, table_name: &str, column_index: usize, new_name: &str) -> Result<()> {
        self.mutate_table(table_name, |table| table.rename_column(column_index, new_name))
            .await?;
        info!(table = %table_name, column = column_index, new_name = %new_name, "column renamed");
        Ok(())
    }

    pub async fn move_column(&self, table_name: &str, column_index: usize, new_index: usize) -> Result<()> {
        self.mutate_table(table_name, |table| table.move_column(column_index, new_index))
            .await?;
        info!(table = %table_name, from = column_index, to = new_index, "column moved");
        Ok(())
    }

    async fn mutate_table<T, F>(&self, table_name: &str, mutation: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut Table) -> std::result::Result<T, TableError> + Send,
    {
        let mut store = self.repository.load().await?;
        let table = store
            .find_by_name_mut(table_name)
            .ok_or_else(|| StoreError::TableNotFound(table_name.to_string()))?;

        let outcome = match mutation(table) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(table = %table_name, error = %e, "mutation rejected");
                return Err(e.into());
            }
        };

        self.repository.save(&store).await?;
        Ok(outcome)
    }
}
