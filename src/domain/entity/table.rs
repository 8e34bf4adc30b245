use crate::domain::entity::column::Column;
use crate::domain::entity::data_type::ColumnType;
use crate::domain::entity::value::{Value, ValueError};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Table name must not be empty")]
    EmptyTableName,

    #[error("Column at position {0} has an empty name")]
    EmptyColumnName(usize),

    #[error("Column '{0}' already exists in table")]
    ColumnAlreadyExists(String),

    #[error("Column index {index} not found (table has {count} columns)")]
    ColumnNotFound { index: usize, count: usize },

    #[error("Target column position {index} is out of range 0..={max}")]
    ColumnPositionOutOfRange { index: usize, max: usize },

    #[error("Row index {index} not found (table has {count} rows)")]
    RowNotFound { index: usize, count: usize },

    #[error("Number of values does not match number of columns: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Row {row} holds {actual} values but the table has {expected} columns")]
    RowShapeMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Error parsing column '{column}': {source}")]
    InvalidValue {
        column: String,
        #[source]
        source: ValueError,
    },

    #[error("Row {row}, column '{column}': a {actual} value cannot be stored in a {expected} column")]
    ValueTypeMismatch {
        row: usize,
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },
}

/// 1行のデータを表現する。`values[i]` は `columns[i]` に対応する
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// 指定位置の値を取得する
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    // table name
    pub name: String,

    // table columns
    #[serde(default)]
    pub columns: Vec<Column>,

    // table rows
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// 大文字小文字を区別せずにテーブル名を比較する
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// テーブルのカラム名のリストを取得する
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// 外部から受け取ったテーブル全体が有効かチェックする
    pub fn validate(&self) -> Result<(), TableError> {
        if self.name.trim().is_empty() {
            return Err(TableError::EmptyTableName);
        }

        if let Some(position) = self.columns.iter().position(|c| c.name.trim().is_empty()) {
            return Err(TableError::EmptyColumnName(position));
        }

        if let Some(duplicate) = self
            .columns
            .iter()
            .duplicates_by(|c| c.name.to_lowercase())
            .next()
        {
            return Err(TableError::ColumnAlreadyExists(duplicate.name.clone()));
        }

        for (row_index, row) in self.rows.iter().enumerate() {
            if row.values.len() != self.columns.len() {
                return Err(TableError::RowShapeMismatch {
                    row: row_index,
                    expected: self.columns.len(),
                    actual: row.values.len(),
                });
            }

            for (column, value) in self.columns.iter().zip(&row.values) {
                if !column.column_type.accepts(value) {
                    return Err(TableError::ValueTypeMismatch {
                        row: row_index,
                        column: column.name.clone(),
                        expected: column.column_type.clone(),
                        actual: value.column_type(),
                    });
                }
            }
        }

        Ok(())
    }

    /// 生の入力をカラム順に変換する。最初の失敗で中断し、部分的な行は作らない
    pub fn coerce_values<S: AsRef<str>>(&self, raw_values: &[S]) -> Result<Vec<Value>, TableError> {
        if raw_values.len() != self.columns.len() {
            return Err(TableError::ShapeMismatch {
                expected: self.columns.len(),
                actual: raw_values.len(),
            });
        }

        self.columns
            .iter()
            .zip(raw_values)
            .map(|(column, raw)| {
                column
                    .column_type
                    .coerce(raw.as_ref())
                    .map_err(|source| TableError::InvalidValue {
                        column: column.name.clone(),
                        source,
                    })
            })
            .collect()
    }

    fn check_row_index(&self, index: usize) -> Result<(), TableError> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(TableError::RowNotFound {
                index,
                count: self.rows.len(),
            })
        }
    }

    /// 行を追加し、追加した行の位置を返す
    pub fn add_row<S: AsRef<str>>(&mut self, raw_values: &[S]) -> Result<usize, TableError> {
        let values = self.coerce_values(raw_values)?;
        self.rows.push(Row::new(values));
        Ok(self.rows.len() - 1)
    }

    /// 行をまるごと置き換え、置き換え前の行を返す
    pub fn edit_row<S: AsRef<str>>(&mut self, index: usize, raw_values: &[S]) -> Result<Row, TableError> {
        self.check_row_index(index)?;
        let values = self.coerce_values(raw_values)?;
        Ok(std::mem::replace(&mut self.rows[index], Row::new(values)))
    }

    /// 行を削除し、削除した行を返す
    pub fn delete_row(&mut self, index: usize) -> Result<Row, TableError> {
        self.check_row_index(index)?;
        Ok(self.rows.remove(index))
    }

    /// カラム名を変更する。行データには触れない
    ///
    /// 既存カラムとの重複は完全一致で判定する（自分自身の現在の名前も含む）。
    pub fn rename_column(&mut self, index: usize, new_name: impl Into<String>) -> Result<(), TableError> {
        let new_name = new_name.into();
        let count = self.columns.len();
        if index >= count {
            return Err(TableError::ColumnNotFound { index, count });
        }
        if self.columns.iter().any(|c| c.name == new_name) {
            return Err(TableError::ColumnAlreadyExists(new_name));
        }

        self.columns[index].name = new_name;
        Ok(())
    }

    /// カラムを `index` から `new_index` へ移動し、全行の値も同じように並べ替える
    ///
    /// `new_index` は `0..=count` を受け付け、`count` は末尾への移動を意味する。
    /// 列数と合わない行が一つでもあれば、何も変更せずに失敗する。
    pub fn move_column(&mut self, index: usize, new_index: usize) -> Result<(), TableError> {
        let count = self.columns.len();
        if index >= count {
            return Err(TableError::ColumnNotFound { index, count });
        }
        if new_index > count {
            return Err(TableError::ColumnPositionOutOfRange {
                index: new_index,
                max: count,
            });
        }
        if let Some((row, misaligned)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.values.len() != count)
        {
            return Err(TableError::RowShapeMismatch {
                row,
                expected: count,
                actual: misaligned.values.len(),
            });
        }

        // 取り外した後の長さは count - 1 なので末尾指定をそこに収める
        let target = new_index.min(count - 1);

        let column = self.columns.remove(index);
        self.columns.insert(target, column);

        for row in &mut self.rows {
            let value = row.values.remove(index);
            row.values.insert(target, value);
        }

        Ok(())
    }
}
