use crate::domain::entity::data_type::ColumnType;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use std::fmt;

/// テーブルのカラムを表すエンティティ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "PascalCase")]
pub struct Column {
    /// カラム名
    #[builder(setter(into))]
    pub name: String,

    /// 型タグ
    #[serde(rename = "Type")]
    #[builder(setter(into))]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.column_type)
    }
}
