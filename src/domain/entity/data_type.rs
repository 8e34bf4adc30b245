use derive_more::Display;
use strum::EnumString;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::entity::value::{coerce, Value, ValueError};

/// カラムに宣言できる型タグ
///
/// 文書上は文字列で保存される。未知のタグは `Other` としてそのまま保持し、
/// 値の変換では `string` と同じ扱いになる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    #[strum(serialize = "integer")]
    #[display(fmt = "integer")]
    Integer,

    #[strum(serialize = "real")]
    #[display(fmt = "real")]
    Real,

    #[strum(serialize = "char")]
    #[display(fmt = "char")]
    Char,

    #[strum(serialize = "string")]
    #[display(fmt = "string")]
    Text,

    #[strum(serialize = "$")]
    #[display(fmt = "$")]
    Money,

    #[strum(serialize = "$Invl")]
    #[display(fmt = "$Invl")]
    Interval,

    #[strum(default)]
    #[display(fmt = "{}", _0)]
    Other(String),
}

impl ColumnType {
    /// 生の入力文字列をこの型の値へ変換する
    pub fn coerce(&self, raw: &str) -> Result<Value, ValueError> {
        coerce(raw, self)
    }

    /// 値の型タグがこのカラム型に格納できるかどうか
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ColumnType::Integer, Value::Integer(_))
                | (ColumnType::Real, Value::Real(_))
                | (ColumnType::Char, Value::Char(_))
                | (ColumnType::Text, Value::Text(_))
                | (ColumnType::Money, Value::Money(_))
                | (ColumnType::Interval, Value::Interval(_))
                | (ColumnType::Other(_), Value::Text(_))
        )
    }
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        ColumnType::from_str(&tag).unwrap_or(ColumnType::Other(tag))
    }
}

impl From<ColumnType> for String {
    fn from(column_type: ColumnType) -> Self {
        column_type.to_string()
    }
}
