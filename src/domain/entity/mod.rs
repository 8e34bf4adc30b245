pub mod data_type;
pub mod money;
pub mod value;
pub mod column;
pub mod table;
pub mod store;
// src/domain/entity/mod.rs

pub use data_type::ColumnType;
pub use money::{Money, MoneyParseError, MONEY_MAX};
pub use value::{coerce, Interval, Value, ValueError};
pub use column::Column;
pub use table::{Table, Row, TableError};
pub use store::{TableStore, StoreError};
