pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod interface;

use crate::domain::entity::{StoreError, TableError, ValueError};

// TableDB version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Database result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Range error: {0}")]
    Range(String),

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValueError> for Error {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::Format { .. } => Error::Format(err.to_string()),
            ValueError::Range { .. } => Error::Range(err.to_string()),
        }
    }
}

impl From<TableError> for Error {
    fn from(err: TableError) -> Self {
        let message = err.to_string();
        match err {
            TableError::InvalidValue { source: ValueError::Range { .. }, .. }
            | TableError::ColumnPositionOutOfRange { .. } => Error::Range(message),
            TableError::InvalidValue { .. }
            | TableError::EmptyTableName
            | TableError::EmptyColumnName(_)
            | TableError::ValueTypeMismatch { .. } => Error::Format(message),
            TableError::ShapeMismatch { .. } | TableError::RowShapeMismatch { .. } => {
                Error::Shape(message)
            }
            TableError::ColumnNotFound { .. } | TableError::RowNotFound { .. } => {
                Error::NotFound(message)
            }
            TableError::ColumnAlreadyExists(_) => Error::Conflict(message),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TableNotFound(_) => Error::NotFound(err.to_string()),
            StoreError::TableAlreadyExists(_) => Error::Conflict(err.to_string()),
        }
    }
}
