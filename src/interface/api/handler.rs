use axum::{
    extract::{Path, Json, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::application::TableService;
use crate::domain::entity::{Column, ColumnType, Table, Value};
use crate::Error;

/// API エラー
#[derive(Error, Debug)]
#[error(transparent)]
pub struct ApiError(#[from] Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Format(_) | Error::Range(_) | Error::Shape(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Config(_) | Error::Storage(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });

        (status, body).into_response()
    }
}

/// エラーレスポンス
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// カラム定義
#[derive(Serialize, Deserialize)]
pub struct ColumnInfo {
    name: String,
    #[serde(rename = "type")]
    column_type: String,
}

impl From<&Column> for ColumnInfo {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            column_type: column.column_type.to_string(),
        }
    }
}

impl From<ColumnInfo> for Column {
    fn from(info: ColumnInfo) -> Self {
        Column::new(info.name, ColumnType::from(info.column_type))
    }
}

/// テーブル作成・更新のリクエスト
#[derive(Deserialize)]
pub struct TableRequest {
    name: String,
    #[serde(default)]
    columns: Vec<ColumnInfo>,
}

/// 行の追加・更新のリクエスト
#[derive(Deserialize)]
pub struct RowRequest {
    values: Vec<String>,
}

#[derive(Deserialize)]
pub struct RenameColumnRequest {
    new_name: String,
}

#[derive(Deserialize)]
pub struct MoveColumnRequest {
    new_index: usize,
}

/// テーブル一覧の要素
#[derive(Serialize)]
pub struct TableSummary {
    name: String,
    columns: Vec<ColumnInfo>,
    row_count: usize,
}

/// テーブル詳細のレスポンス
#[derive(Serialize)]
pub struct TableResponse {
    name: String,
    columns: Vec<ColumnInfo>,
    rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
pub struct RowCreated {
    row_index: usize,
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Integer(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
        Value::Real(f) => {
            if let Some(num) = serde_json::Number::from_f64(*f) {
                serde_json::Value::Number(num)
            } else {
                serde_json::Value::String(f.to_string())
            }
        },
        Value::Char(c) => serde_json::Value::String(c.to_string()),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Money(m) => serde_json::Value::String(m.to_string()),
        Value::Interval(iv) => serde_json::json!({ "start": iv.start, "end": iv.end }),
    }
}

impl From<Table> for TableResponse {
    fn from(table: Table) -> Self {
        Self {
            columns: table.columns.iter().map(ColumnInfo::from).collect(),
            rows: table
                .rows
                .iter()
                .map(|row| row.values.iter().map(value_to_json).collect())
                .collect(),
            name: table.name,
        }
    }
}

/// ヘルスチェックハンドラー
pub async fn health_check_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// テーブル一覧取得ハンドラー
pub async fn list_tables_handler(
    Extension(service): Extension<Arc<TableService>>,
) -> Result<Json<Vec<TableSummary>>, ApiError> {
    let tables = service.list_tables().await?;
    let summaries = tables
        .iter()
        .map(|table| TableSummary {
            name: table.name.clone(),
            columns: table.columns.iter().map(ColumnInfo::from).collect(),
            row_count: table.rows.len(),
        })
        .collect();
    Ok(Json(summaries))
}

/// テーブル作成ハンドラー
pub async fn create_table_handler(
    Extension(service): Extension<Arc<TableService>>,
    Json(payload): Json<TableRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let columns = payload.columns.into_iter().map(Column::from).collect();
    service.create_table(Table::new(payload.name, columns)).await?;
    Ok(StatusCode::CREATED)
}

/// テーブル詳細取得ハンドラー
pub async fn get_table_handler(
    Path(table_name): Path<String>,
    Extension(service): Extension<Arc<TableService>>,
) -> Result<Json<TableResponse>, ApiError> {
    let table = service.get_table(&table_name).await?;
    Ok(Json(TableResponse::from(table)))
}

/// テーブルの名前とカラム定義を更新する。既存の行はそのまま引き継ぐ
pub async fn update_table_handler(
    Path(table_name): Path<String>,
    Extension(service): Extension<Arc<TableService>>,
    Json(payload): Json<TableRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let columns = payload.columns.into_iter().map(Column::from).collect();
    service
        .redefine_table(&table_name, payload.name, columns)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_table_handler(
    Path(table_name): Path<String>,
    Extension(service): Extension<Arc<TableService>>,
) -> Result<impl IntoResponse, ApiError> {
    service.delete_table(&table_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 行追加ハンドラー
pub async fn add_row_handler(
    Path(table_name): Path<String>,
    Extension(service): Extension<Arc<TableService>>,
    Json(payload): Json<RowRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let row_index = service.add_row(&table_name, &payload.values).await?;
    Ok((StatusCode::CREATED, Json(RowCreated { row_index })))
}

pub async fn edit_row_handler(
    Path((table_name, row_index)): Path<(String, usize)>,
    Extension(service): Extension<Arc<TableService>>,
    Json(payload): Json<RowRequest>,
) -> Result<impl IntoResponse, ApiError> {
    service.edit_row(&table_name, row_index, &payload.values).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_row_handler(
    Path((table_name, row_index)): Path<(String, usize)>,
    Extension(service): Extension<Arc<TableService>>,
) -> Result<impl IntoResponse, ApiError> {
    service.delete_row(&table_name, row_index).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn rename_column_handler(
    Path((table_name, column_index)): Path<(String, usize)>,
    Extension(service): Extension<Arc<TableService>>,
    Json(payload): Json<RenameColumnRequest>,
) -> Result<impl IntoResponse, ApiError> {
    service
        .rename_column(&table_name, column_index, &payload.new_name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_column_handler(
    Path((table_name, column_index)): Path<(String, usize)>,
    Extension(service): Extension<Arc<TableService>>,
    Json(payload): Json<MoveColumnRequest>,
) -> Result<impl IntoResponse, ApiError> {
    service
        .move_column(&table_name, column_index, payload.new_index)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
