use axum::{
    Router,
    routing::{get, post, put},
    Extension,
    Server,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::TableService;
use crate::domain::repository::StoreRepository;
use crate::infrastructure::repository::JsonStoreRepository;
use crate::interface::api::handler::{
    health_check_handler,
    list_tables_handler,
    create_table_handler,
    get_table_handler,
    update_table_handler,
    delete_table_handler,
    add_row_handler,
    edit_row_handler,
    delete_row_handler,
    rename_column_handler,
    move_column_handler,
};
use crate::Error;

const PORT_ENV: &str = "TABLEDB_PORT";
const DATA_FILE_ENV: &str = "TABLEDB_DATA_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub data_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080, // デフォルトポート番号
            data_file: PathBuf::from("Data").join("tables.json"),
        }
    }
}

impl ServerConfig {
    /// 環境変数で既定値を上書きする
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(port) = lookup(PORT_ENV) {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("{}={:?}: {}", PORT_ENV, port, e)))?;
        }
        if let Some(path) = lookup(DATA_FILE_ENV).filter(|p| !p.trim().is_empty()) {
            config.data_file = PathBuf::from(path);
        }

        Ok(config)
    }
}

/// ルーターを組み立てる
pub fn build_router(service: Arc<TableService>) -> Router {
    Router::new()
        .route("/health", get(health_check_handler))
        .route("/api/tables", get(list_tables_handler).post(create_table_handler))
        .route(
            "/api/tables/:table_name",
            get(get_table_handler)
                .put(update_table_handler)
                .delete(delete_table_handler),
        )
        .route("/api/tables/:table_name/rows", post(add_row_handler))
        .route(
            "/api/tables/:table_name/rows/:row_index",
            put(edit_row_handler).delete(delete_row_handler),
        )
        .route(
            "/api/tables/:table_name/columns/:column_index/rename",
            post(rename_column_handler),
        )
        .route(
            "/api/tables/:table_name/columns/:column_index/move",
            post(move_column_handler),
        )
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // リポジトリとサービスの初期化
    let repository: Arc<dyn StoreRepository> =
        Arc::new(JsonStoreRepository::new(config.data_file.clone()));
    let service = Arc::new(TableService::new(repository));

    let app = build_router(service);

    // サーバーのアドレス設定
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!(data_file = %config.data_file.display(), "サーバーを{}で起動中...", addr);

    // サーバーの起動
    Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}
