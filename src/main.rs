use tracing::info;
use tracing_subscriber::EnvFilter;
use tabledb::interface::api::{start_server, ServerConfig};
use tabledb::VERSION;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("TableDB version: {}", VERSION);

    let config = ServerConfig::from_env()?;
    start_server(config).await
}
