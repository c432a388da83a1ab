use std::sync::Arc;

use storefront_api::{
    app::{self, AppState},
    config::Config,
    infrastructure::{database::DatabaseManager, logger::Logger, password::Argon2Hasher},
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    Logger::init(&config.log_directive);

    info!("Starting storefront API...");

    let db = DatabaseManager::connect(&config.database)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    if config.database.bootstrap_schema {
        db.ensure_schema().await?;
    }

    let state = AppState::from_pool(db.pool().clone(), Arc::new(Argon2Hasher::new()));
    let router = app::router(state);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let served = app::serve(listener, router).await;

    db.close().await;
    served?;

    info!("Server stopped");
    Ok(())
}
