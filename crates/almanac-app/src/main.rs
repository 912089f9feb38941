use std::sync::Arc;

use almanac_app::app::api::routes;
use almanac_app::config::{ConfigHandler, Settings, StorageBackend};
use almanac_app::store_handler::StoreHandler;
use almanac_core::config::load_config;
use almanac_db::db::connection::create_pool;
use almanac_db::db::migrations::run_migrations;
use almanac_service::store::{MemoryStore, PgStore, SharedStore};
use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

async fn open_store(config: &Settings) -> anyhow::Result<SharedStore> {
    match config.database.backend {
        StorageBackend::Postgres => {
            run_migrations(&config.database.url).await?;
            let pool = create_pool(
                &config.database.url,
                u32::from(config.database.max_connections),
            )
            .await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Almanac calendar server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let store = open_store(&config).await?;

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(StoreHandler { store })
        .hoop(ConfigHandler {
            settings: config.clone(),
        })
        .push(routes());

    tracing::info!(origin = %config.server.origin(), "Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
