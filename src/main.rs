use std::{path::Path, sync::Arc};

use anyhow::Context;
use migration::MigratorTrait;
use sea_orm::Database;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};
use vintage_reads::{
    VintageResult,
    api::VintageApi,
    config::Config,
    server,
    storage::db::{SeaCatalogRepo, SeaUserRepo},
};

#[tokio::main]
async fn main() -> VintageResult<()> {
    // Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,sea_orm=warn,sqlx=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting Vintage Reads"
    );
    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let db = Arc::new(db_conn);
    let users = Arc::new(SeaUserRepo::new(db.clone()));
    let catalog = Arc::new(SeaCatalogRepo::new(db));

    if let Some(seed_path) = &config.catalog_seed_path {
        let added = server::seed_catalog(catalog.as_ref(), Path::new(seed_path)).await?;
        tracing::info!(seed_path = %seed_path, added, "catalog seed applied");
    }

    let api = VintageApi { users, catalog };
    server::run_poem(api, Arc::new(config)).await?;
    Ok(())
}
