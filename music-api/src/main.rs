//! music-api - REST API over songs and artists
//!
//! Startup order: configuration, logging, database pool, tables, router.

use anyhow::Result;
use clap::Parser;
use music_common::config::{Config, Overrides};
use music_common::persist::{self, Conn};
use music_common::logging;
use music_api::{build_router, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Command-line arguments. Each one beats the environment and the config file.
#[derive(Debug, Parser)]
#[command(name = "music-api", version, about = "Songs and artists over HTTP")]
struct Args {
    /// Deployment profile: local, test, production or job*
    #[arg(long)]
    scope: Option<String>,

    /// TOML file with port, database_url and max_connections
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// sqlx database URL
    #[arg(long)]
    database_url: Option<String>,
}

impl Args {
    fn overrides(self) -> Overrides {
        Overrides {
            scope: self.scope,
            config_file: self.config,
            port: self.port,
            database_url: self.database_url,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load(&Args::parse().overrides())?;

    logging::init(config.scope)?;

    info!(
        "Starting music-api v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("MUSIC_API_BUILD")
    );
    info!(scope = %config.scope, version = %config.app_version, job = config.job, "Starting up API");

    let pool = match persist::connect(&config.database_url, config.pool_limits()).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };
    persist::ensure_schema(&pool).await?;

    let state = AppState::new(Arc::new(Conn::new(pool)));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("music-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("music-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
