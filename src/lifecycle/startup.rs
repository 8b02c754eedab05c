//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging from the loaded configuration
//! - Compile the route table and start the config watcher
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A missing config file is not an error; defaults apply
//! - Listener starts last (traffic only when ready)

use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::{load_config, AppConfig, ConfigError, ConfigWatcher};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::logging;
use crate::routing::RouteError;

/// How the service was asked to start.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub config_path: PathBuf,
    /// Reload routes when the config file changes.
    pub watch: bool,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("routes: {0}")]
    Routes(#[from] RouteError),

    #[error("config watcher: {0}")]
    Watch(#[from] notify::Error),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the service until a shutdown signal arrives.
pub async fn start(options: StartupOptions) -> Result<(), StartupError> {
    let config_found = options.config_path.exists();
    let config = if config_found {
        load_config(&options.config_path)?
    } else {
        AppConfig::default()
    };

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dispersion starting");

    if !config_found {
        tracing::warn!(
            path = %options.config_path.display(),
            "Config file not found, using defaults"
        );
    }
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let server = HttpServer::new(&config)?;

    // Dropping the watcher stops reloads.
    let (_watcher, config_updates) = if options.watch && config_found {
        let (watcher, updates) = ConfigWatcher::new(&options.config_path);
        (Some(watcher.run()?), updates)
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
