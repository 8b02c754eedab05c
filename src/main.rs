//! Dispersion front controller.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http server ──▶ routing ──────────▶ dispatch ──▶ JSON
//!                    (request id,     (pattern match,     (controller,
//!                     trace, timeout)  rewrite expand)     action, params)
//!
//!     dispersion.toml ──▶ config ──▶ watcher ──▶ route table swap
//! ```

use std::path::PathBuf;

use clap::Parser;

use dispersion::lifecycle::{start, StartupOptions};

#[derive(Parser)]
#[command(name = "dispersion", version)]
#[command(about = "Rewrite request paths and dispatch them to controllers", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "dispersion.toml")]
    config: PathBuf,

    /// Reload routes when the configuration file changes.
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    start(StartupOptions {
        config_path: args.config,
        watch: args.watch,
    })
    .await?;
    Ok(())
}
