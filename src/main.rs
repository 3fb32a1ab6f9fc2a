//! route-metrics: demo server
//!
//! Serves a few routes behind the request metrics middleware and exposes
//! the Prometheus scrape endpoint.
//!
//! ```sh
//! # Run with default config (~/.config/route-metrics/config.toml)
//! route-metrics
//!
//! # Custom config path
//! route-metrics --config /etc/route-metrics/config.toml
//!
//! # Validate config without starting
//! route-metrics --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use route_metrics::config::{default_config_path, AppConfig, CONFIG_ENV};
use route_metrics::server::{init_tracing, ServerHandle};

/// HTTP server instrumented with per-route request metrics.
#[derive(Parser, Debug)]
#[command(name = "route-metrics", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if cli.check {
        if let Some(e) = load_error {
            eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!(
            "   Metrics     : {}_{}_* at {}",
            config.metrics.namespace, config.metrics.subsystem, config.metrics.endpoint
        );
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(config).await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
