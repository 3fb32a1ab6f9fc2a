//! Server runtime.
//!
//! [`ServerHandle`] owns the lifecycle: metrics registration, the HTTP
//! listener, and graceful shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::interfaces::http::create_api_router;
use crate::metrics::{MetricsRegistry, RequestMetrics};
use crate::shared::errors::AppError;
use crate::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

/// Handle to a running server.
///
/// # Examples
///
/// ```rust,no_run
/// use route_metrics::config::AppConfig;
/// use route_metrics::server::ServerHandle;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(AppConfig::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Registry the scrape endpoint renders.
    pub registry: MetricsRegistry,
    /// The configuration the server was started with.
    pub config: AppConfig,

    local_addr: SocketAddr,
    shutdown: ShutdownSignal,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Validate the config, register request metrics, bind the listener and
    /// start serving.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;

        let registry = MetricsRegistry::new();
        let request_metrics = RequestMetrics::with_config(config.metrics.to_config(), &registry)?;

        let router = create_api_router(
            request_metrics,
            registry.clone(),
            &config.metrics.endpoint,
        );

        let addr = config.server.address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server listening on http://{}", local_addr);
        info!(
            "Metrics available at http://{}{}",
            local_addr, config.metrics.endpoint
        );

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    api_shutdown.wait().await;
                    info!("HTTP server received shutdown signal");
                })
                .await;
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
            }
        });

        Ok(Self {
            registry,
            config,
            local_addr,
            shutdown,
            api_task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for the server task to finish, giving in-flight requests up
    /// to `server.shutdown_timeout` seconds once shutdown is triggered.
    pub async fn wait(self) {
        let timeout = Duration::from_secs(self.config.server.shutdown_timeout);
        let mut api_task = self.api_task;

        tokio::select! {
            result = &mut api_task => {
                if let Err(e) = result {
                    error!("HTTP server task panicked: {}", e);
                }
            }
            _ = async {
                self.shutdown.wait().await;
                tokio::time::sleep(timeout).await;
            } => {
                warn!("Graceful shutdown timed out after {}s", timeout.as_secs());
                api_task.abort();
            }
        }

        info!("Server shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
