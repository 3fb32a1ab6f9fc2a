//! Configuration module
//!
//! The server reads a TOML file (default
//! `~/.config/route-metrics/config.toml`, overridable with
//! `ROUTE_METRICS_CONFIG` or `--config`). Every section and key is
//! optional.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [metrics]
//! namespace = "shop"
//! subsystem = "http"
//! normalize_http_status = false
//! skip_paths = ["/healthz", "/metrics"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::interfaces::http::router::HEALTH_ROUTE;
use crate::metrics::{MetricsConfig, DEFAULT_BUCKETS};
use crate::shared::errors::ConfigError;

pub const CONFIG_ENV: &str = "ROUTE_METRICS_CONFIG";

/// Default config location: `<user config dir>/route-metrics/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("route-metrics")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsSettings,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests after a shutdown signal.
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// File form of [`MetricsConfig`]. Label functions can't come from a file,
/// so the skipper is described by `skip_paths`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub namespace: String,
    pub subsystem: String,
    pub buckets: Vec<f64>,
    pub normalize_http_status: bool,
    /// Route patterns or raw paths that are never recorded.
    pub skip_paths: Vec<String>,
    /// Path of the scrape endpoint.
    pub endpoint: String,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        let defaults = MetricsConfig::default();
        Self {
            namespace: defaults.namespace,
            subsystem: defaults.subsystem,
            buckets: DEFAULT_BUCKETS.to_vec(),
            normalize_http_status: defaults.normalize_http_status,
            skip_paths: Vec::new(),
            endpoint: "/metrics".to_string(),
        }
    }
}

impl MetricsSettings {
    /// Build the middleware configuration. Requests whose route pattern or
    /// raw path is listed in `skip_paths` are skipped.
    pub fn to_config(&self) -> MetricsConfig {
        let config = MetricsConfig::default()
            .with_namespace(self.namespace.clone())
            .with_subsystem(self.subsystem.clone())
            .with_buckets(self.buckets.clone())
            .with_normalize_http_status(self.normalize_http_status);

        if self.skip_paths.is_empty() {
            return config;
        }

        let skip_paths = self.skip_paths.clone();
        config.with_skipper(move |info, _| {
            skip_paths
                .iter()
                .any(|p| p == info.route() || p == info.path())
        })
    }

    /// The scrape endpoint is mounted as a plain path next to the built-in
    /// routes, so it may not carry route parameters or shadow them.
    fn validate_endpoint(&self) -> Result<(), ConfigError> {
        let endpoint = &self.endpoint;
        if !endpoint.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "metrics.endpoint must start with '/', got {:?}",
                endpoint
            )));
        }

        if endpoint.chars().any(|c| matches!(c, '{' | '}' | '*')) {
            return Err(ConfigError::Invalid(format!(
                "metrics.endpoint must be a plain path without '{{', '}}' or '*', got {:?}",
                endpoint
            )));
        }

        if endpoint == HEALTH_ROUTE || endpoint.starts_with("/users/") {
            return Err(ConfigError::Invalid(format!(
                "metrics.endpoint {:?} conflicts with a built-in route",
                endpoint
            )));
        }

        Ok(())
    }
}

impl AppConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let buckets = &self.metrics.buckets;
        if buckets.iter().any(|b| b.is_nan()) || !buckets.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::Invalid(format!(
                "metrics.buckets must be strictly increasing, got {:?}",
                buckets
            )));
        }

        self.metrics.validate_endpoint()?;

        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode, Uri};

    use crate::metrics::RequestInfo;

    fn info(path: &'static str, matched: Option<&str>) -> RequestInfo {
        RequestInfo {
            method: Method::GET,
            uri: Uri::from_static(path),
            matched_path: matched.map(str::to_string),
            route_not_found: matched.is_none(),
        }
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.metrics.namespace, "echo");
        assert_eq!(config.metrics.subsystem, "http");
        assert_eq!(config.metrics.buckets, DEFAULT_BUCKETS.to_vec());
        assert!(config.metrics.normalize_http_status);
        assert_eq!(config.metrics.endpoint, "/metrics");
    }

    #[test]
    fn parses_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 9100

            [logging]
            format = "json"

            [metrics]
            namespace = "shop"
            buckets = [0.01, 0.1, 1.0]
            normalize_http_status = false
            skip_paths = ["/healthz"]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.metrics.namespace, "shop");
        assert_eq!(config.metrics.subsystem, "http");

        let metrics = config.metrics.to_config();
        assert_eq!(metrics.buckets, vec![0.01, 0.1, 1.0]);
        assert!(!metrics.normalize_http_status);
    }

    #[test]
    fn rejects_unsorted_buckets() {
        let err = AppConfig::from_toml_str("[metrics]\nbuckets = [1.0, 0.5]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = AppConfig::from_toml_str("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_conflicting_endpoint() {
        for endpoint in ["/healthz", "/users/{id}", "/users/me", "/{", "/files/*rest", "metrics"] {
            let mut config = AppConfig::default();
            config.metrics.endpoint = endpoint.to_string();
            match config.validate() {
                Err(ConfigError::Invalid(_)) => {}
                other => panic!("{:?} accepted: {:?}", endpoint, other),
            }
        }

        let mut config = AppConfig::default();
        config.metrics.endpoint = "/internal/metrics".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_toml() {
        let err = AppConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn skip_paths_match_route_or_path() {
        let settings = MetricsSettings {
            skip_paths: vec!["/healthz".to_string(), "/users/{id}".to_string()],
            ..MetricsSettings::default()
        };
        let config = settings.to_config();
        let skip = |i: &RequestInfo| (config.skipper)(i, StatusCode::OK);

        assert!(skip(&info("/healthz", Some("/healthz"))));
        assert!(skip(&info("/users/9", Some("/users/{id}"))));
        assert!(skip(&info("/healthz", None)));
        assert!(!skip(&info("/orders", Some("/orders"))));
    }

    #[test]
    fn no_skip_paths_never_skips() {
        let config = MetricsSettings::default().to_config();
        assert!(!(config.skipper)(&info("/healthz", Some("/healthz")), StatusCode::OK));
    }
}
