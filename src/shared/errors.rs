use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Metric registration failed: {0}")]
    Registration(#[from] prometheus::Error),

    #[error("Invalid histogram buckets {0:?}: bounds must be strictly increasing")]
    InvalidBuckets(Vec<f64>),

    #[error("Metric encoding failed: {0}")]
    Encode(String),
}

impl MetricsError {
    /// Whether registration failed because a collector with the same
    /// fully-qualified name is already in the registry.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, MetricsError::Registration(prometheus::Error::AlreadyReg))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
