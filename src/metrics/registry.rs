//! Explicit Prometheus registry owned by the application.

use prometheus::core::Collector;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Registry, TextEncoder};

use crate::shared::errors::MetricsError;

/// Holds every collector the application registers and renders them for
/// scraping. Cloning shares the underlying registry.
#[derive(Clone)]
pub struct MetricsRegistry {
    inner: Registry,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            inner: Registry::new(),
        }
    }

    /// Register a collector. Fails with `AlreadyReg` when a collector with
    /// the same descriptors is already present.
    pub fn register<C>(&self, collector: C) -> Result<(), MetricsError>
    where
        C: Collector + 'static,
    {
        self.inner.register(Box::new(collector))?;
        Ok(())
    }

    pub fn unregister<C>(&self, collector: C) -> Result<(), MetricsError>
    where
        C: Collector + 'static,
    {
        self.inner.unregister(Box::new(collector))?;
        Ok(())
    }

    /// Snapshot of all non-empty metric families.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.inner.gather()
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder
            .encode(&self.gather(), &mut buf)
            .map_err(|e| MetricsError::Encode(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| MetricsError::Encode(e.to_string()))
    }

    /// `Content-Type` of [`render`](Self::render) output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    pub fn inner(&self) -> &Registry {
        &self.inner
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
