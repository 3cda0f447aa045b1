use crate::fragments::LoadResult;
use serde::Serialize;
use std::time::Duration;

/// Cumulative over the page session; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoadStatistics {
    pub components_loaded: u64,
    pub errors: u64,
    pub degraded: u64,
    pub pages_initialized: u64,
    pub average_load_ms: f64,
}

impl LoadStatistics {
    pub fn record(&mut self, results: &[LoadResult], elapsed: Duration) {
        let loaded = results.iter().filter(|r| r.success()).count() as u64;
        let degraded = results.iter().filter(|r| r.degraded()).count() as u64;
        self.components_loaded += loaded;
        self.errors += results.len() as u64 - loaded;
        self.degraded += degraded;
        self.pages_initialized += 1;

        let sample = elapsed.as_secs_f64() * 1000.0;
        self.average_load_ms += (sample - self.average_load_ms) / self.pages_initialized as f64;
    }
}
