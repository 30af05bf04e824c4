//! Application state management
//!
//! Author: hephaex@gmail.com

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use jobboard_core::{AppConfig, DocumentStore};
use tokio::sync::RwLock;

use crate::auth::{JwtConfig, PasswordConfig, TokenService};

/// Latency histogram buckets
#[derive(Debug, Clone, Default)]
pub struct LatencyBuckets {
    pub under_10ms: u64,
    pub ms_10_50: u64,
    pub ms_50_100: u64,
    pub ms_100_500: u64,
    pub ms_500_1000: u64,
    pub over_1s: u64,
}

impl LatencyBuckets {
    fn observe(&mut self, latency_us: u64) {
        match latency_us / 1000 {
            0..=9 => self.under_10ms += 1,
            10..=49 => self.ms_10_50 += 1,
            50..=99 => self.ms_50_100 += 1,
            100..=499 => self.ms_100_500 += 1,
            500..=999 => self.ms_500_1000 += 1,
            _ => self.over_1s += 1,
        }
    }
}

/// Per-endpoint request statistics
#[derive(Debug, Clone, Default)]
pub struct EndpointMetrics {
    /// Response count per status code
    pub status_counts: HashMap<u16, u64>,
    pub total_latency_us: u64,
    pub latency_count: u64,
    pub min_latency_us: Option<u64>,
    pub max_latency_us: u64,
    pub buckets: LatencyBuckets,
}

impl EndpointMetrics {
    pub fn total_requests(&self) -> u64 {
        self.status_counts.values().sum()
    }

    pub fn avg_latency_us(&self) -> f64 {
        if self.latency_count == 0 {
            0.0
        } else {
            self.total_latency_us as f64 / self.latency_count as f64
        }
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Document store backend
    pub store: Arc<dyn DocumentStore>,
    /// Token signing and verification
    pub tokens: TokenService,
    /// Argon2 cost parameters for new hashes
    pub passwords: PasswordConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Ready status
    pub is_ready: AtomicBool,
    /// Per-endpoint metrics, keyed by normalized path
    pub metrics: RwLock<HashMap<String, EndpointMetrics>>,
}

impl AppState {
    /// Create new application state with config and an opened store
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let tokens = TokenService::new(JwtConfig::from(&config.auth));
        Self {
            config,
            store,
            tokens,
            passwords: PasswordConfig::default(),
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            is_ready: AtomicBool::new(true),
            metrics: RwLock::new(HashMap::new()),
        }
    }

    /// State backed by the in-memory store with cheap password hashing
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "test-secret-for-integration-tests".to_string();

        let mut state = Self::new(config, Arc::new(jobboard_store::MemoryStore::new()));
        state.passwords = PasswordConfig::fast();
        state
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if service is ready
    pub fn is_ready(&self) -> bool {
        self.is_ready.load(Ordering::SeqCst)
    }

    /// Set ready status
    pub fn set_ready(&self, ready: bool) {
        self.is_ready.store(ready, Ordering::SeqCst);
    }

    /// Record one finished request against its normalized endpoint
    pub async fn record_request(&self, endpoint: String, status: u16, latency_us: u64) {
        self.increment_requests();

        let mut metrics = self.metrics.write().await;
        let entry = metrics.entry(endpoint).or_default();

        *entry.status_counts.entry(status).or_insert(0) += 1;
        entry.total_latency_us = entry.total_latency_us.saturating_add(latency_us);
        entry.latency_count += 1;
        entry.min_latency_us = Some(entry.min_latency_us.map_or(latency_us, |m| m.min(latency_us)));
        entry.max_latency_us = entry.max_latency_us.max(latency_us);
        entry.buckets.observe(latency_us);
    }

    /// Snapshot of the per-endpoint metrics
    pub async fn metrics_snapshot(&self) -> HashMap<String, EndpointMetrics> {
        self.metrics.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_request_aggregates() {
        let state = AppState::for_testing();

        state.record_request("/api/v1/jobs".into(), 200, 5_000).await;
        state.record_request("/api/v1/jobs".into(), 200, 20_000).await;
        state.record_request("/api/v1/jobs".into(), 400, 2_000_000).await;

        let snapshot = state.metrics_snapshot().await;
        let jobs = &snapshot["/api/v1/jobs"];

        assert_eq!(jobs.total_requests(), 3);
        assert_eq!(jobs.status_counts[&200], 2);
        assert_eq!(jobs.status_counts[&400], 1);
        assert_eq!(jobs.min_latency_us, Some(5_000));
        assert_eq!(jobs.max_latency_us, 2_000_000);
        assert_eq!(jobs.buckets.under_10ms, 1);
        assert_eq!(jobs.buckets.ms_10_50, 1);
        assert_eq!(jobs.buckets.over_1s, 1);
        assert_eq!(state.get_request_count(), 3);
    }

    #[test]
    fn test_ready_flag() {
        let state = AppState::for_testing();
        assert!(state.is_ready());
        state.set_ready(false);
        assert!(!state.is_ready());
    }
}
