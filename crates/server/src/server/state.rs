//! Shared application state injected into every Axum handler.

use std::sync::Arc;
use std::time::Instant;

use sealer::{Exports, KeyMaterial, ReadinessObserver};
use tracing::info;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or `Copy`) so that Axum can
/// clone the state for each request without copying key material.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide key. Read-only; each request builds its own cipher.
    pub key: Arc<KeyMaterial>,
    /// Named operations exposed through `/api/invoke/:name`.
    pub exports: Arc<Exports>,
    /// Deployment label reported by `/health`.
    pub environment: Arc<String>,
    /// When the state was built, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Build the state around `key`, exporting the core operations and
    /// logging readiness through [`LogReadiness`].
    pub fn new(key: KeyMaterial, environment: String) -> Self {
        let key = Arc::new(key);
        let exports = Exports::with_core(Arc::clone(&key)).with_observer(LogReadiness);
        Self {
            key,
            exports: Arc::new(exports),
            environment: Arc::new(environment),
            started_at: Instant::now(),
        }
    }
}

/// [`ReadinessObserver`] that records the announcement in the service log.
#[derive(Debug, Clone, Copy)]
pub struct LogReadiness;

impl ReadinessObserver for LogReadiness {
    fn on_ready(&self, functions: &[String]) {
        info!(functions = ?functions, "sealer exports announced");
    }
}

#[cfg(test)]
impl AppState {
    /// State with a fixed all-`0x42` key, for handler tests.
    pub fn for_tests() -> Self {
        let key = KeyMaterial::from_slice(&[0x42u8; sealer::KEY_LEN])
            .expect("fixed test key has the right length");
        Self::new(key, "test".into())
    }
}
