//! Timer-driven light/medium ticks on a cooperative tokio scheduler
//! (spec §4.9, §5 "no timer may overlap its own prior invocation").

use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};

use cortex_core::traits::MemoryStore;
use cortex_core::CortexConfig;

use crate::activation_cache::ActivationCache;
use crate::tick::{light_tick, medium_tick};

/// Owns the two background tasks. Dropping it does not stop them; call
/// [`Worker::shutdown`] to abort both.
pub struct Worker {
    light: JoinHandle<()>,
    medium: JoinHandle<()>,
}

impl Worker {
    /// Spawn the light and medium ticks. `tick_lock` serializes the two
    /// cadences against each other so neither overlaps the other's
    /// transaction (spec §5 "may serialize light and medium ticks... using
    /// a simple mutex").
    pub fn spawn(
        store: Arc<dyn MemoryStore>,
        config: Arc<CortexConfig>,
        project: Option<String>,
    ) -> Self {
        let cache = Arc::new(ActivationCache::new());
        let tick_lock = Arc::new(AsyncMutex::new(()));

        let light = {
            let store = store.clone();
            let config = config.clone();
            let project = project.clone();
            let cache = cache.clone();
            let tick_lock = tick_lock.clone();
            tokio::spawn(async move {
                let start = Instant::now() + Duration::from_secs(config.light_tick_initial_delay_secs);
                let mut ticker = interval_at(start, Duration::from_secs(config.light_tick_interval_secs));
                loop {
                    ticker.tick().await;
                    let _guard = tick_lock.lock().await;
                    let now = chrono::Utc::now();
                    let store = store.clone();
                    let config = config.clone();
                    let cache = cache.clone();
                    let project = project.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        light_tick(store.as_ref(), cache.as_ref(), &config, now, project.as_deref())
                    })
                    .await;
                    match result {
                        Ok(Ok(report)) => {
                            tracing::debug!(pruned = report.cache_entries_pruned, "light tick completed");
                        }
                        Ok(Err(e)) => tracing::error!(error = %e, "light tick failed"),
                        Err(e) => tracing::error!(error = %e, "light tick panicked"),
                    }
                }
            })
        };

        let medium = {
            let store = store.clone();
            let config = config.clone();
            let project = project.clone();
            let tick_lock = tick_lock.clone();
            tokio::spawn(async move {
                let start = Instant::now() + Duration::from_secs(config.medium_tick_interval_secs);
                let mut ticker = interval_at(start, Duration::from_secs(config.medium_tick_interval_secs));
                loop {
                    ticker.tick().await;
                    let _guard = tick_lock.lock().await;
                    let store = store.clone();
                    let config = config.clone();
                    let project = project.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        medium_tick(store.as_ref(), &config, project.as_deref())
                    })
                    .await;
                    match result {
                        Ok(Ok(report)) => {
                            tracing::debug!(
                                links_created = report.links_created,
                                contradictions = report.contradictions_linked,
                                hub_bonus_applied = report.hub_bonus_applied,
                                "medium tick completed"
                            );
                        }
                        Ok(Err(e)) => tracing::error!(error = %e, "medium tick failed"),
                        Err(e) => tracing::error!(error = %e, "medium tick panicked"),
                    }
                }
            })
        };

        Self { light, medium }
    }

    pub fn shutdown(self) {
        self.light.abort();
        self.medium.abort();
    }
}
