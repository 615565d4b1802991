//! Shared application state for the AuthZEN gateway.
//!
//! The policy store is injected, never global: `new` builds a fresh store,
//! `with_store` reuses one supplied by the caller (tests run several side by
//! side). Seed policies from config are appended in file order either way.

use std::sync::Arc;
use std::time::Instant;

use authzen_core::{Decision, DecisionEngine, PolicyStore};

use crate::config::GatewayConfig;
use crate::obs::PdpMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    engine: Arc<DecisionEngine>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    metrics: PdpMetrics,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self::with_store(cfg, Arc::new(PolicyStore::new()))
    }

    pub fn with_store(cfg: GatewayConfig, store: Arc<PolicyStore>) -> Self {
        for p in &cfg.policies {
            let record = p.to_record();
            tracing::info!(policy = %record, "seed policy loaded");
            store.push(record);
        }

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: PdpMetrics::default(),
            }),
            engine: Arc::new(DecisionEngine::new(store)),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn store(&self) -> &Arc<PolicyStore> {
        self.engine.store()
    }

    pub fn metrics(&self) -> &PdpMetrics {
        &self.inner.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    /// Gauges computed at scrape time.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("authzen_policies_stored", self.store().len() as u64)]
    }

    /// Count each decision and observe one evaluation latency for the request.
    pub fn record_decisions(
        &self,
        endpoint: &'static str,
        decisions: impl IntoIterator<Item = Decision>,
        started: Instant,
    ) {
        let m = self.metrics();
        for d in decisions {
            m.decisions.inc(&[("endpoint", endpoint), ("decision", d.as_str())]);
        }
        m.eval_duration
            .observe(&[("endpoint", endpoint)], started.elapsed());
    }
}
