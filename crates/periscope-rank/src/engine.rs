use std::sync::{Arc, Mutex, MutexGuard};

use candle_core::Device;
use periscope_core::types::SearchResult;

use crate::config::RankingConfig;
use crate::encoder::QueryEncoder;
use crate::error::{RankError, Result};
use crate::model::SlotClassifier;
use crate::registry::IdentityRegistry;

/// Re-orders result lists by a classifier trained from user selections.
pub struct RankingEngine {
    encoder: QueryEncoder,
    registry: IdentityRegistry,
    model: SlotClassifier,
}

impl RankingEngine {
    pub fn new(config: &RankingConfig) -> Result<Self> {
        Self::with_device(config, crate::device::select_device())
    }

    pub fn with_device(config: &RankingConfig, device: Device) -> Result<Self> {
        let model = SlotClassifier::new(config, device)?;
        Ok(Self { encoder: QueryEncoder::from_config(config), registry: IdentityRegistry::new(config.capacity), model })
    }

    pub fn registry(&self) -> &IdentityRegistry { &self.registry }

    pub fn encoder(&self) -> &QueryEncoder { &self.encoder }

    /// Register every identifier so it becomes trainable. Identities past the
    /// model capacity stay unknown and rank last.
    pub fn observe(&mut self, results: &[SearchResult]) {
        for result in results {
            if let Err(err) = self.registry.slot_of(result.id()) {
                tracing::warn!(%err, "identity not registered");
            }
        }
    }

    /// Stable sort by descending model score. Unknown identities go last.
    pub fn rank(&self, query: &str, mut results: Vec<SearchResult>) -> Result<Vec<SearchResult>> {
        if results.len() < 2 || self.registry.is_empty() {
            return Ok(results);
        }
        let scores = self.model.predict(&self.encoder.encode(query))?;
        let score_of = |result: &SearchResult| {
            self.registry.get(result.id()).and_then(|slot| scores.get(slot).copied()).unwrap_or(f32::NEG_INFINITY)
        };
        results.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));
        Ok(results)
    }

    /// One gradient step pulling `query` towards `chosen`'s slot.
    pub fn train(&mut self, query: &str, chosen: &SearchResult) -> Result<()> {
        let slot = self.registry.get(chosen.id()).ok_or_else(|| RankError::UnknownIdentity(chosen.id().to_string()))?;
        let loss = self.model.fit(&self.encoder.encode(query), slot)?;
        tracing::debug!(query, id = chosen.id(), slot, loss, "ranking model trained");
        Ok(())
    }
}

/// Cloneable handle serializing every engine call through one lock.
#[derive(Clone)]
pub struct SharedRanker {
    inner: Arc<Mutex<RankingEngine>>,
}

impl SharedRanker {
    pub fn new(engine: RankingEngine) -> Self {
        Self { inner: Arc::new(Mutex::new(engine)) }
    }

    pub fn observe(&self, results: &[SearchResult]) -> Result<()> {
        self.lock()?.observe(results);
        Ok(())
    }

    pub fn rank(&self, query: &str, results: Vec<SearchResult>) -> Result<Vec<SearchResult>> {
        self.lock()?.rank(query, results)
    }

    /// `observe` then `rank` under a single lock acquisition.
    pub fn observe_and_rank(&self, query: &str, results: Vec<SearchResult>) -> Result<Vec<SearchResult>> {
        let mut engine = self.lock()?;
        engine.observe(&results);
        engine.rank(query, results)
    }

    pub fn train(&self, query: &str, chosen: &SearchResult) -> Result<()> {
        self.lock()?.train(query, chosen)
    }

    pub fn known_ids(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.registry().all_known_ids().to_vec())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RankingEngine>> {
        self.inner.lock().map_err(|_| RankError::Poisoned)
    }
}
