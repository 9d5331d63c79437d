use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};

/// Hidden layer non-linearity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Tanh,
    Relu,
}

/// `[ranking]` section.
///
/// `capacity` fixes the classifier's output width for the lifetime of an engine;
/// it is also the most identities the registry will ever accept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    pub positions: usize,
    pub alphabet: usize,
    pub capacity: usize,
    pub hidden_layers: Vec<usize>,
    pub activation: Activation,
    pub learning_rate: f64,
    pub l2: f64,
    pub seed: u64,
    pub strip_accents: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            positions: 20,
            alphabet: 128,
            capacity: 1000,
            hidden_layers: vec![200, 100],
            activation: Activation::Tanh,
            learning_rate: 0.02,
            l2: 1e-5,
            seed: 0x5eed,
            strip_accents: true,
        }
    }
}

impl RankingConfig {
    pub fn feature_width(&self) -> usize { self.positions * self.alphabet }

    pub fn validate(&self) -> Result<()> {
        if self.positions == 0 || self.alphabet == 0 {
            return Err(RankError::InvalidConfig("positions and alphabet must be non-zero".into()));
        }
        if self.capacity == 0 {
            return Err(RankError::InvalidConfig("capacity must be non-zero".into()));
        }
        if self.hidden_layers.iter().any(|&w| w == 0) {
            return Err(RankError::InvalidConfig("hidden layer widths must be non-zero".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(RankError::InvalidConfig(format!("learning_rate must be positive, got {}", self.learning_rate)));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(RankError::InvalidConfig(format!("l2 must be non-negative, got {}", self.l2)));
        }
        Ok(())
    }
}
