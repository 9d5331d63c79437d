//! periscope-rank
//!
//! Online re-ranking of source results: query text is one-hot encoded per
//! character position, a small candle classifier scores every known result
//! identity, and each explicit selection is one SGD step.

pub mod config;
pub mod device;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod model;
pub mod registry;

pub use config::{Activation, RankingConfig};
pub use encoder::{FeatureVector, QueryEncoder};
pub use engine::{RankingEngine, SharedRanker};
pub use error::RankError;
pub use registry::IdentityRegistry;
