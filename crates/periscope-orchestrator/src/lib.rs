//! periscope-orchestrator
//!
//! Drives query turns across sync and async sources and merges ranked sections
//! into a [`periscope_core::traits::ResultSink`].

pub mod config;
pub mod orchestrator;
pub mod sink;

pub use config::OrchestratorConfig;
pub use orchestrator::{Orchestrator, TurnPhase};
pub use sink::{MemorySink, SinkEvent};
