//! periscope-cli
//!
//! Terminal front-end for the orchestrator: demo sources, a printing sink and
//! tracing setup shared by the `periscope` binary.

pub mod sources;
pub mod terminal;

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
