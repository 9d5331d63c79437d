use serde::{Deserialize, Serialize};

/// `[orchestrator]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Run the top result of typed queries without waiting for a pick.
    /// Voice input always auto-executes.
    pub auto_execute_first: bool,
    /// Text of the entry shown in place of a source whose search failed.
    pub failure_text: String,
    /// Section shown when a selected or auto-executed action fails.
    pub command_failure_title: String,
    pub command_failure_text: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            auto_execute_first: false,
            failure_text: "Search failed.".to_string(),
            command_failure_title: "Command result".to_string(),
            command_failure_text: "Voice command failed.".to_string(),
        }
    }
}
