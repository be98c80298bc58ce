//! Engine configuration.

use serde::{Deserialize, Serialize};
use supplygraph_agents::agent::AgentKind;
use supplygraph_agents::context::DEFAULT_CONTEXT_WINDOW;
use supplygraph_runtime::analytics::AnalyticsSettings;

/// Settings for a [`SupplyChainEngine`](crate::engine::SupplyChainEngine).
///
/// Serialized as the `[engine]` table of a config file. Analytics
/// thresholds live in their own table and are attached with
/// [`with_analytics`](Self::with_analytics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Queries kept per session for the model-based agent.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Strategy used when a caller does not pick one.
    #[serde(default = "default_agent")]
    pub default_agent: AgentKind,
    /// Hop limit for traversals and path searches.
    #[serde(default = "default_traversal_depth")]
    pub traversal_depth: usize,
    #[serde(skip)]
    pub analytics: AnalyticsSettings,
}

fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

fn default_agent() -> AgentKind {
    AgentKind::SimpleReflex
}

fn default_traversal_depth() -> usize {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            default_agent: default_agent(),
            traversal_depth: default_traversal_depth(),
            analytics: AnalyticsSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_analytics(mut self, analytics: AnalyticsSettings) -> Self {
        self.analytics = analytics;
        self
    }
}
