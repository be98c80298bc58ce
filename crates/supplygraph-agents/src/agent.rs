//! Agent trait, strategy kinds and the shared query pipeline.

use crate::classifier::{Classification, QueryClassifier};
use crate::context::SessionContext;
use crate::goal_based::GoalBasedAgent;
use crate::model_based::ModelBasedAgent;
use crate::reasoning::{QueryResult, Reasoning};
use crate::simple_reflex::SimpleReflexAgent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use supplygraph_core::store::OntologyStore;
use supplygraph_runtime::analytics::AnalyticsEngine;
use tracing::debug;

/// Which reasoning strategy answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    SimpleReflex,
    ModelBased,
    GoalBased,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::SimpleReflex, AgentKind::ModelBased, AgentKind::GoalBased];

    /// Accepts snake_case or hyphenated names, plus `model_based_reflex`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "simple_reflex" | "simple" | "reflex" => Some(AgentKind::SimpleReflex),
            "model_based" | "model_based_reflex" | "model" => Some(AgentKind::ModelBased),
            "goal_based" | "goal" => Some(AgentKind::GoalBased),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::SimpleReflex => "simple_reflex",
            AgentKind::ModelBased => "model_based",
            AgentKind::GoalBased => "goal_based",
        }
    }

    /// Instantiate the strategy.
    pub fn create(&self) -> Box<dyn Agent> {
        match self {
            AgentKind::SimpleReflex => Box::new(SimpleReflexAgent),
            AgentKind::ModelBased => Box::new(ModelBasedAgent),
            AgentKind::GoalBased => Box::new(GoalBasedAgent::default()),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a strategy may consult to answer one query.
pub struct AgentRequest<'a> {
    pub query: &'a str,
    pub classification: &'a Classification,
    pub store: &'a dyn OntologyStore,
    pub analytics: &'a AnalyticsEngine<'a>,
}

/// A reasoning strategy.
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Whether the strategy reads and updates a session context.
    fn uses_session(&self) -> bool {
        false
    }

    /// Answer a classified query. Never fails: unanswerable queries yield a
    /// low-confidence result.
    fn reason(&self, request: &AgentRequest<'_>, session: Option<&mut SessionContext>) -> Reasoning;
}

/// Classify, reason and time one query.
pub fn run_query(
    agent: &dyn Agent,
    classifier: &QueryClassifier,
    query: &str,
    analytics: &AnalyticsEngine<'_>,
    session: Option<&mut SessionContext>,
) -> QueryResult {
    let started = Instant::now();
    let store = analytics.store();
    let classification = classifier.classify(query, store);
    let request = AgentRequest {
        query,
        classification: &classification,
        store,
        analytics,
    };
    let reasoning = agent.reason(&request, session);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    debug!(
        agent = %agent.kind(),
        intent = %classification.intent,
        confidence = reasoning.overall_confidence,
        steps = reasoning.trace.len(),
        "query answered"
    );

    QueryResult {
        query: query.to_string(),
        agent: agent.kind(),
        intent: classification.intent,
        answer: reasoning.answer,
        trace: reasoning.trace.into_steps(),
        overall_confidence: reasoning.overall_confidence,
        elapsed_ms,
        mentions: classification.mentions,
        warnings: reasoning.warnings,
        data: reasoning.data,
    }
}
