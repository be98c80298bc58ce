//! Supplygraph Agents Prelude - convenient imports for common usage.
//!
//! ```rust
//! use supplygraph_agents::prelude::*;
//! ```

// Re-export agent types
pub use crate::agent::{run_query, Agent, AgentKind, AgentRequest};
pub use crate::simple_reflex::SimpleReflexAgent;
pub use crate::model_based::ModelBasedAgent;
pub use crate::goal_based::{CandidateAction, GoalBasedAgent, Objective, ScoredAction};

// Re-export classification and reasoning
pub use crate::classifier::{Classification, Intent, Mention, QueryClassifier};
pub use crate::context::{SessionContext, Trend, DEFAULT_CONTEXT_WINDOW};
pub use crate::reasoning::{QueryResult, Reasoning, Trace, TraceStep};

// Re-export from runtime
pub use supplygraph_runtime::prelude::*;
