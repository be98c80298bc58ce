//! # Supplygraph Agents
//!
//! Query classification and rule-based reasoning strategies.
//!
//! A query is classified into an [`Intent`](classifier::Intent) by an ordered
//! rule table, then answered by one of three strategies:
//!
//! - **SimpleReflex** - one rule, one step, fixed confidence
//! - **ModelBased** - the same rule, weighed against the session's history
//! - **GoalBased** - candidate actions scored against an objective
//!
//! Every answer carries a numbered reasoning trace and a confidence in [0, 1].

pub mod classifier;
pub mod reasoning;
pub mod rules;
pub mod context;
pub mod agent;
pub mod simple_reflex;
pub mod model_based;
pub mod goal_based;
pub mod prelude;
