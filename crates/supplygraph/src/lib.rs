//! # Supplygraph
//!
//! Supply-chain ontology graph with rule-based reasoning agents.
//!
//! The network (products, locations, suppliers, orders, shipments and the
//! rest) is held as a typed entity/relationship graph. Free-text questions
//! are classified into intents and answered by one of three strategies,
//! each returning a step-by-step trace and a confidence.
//!
//! ## Quick Start
//!
//! ```rust
//! use supplygraph::prelude::*;
//!
//! let mut graph = OntologyGraph::new();
//! graph.add_entity(Entity::new("L1", EntityType::Location).with_attr(attrs::CAPACITY, 100.0)).unwrap();
//! graph.add_entity(
//!     Entity::new("INV1", EntityType::Inventory)
//!         .with_attr(attrs::LOCATION_ID, "L1")
//!         .with_attr(attrs::QUANTITY_AVAILABLE, 60),
//! ).unwrap();
//!
//! let engine = SupplyChainEngine::new(graph, EngineConfig::default());
//! let result = engine.process_query("How many items are in L1", AgentKind::SimpleReflex, None);
//!
//! assert_eq!(result.intent, Intent::InventoryLookup);
//! assert!(result.answer.contains("60"));
//! ```
//!
//! ## Architecture
//!
//! - [`supplygraph_core`] - Entity and relationship types, the store trait, errors
//! - [`supplygraph_runtime`] - petgraph backend, analytics, projection, export, snapshots
//! - [`supplygraph_agents`] - Classifier, rule book, session context, strategies
//!
//! ## Strategies
//!
//! | Strategy | Trace | Confidence |
//! |----------|-------|------------|
//! | SimpleReflex | one rule step | fixed per rule |
//! | ModelBased | context step + rule step | rule ±0.1 by trend |
//! | GoalBased | one step per candidate + recommendation | winning score |

pub mod config;
pub mod engine;

// Re-export all subcrates
pub use supplygraph_core as core;
pub use supplygraph_runtime as runtime;
pub use supplygraph_agents as agents;

pub use config::EngineConfig;
pub use engine::{InventoryLine, SessionId, SupplyChainEngine};

/// Prelude module for convenient imports.
///
/// ```rust
/// use supplygraph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::{InventoryLine, SessionId, SupplyChainEngine};

    pub use supplygraph_agents::prelude::*;
}
