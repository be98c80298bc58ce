//! The query engine host: snapshot, classifier and session registry.
//!
//! Reads run concurrently against whatever snapshot was current when they
//! started. The only shared mutable state is the per-session context, held
//! behind its own lock for the whole read-compute-append of a model-based
//! query. The registry lock is never held while a session lock is taken.

use crate::config::EngineConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use supplygraph_agents::agent::{run_query, AgentKind};
use supplygraph_agents::classifier::QueryClassifier;
use supplygraph_agents::context::SessionContext;
use supplygraph_agents::reasoning::QueryResult;
use supplygraph_core::attrs;
use supplygraph_core::error::{OntologyError, Result};
use supplygraph_core::store::OntologyStore;
use supplygraph_core::types::*;
use supplygraph_runtime::analytics::{AnalyticsEngine, PerformanceAnalytics};
use supplygraph_runtime::export::{load_dataset, OntologyExport};
use supplygraph_runtime::graph_impl::OntologyGraph;
use supplygraph_runtime::projection::{to_network_projection, NetworkProjection};
use supplygraph_runtime::snapshot::{Snapshot, SnapshotHandle};
use tracing::info;
use uuid::Uuid;

/// Identifier of a query session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of an inventory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLine {
    pub inventory_id: EntityId,
    pub product_id: Option<EntityId>,
    pub quantity_available: f64,
    pub quantity_reserved: f64,
}

type SessionMap = HashMap<SessionId, Arc<Mutex<SessionContext>>>;

/// Host for queries, analytics and export over the active snapshot.
pub struct SupplyChainEngine {
    config: EngineConfig,
    snapshots: SnapshotHandle,
    classifier: QueryClassifier,
    sessions: Mutex<SessionMap>,
}

impl SupplyChainEngine {
    pub fn new(graph: OntologyGraph, config: EngineConfig) -> Self {
        Self {
            config,
            snapshots: SnapshotHandle::new(graph),
            classifier: QueryClassifier::new(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Load and validate a dataset file, then serve it.
    pub fn from_dataset(path: &Path, config: EngineConfig) -> Result<Self> {
        Ok(Self::new(load_dataset(path)?, config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The active snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshots.current()
    }

    /// Swap in a freshly built graph. Queries already running keep the
    /// snapshot they started with. Returns the new snapshot's id.
    pub fn regenerate(&self, graph: OntologyGraph) -> Uuid {
        let (id, _previous) = self.snapshots.replace(graph);
        id
    }

    /// Answer a query with the given strategy. Never fails.
    ///
    /// An unseen session id opens that session.
    pub fn process_query(&self, text: &str, agent: AgentKind, session: Option<SessionId>) -> QueryResult {
        let snapshot = self.snapshots.current();
        let analytics = AnalyticsEngine::with_settings(snapshot.graph(), self.config.analytics);
        let agent = agent.create();

        match session.filter(|_| agent.uses_session()) {
            Some(id) => {
                let context = self.session(id);
                let mut guard = context.lock();
                run_query(agent.as_ref(), &self.classifier, text, &analytics, Some(&mut *guard))
            }
            None => run_query(agent.as_ref(), &self.classifier, text, &analytics, None),
        }
    }

    /// Answer with the configured default strategy.
    pub fn ask(&self, text: &str, session: Option<SessionId>) -> QueryResult {
        self.process_query(text, self.config.default_agent, session)
    }

    /// Inventory held at a location. `NotFound` if the id is unknown or not
    /// a Location.
    pub fn inventory(&self, location_id: &EntityId) -> Result<Vec<InventoryLine>> {
        let snapshot = self.snapshots.current();
        let graph = snapshot.graph();
        if !graph.get_entity(location_id)?.is(EntityType::Location) {
            return Err(OntologyError::not_found(location_id.as_str()));
        }
        Ok(graph
            .inventory_at(location_id)?
            .into_iter()
            .map(|inv| InventoryLine {
                inventory_id: inv.id.clone(),
                product_id: inv.reference(attrs::PRODUCT_ID),
                quantity_available: inv.number(attrs::QUANTITY_AVAILABLE).unwrap_or(0.0),
                quantity_reserved: inv.number(attrs::QUANTITY_RESERVED).unwrap_or(0.0),
            })
            .collect())
    }

    pub fn network_projection(&self) -> NetworkProjection {
        to_network_projection(self.snapshots.current().graph())
    }

    pub fn performance_analytics(&self) -> PerformanceAnalytics {
        let snapshot = self.snapshots.current();
        AnalyticsEngine::with_settings(snapshot.graph(), self.config.analytics).performance_report()
    }

    pub fn export_ontology(&self) -> OntologyExport {
        self.snapshots.current().export()
    }

    /// Entities reachable along `kind` within the configured depth.
    pub fn related(&self, start: &EntityId, kind: RelationKind) -> Result<Vec<Entity>> {
        let snapshot = self.snapshots.current();
        Ok(snapshot
            .graph()
            .traverse(start, kind, self.config.traversal_depth)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Shortest connection between two entities within the configured depth.
    pub fn find_path(&self, from: &EntityId, to: &EntityId) -> Result<Vec<EntityId>> {
        self.snapshots
            .current()
            .graph()
            .find_path(from, to, self.config.traversal_depth)
    }

    pub fn open_session(&self) -> SessionId {
        let id = SessionId::new();
        self.session(id);
        id
    }

    /// Drop a session's context. Returns whether it existed.
    pub fn end_session(&self, id: SessionId) -> bool {
        let removed = self.sessions.lock().remove(&id).is_some();
        if removed {
            info!(session = %id, "session ended");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Copy of a session's context, if it exists.
    pub fn session_context(&self, id: SessionId) -> Option<SessionContext> {
        let context = self.sessions.lock().get(&id).cloned()?;
        let copy = context.lock().clone();
        Some(copy)
    }

    fn session(&self, id: SessionId) -> Arc<Mutex<SessionContext>> {
        let mut sessions = self.sessions.lock();
        let window = self.config.context_window;
        Arc::clone(sessions.entry(id).or_insert_with(|| {
            info!(session = %id, window, "session opened");
            Arc::new(Mutex::new(SessionContext::new(window)))
        }))
    }
}
