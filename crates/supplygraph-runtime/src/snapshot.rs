//! Immutable graph snapshots and the atomically swappable current handle.
//!
//! A snapshot is never mutated after construction. Regeneration builds a new
//! graph off to the side and swaps the `Arc`; readers that already cloned
//! the old `Arc` keep it until they drop it.

use crate::export::{export_full, OntologyExport};
use crate::graph_impl::OntologyGraph;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use supplygraph_core::store::OntologyStore;
use tracing::info;
use uuid::Uuid;

#[derive(Debug)]
pub struct Snapshot {
    id: Uuid,
    generated_at: DateTime<Utc>,
    graph: OntologyGraph,
}

impl Snapshot {
    pub fn new(graph: OntologyGraph) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            graph,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn graph(&self) -> &OntologyGraph {
        &self.graph
    }

    pub fn export(&self) -> OntologyExport {
        export_full(&self.graph, self.id, self.generated_at)
    }
}

/// Holder of the active snapshot.
#[derive(Debug)]
pub struct SnapshotHandle {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotHandle {
    pub fn new(graph: OntologyGraph) -> Self {
        let snapshot = Snapshot::new(graph);
        info!(
            snapshot = %snapshot.id,
            entities = snapshot.graph.entity_count(),
            relationships = snapshot.graph.relationship_count(),
            "snapshot loaded"
        );
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The active snapshot. Holding the returned `Arc` pins it.
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    /// Swap in a freshly built graph. Returns the installed snapshot's id
    /// and the snapshot it replaced.
    pub fn replace(&self, graph: OntologyGraph) -> (Uuid, Arc<Snapshot>) {
        let next = Arc::new(Snapshot::new(graph));
        let id = next.id;
        info!(
            snapshot = %id,
            entities = next.graph.entity_count(),
            "snapshot swapped"
        );
        (id, std::mem::replace(&mut *self.current.write(), next))
    }
}
