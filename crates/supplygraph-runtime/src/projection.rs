//! Network projection: nodes and weighted edges for graph renderers.

use crate::analytics::{AnalyticsEngine, ShipmentFlow};
use serde::{Deserialize, Serialize};
use supplygraph_core::attrs;
use supplygraph_core::store::OntologyStore;
use supplygraph_core::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedNode {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub label: String,
    pub size_hint: f64,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedEdge {
    pub source: EntityId,
    pub target: EntityId,
    pub kind: RelationKind,
    pub weight_hint: f64,
}

/// Read-only view of the whole graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkProjection {
    pub nodes: Vec<ProjectedNode>,
    pub edges: Vec<ProjectedEdge>,
    /// Shipment volume per origin → destination lane.
    pub flows: Vec<ShipmentFlow>,
}

impl NetworkProjection {
    pub fn node(&self, id: &EntityId) -> Option<&ProjectedNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

/// Project every entity and relationship, in insertion order.
pub fn to_network_projection(store: &dyn OntologyStore) -> NetworkProjection {
    let nodes = store
        .entities()
        .into_iter()
        .map(|e| ProjectedNode {
            id: e.id.clone(),
            entity_type: e.entity_type,
            label: e.display_name().to_string(),
            size_hint: size_hint(e),
            attributes: e.attributes.clone(),
        })
        .collect();

    let edges = store
        .relationships()
        .into_iter()
        .map(|r| ProjectedEdge {
            source: r.source.clone(),
            target: r.target.clone(),
            kind: r.kind,
            weight_hint: r
                .number(attrs::QUANTITY)
                .or_else(|| r.number(attrs::FLOW))
                .unwrap_or(1.0),
        })
        .collect();

    NetworkProjection {
        nodes,
        edges,
        flows: AnalyticsEngine::new(store).shipment_flows(),
    }
}

fn size_hint(entity: &Entity) -> f64 {
    entity
        .number(attrs::CAPACITY)
        .or_else(|| entity.number(attrs::QUANTITY_AVAILABLE))
        .unwrap_or(1.0)
}
