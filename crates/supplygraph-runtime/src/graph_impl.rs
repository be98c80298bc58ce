//! Concrete implementation of the OntologyStore trait using petgraph.
//!
//! Entities live in a petgraph `DiGraph` arena; relationships are its edges.
//! Because nothing is ever removed, node and edge indices are dense and
//! stable, so the side indices below can be plain vectors keyed by index:
//!
//! - by-id: `EntityId` -> `NodeIndex`
//! - by-type: insertion-ordered node lists per `EntityType`
//! - adjacency: per node, outgoing and incoming edges in insertion order,
//!   both overall and keyed by `RelationKind`
//! - inventory-by-location: Inventory records keyed by their `locationId`

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};
use supplygraph_core::attrs;
use supplygraph_core::error::{OntologyError, Result};
use supplygraph_core::store::OntologyStore;
use supplygraph_core::types::*;

/// Edges on one side of a node.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    all: Vec<EdgeIndex>,
    by_kind: HashMap<RelationKind, Vec<EdgeIndex>>,
}

impl Adjacency {
    fn push(&mut self, kind: RelationKind, edge: EdgeIndex) {
        self.all.push(edge);
        self.by_kind.entry(kind).or_default().push(edge);
    }

    fn edges(&self, kind: Option<RelationKind>) -> &[EdgeIndex] {
        match kind {
            Some(k) => self.by_kind.get(&k).map(|v| v.as_slice()).unwrap_or(&[]),
            None => &self.all,
        }
    }
}

/// Petgraph-backed ontology graph.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    graph: DiGraph<Entity, Relationship>,
    /// Map from entity id to petgraph's internal index.
    by_id: HashMap<EntityId, NodeIndex>,
    by_type: HashMap<EntityType, Vec<NodeIndex>>,
    /// Indexed by `NodeIndex::index()`.
    outgoing: Vec<Adjacency>,
    incoming: Vec<Adjacency>,
    /// Inventory records keyed by their `locationId` attribute.
    inventory_by_location: HashMap<EntityId, Vec<NodeIndex>>,
}

impl OntologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities of one type.
    pub fn count_of(&self, entity_type: EntityType) -> usize {
        self.by_type.get(&entity_type).map_or(0, Vec::len)
    }

    fn index_of(&self, id: &EntityId) -> Result<NodeIndex> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| OntologyError::not_found(id.as_str()))
    }

    fn edge_list(&self, idx: NodeIndex, kind: Option<RelationKind>, direction: Direction) -> Vec<EdgeIndex> {
        let i = idx.index();
        match direction {
            Direction::Out => self.outgoing[i].edges(kind).to_vec(),
            Direction::In => self.incoming[i].edges(kind).to_vec(),
            Direction::Both => {
                let mut edges = self.outgoing[i].edges(kind).to_vec();
                // A self-loop appears on both sides; report it once.
                edges.extend(
                    self.incoming[i]
                        .edges(kind)
                        .iter()
                        .filter(|e| self.graph[**e].source != self.graph[**e].target),
                );
                edges
            }
        }
    }

    fn validate_entity(&self, entity: &Entity) -> Result<()> {
        if entity.id.as_str().trim().is_empty() {
            return Err(OntologyError::validation("", "id", "entity id must not be empty"));
        }
        if self.by_id.contains_key(&entity.id) {
            return Err(OntologyError::validation(
                entity.id.as_str(),
                "id",
                "duplicate entity id",
            ));
        }
        if entity.is(EntityType::Inventory) {
            validate_inventory(entity)?;
        }
        Ok(())
    }
}

/// Inventory quantities must be non-negative and reserved ≤ available.
fn validate_inventory(entity: &Entity) -> Result<()> {
    let id = entity.id.as_str();
    let read = |key: &str| -> Result<f64> {
        match entity.attr(key) {
            None => Ok(0.0),
            Some(value) => match value.as_f64() {
                Some(n) if n >= 0.0 => Ok(n),
                Some(n) => Err(OntologyError::validation(id, key, format!("negative quantity {}", n))),
                None => Err(OntologyError::validation(id, key, "quantity must be a number")),
            },
        }
    };
    let available = read(attrs::QUANTITY_AVAILABLE)?;
    let reserved = read(attrs::QUANTITY_RESERVED)?;
    if reserved > available {
        return Err(OntologyError::validation(
            id,
            attrs::QUANTITY_RESERVED,
            format!("reserved {} exceeds available {}", reserved, available),
        ));
    }
    Ok(())
}

impl OntologyStore for OntologyGraph {
    fn get_entity(&self, id: &EntityId) -> Result<&Entity> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    fn contains(&self, id: &EntityId) -> bool {
        self.by_id.contains_key(id)
    }

    fn list_entities(&self, entity_type: EntityType, filter: Option<&EntityFilter>) -> Vec<&Entity> {
        self.by_type
            .get(&entity_type)
            .map(|indices| {
                indices
                    .iter()
                    .map(|idx| &self.graph[*idx])
                    .filter(|e| filter.map_or(true, |f| f.matches(e)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn relationships_of(
        &self,
        id: &EntityId,
        kind: Option<RelationKind>,
        direction: Direction,
    ) -> Result<Vec<&Relationship>> {
        let idx = self.index_of(id)?;
        Ok(self
            .edge_list(idx, kind, direction)
            .into_iter()
            .map(|e| &self.graph[e])
            .collect())
    }

    fn add_entity(&mut self, entity: Entity) -> Result<()> {
        self.validate_entity(&entity)?;

        let id = entity.id.clone();
        let entity_type = entity.entity_type;
        let location = if entity_type == EntityType::Inventory {
            entity.reference(attrs::LOCATION_ID)
        } else {
            None
        };

        let idx = self.graph.add_node(entity);
        self.by_id.insert(id, idx);
        self.by_type.entry(entity_type).or_default().push(idx);
        self.outgoing.push(Adjacency::default());
        self.incoming.push(Adjacency::default());
        if let Some(location) = location {
            self.inventory_by_location.entry(location).or_default().push(idx);
        }
        Ok(())
    }

    fn add_relationship(&mut self, relationship: Relationship) -> Result<()> {
        let Some(&from) = self.by_id.get(&relationship.source) else {
            return Err(OntologyError::validation(
                relationship.source.as_str(),
                "sourceId",
                format!("dangling {} relationship: source does not exist", relationship.kind),
            ));
        };
        let Some(&to) = self.by_id.get(&relationship.target) else {
            return Err(OntologyError::validation(
                relationship.target.as_str(),
                "targetId",
                format!("dangling {} relationship: target does not exist", relationship.kind),
            ));
        };

        let kind = relationship.kind;
        let edge = self.graph.add_edge(from, to, relationship);
        self.outgoing[from.index()].push(kind, edge);
        self.incoming[to.index()].push(kind, edge);
        Ok(())
    }

    fn traverse(&self, start: &EntityId, kind: RelationKind, max_depth: usize) -> Result<Vec<&Entity>> {
        let start_idx = self.index_of(start)?;
        let mut visited: HashSet<NodeIndex> = HashSet::from([start_idx]);
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(start_idx, 0)]);
        let mut reached = Vec::new();

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for edge in self.outgoing[current.index()].edges(Some(kind)) {
                let Some((_, next)) = self.graph.edge_endpoints(*edge) else {
                    continue;
                };
                if visited.insert(next) {
                    reached.push(&self.graph[next]);
                    queue.push_back((next, depth + 1));
                }
            }
        }
        Ok(reached)
    }

    fn find_path(&self, from: &EntityId, to: &EntityId, max_depth: usize) -> Result<Vec<EntityId>> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        if from_idx == to_idx {
            return Ok(vec![from.clone()]);
        }

        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited: HashSet<NodeIndex> = HashSet::from([from_idx]);
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(from_idx, 0)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for edge in self.edge_list(current, None, Direction::Both) {
                let Some((a, b)) = self.graph.edge_endpoints(edge) else {
                    continue;
                };
                let next = if a == current { b } else { a };
                if !visited.insert(next) {
                    continue;
                }
                parent.insert(next, current);
                if next == to_idx {
                    let mut path = vec![self.graph[next].id.clone()];
                    let mut cursor = next;
                    while let Some(&prev) = parent.get(&cursor) {
                        path.push(self.graph[prev].id.clone());
                        cursor = prev;
                    }
                    path.reverse();
                    return Ok(path);
                }
                queue.push_back((next, depth + 1));
            }
        }
        Ok(Vec::new())
    }

    fn inventory_at(&self, location: &EntityId) -> Result<Vec<&Entity>> {
        let loc_idx = self.index_of(location)?;
        let mut found: Vec<NodeIndex> = self
            .inventory_by_location
            .get(location)
            .cloned()
            .unwrap_or_default();

        for edge in self.outgoing[loc_idx.index()].edges(Some(RelationKind::Stores)) {
            if let Some((_, target)) = self.graph.edge_endpoints(*edge) {
                if self.graph[target].is(EntityType::Inventory) {
                    found.push(target);
                }
            }
        }

        found.sort();
        found.dedup();
        Ok(found.into_iter().map(|idx| &self.graph[idx]).collect())
    }

    fn entities(&self) -> Vec<&Entity> {
        self.graph.node_indices().map(|idx| &self.graph[idx]).collect()
    }

    fn relationships(&self) -> Vec<&Relationship> {
        self.graph.edge_indices().map(|idx| &self.graph[idx]).collect()
    }

    fn entity_count(&self) -> usize {
        self.graph.node_count()
    }

    fn relationship_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: &str) -> Entity {
        Entity::new(id, EntityType::Location).with_attr(attrs::CAPACITY, 100.0)
    }

    fn employee(id: &str) -> Entity {
        Entity::new(id, EntityType::Employee)
    }

    #[test]
    fn add_and_retrieve_entities() {
        let mut graph = OntologyGraph::new();
        graph.add_entity(location("L1")).unwrap();

        assert_eq!(graph.entity_count(), 1);
        assert_eq!(graph.get_entity(&"L1".into()).unwrap().entity_type, EntityType::Location);
        assert!(graph.get_entity(&"L2".into()).unwrap_err().is_not_found());
    }

    #[test]
    fn duplicate_id_is_rejected_across_types() {
        let mut graph = OntologyGraph::new();
        graph.add_entity(location("X1")).unwrap();
        let err = graph.add_entity(employee("X1")).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(graph.entity_count(), 1);
        assert_eq!(graph.count_of(EntityType::Employee), 0);
    }

    #[test]
    fn dangling_relationship_leaves_graph_unchanged() {
        let mut graph = OntologyGraph::new();
        graph.add_entity(employee("E1")).unwrap();

        let err = graph
            .add_relationship(Relationship::new("E1", RelationKind::WorksAt, "L404"))
            .unwrap_err();
        match err {
            OntologyError::Validation { id, field, .. } => {
                assert_eq!(id, "L404");
                assert_eq!(field, "targetId");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(graph.relationship_count(), 0);
        assert!(graph
            .relationships_of(&"E1".into(), None, Direction::Both)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn inventory_reserved_cannot_exceed_available() {
        let mut graph = OntologyGraph::new();
        let inv = Entity::new("INV1", EntityType::Inventory)
            .with_attr(attrs::QUANTITY_AVAILABLE, 10)
            .with_attr(attrs::QUANTITY_RESERVED, 11);

        let err = graph.add_entity(inv).unwrap_err();
        assert_eq!(
            err,
            OntologyError::validation("INV1", attrs::QUANTITY_RESERVED, "reserved 11 exceeds available 10")
        );
        assert_eq!(graph.entity_count(), 0);
    }

    #[test]
    fn relationships_are_filtered_by_kind_and_direction() {
        let mut graph = OntologyGraph::new();
        graph.add_entity(employee("E1")).unwrap();
        graph.add_entity(location("L1")).unwrap();
        graph.add_relationship(Relationship::new("E1", RelationKind::WorksAt, "L1")).unwrap();
        graph.add_relationship(Relationship::new("E1", RelationKind::Manages, "L1")).unwrap();

        let out = graph.relationships_of(&"E1".into(), None, Direction::Out).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].kind, RelationKind::WorksAt);

        let managed = graph
            .relationships_of(&"L1".into(), Some(RelationKind::Manages), Direction::In)
            .unwrap();
        assert_eq!(managed.len(), 1);
        assert!(graph
            .relationships_of(&"L1".into(), None, Direction::Out)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn traverse_is_depth_limited_and_cycle_safe() {
        let mut graph = OntologyGraph::new();
        for id in ["E1", "E2", "E3", "E4"] {
            graph.add_entity(employee(id)).unwrap();
        }
        // E1 -> E2 -> E3 -> E1 cycle, E3 -> E4
        for (a, b) in [("E1", "E2"), ("E2", "E3"), ("E3", "E1"), ("E3", "E4")] {
            graph.add_relationship(Relationship::new(a, RelationKind::Manages, b)).unwrap();
        }

        let ids = |v: Vec<&Entity>| v.into_iter().map(|e| e.id.0.clone()).collect::<Vec<_>>();

        assert_eq!(ids(graph.traverse(&"E1".into(), RelationKind::Manages, 1).unwrap()), vec!["E2"]);
        assert_eq!(
            ids(graph.traverse(&"E1".into(), RelationKind::Manages, 10).unwrap()),
            vec!["E2", "E3", "E4"]
        );
        assert!(graph.traverse(&"E1".into(), RelationKind::Manages, 0).unwrap().is_empty());
        assert!(graph.traverse(&"E1".into(), RelationKind::Supplies, 5).unwrap().is_empty());
    }

    #[test]
    fn find_path_walks_edges_in_either_direction() {
        let mut graph = OntologyGraph::new();
        graph.add_entity(Entity::new("S1", EntityType::Supplier)).unwrap();
        graph.add_entity(Entity::new("P1", EntityType::Product)).unwrap();
        graph.add_entity(Entity::new("O1", EntityType::Order)).unwrap();
        graph.add_relationship(Relationship::new("S1", RelationKind::Supplies, "P1")).unwrap();
        graph.add_relationship(Relationship::new("O1", RelationKind::Contains, "P1")).unwrap();

        let path = graph.find_path(&"S1".into(), &"O1".into(), 3).unwrap();
        assert_eq!(path, vec![EntityId::from("S1"), "P1".into(), "O1".into()]);
        assert!(graph.find_path(&"S1".into(), &"O1".into(), 1).unwrap().is_empty());
    }

    #[test]
    fn inventory_at_merges_attribute_and_stores_links() {
        let mut graph = OntologyGraph::new();
        graph.add_entity(location("L1")).unwrap();
        graph
            .add_entity(
                Entity::new("INV1", EntityType::Inventory)
                    .with_attr(attrs::LOCATION_ID, "L1")
                    .with_attr(attrs::QUANTITY_AVAILABLE, 5),
            )
            .unwrap();
        graph
            .add_entity(Entity::new("INV2", EntityType::Inventory).with_attr(attrs::QUANTITY_AVAILABLE, 7))
            .unwrap();
        graph.add_relationship(Relationship::new("L1", RelationKind::Stores, "INV2")).unwrap();
        graph.add_relationship(Relationship::new("L1", RelationKind::Stores, "INV1")).unwrap();

        let held: Vec<_> = graph
            .inventory_at(&"L1".into())
            .unwrap()
            .into_iter()
            .map(|e| e.id.0.as_str())
            .collect();
        assert_eq!(held, vec!["INV1", "INV2"]);
    }
}
