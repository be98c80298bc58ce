//! OntologyStore - the typed entity/relationship graph contract.
//!
//! A store is write-once-then-read: entities and relationships are added
//! during bulk load, never deleted, and the finished graph is served as an
//! immutable snapshot. Writes validate before touching any index, so a
//! rejected insert leaves the store unchanged.

use crate::error::Result;
use crate::types::*;

/// Handle to an ontology graph.
pub trait OntologyStore: Send + Sync {
    /// Get an entity by id. Fails with `NotFound` if absent.
    fn get_entity(&self, id: &EntityId) -> Result<&Entity>;

    /// Whether an entity with this id exists.
    fn contains(&self, id: &EntityId) -> bool;

    /// Entities of one type, in insertion order, optionally filtered.
    fn list_entities(&self, entity_type: EntityType, filter: Option<&EntityFilter>) -> Vec<&Entity>;

    /// Relationships touching an entity, optionally restricted to one kind.
    ///
    /// `Both` lists outgoing relationships first, then incoming, each in
    /// insertion order. Fails with `NotFound` for an unknown id.
    fn relationships_of(
        &self,
        id: &EntityId,
        kind: Option<RelationKind>,
        direction: Direction,
    ) -> Result<Vec<&Relationship>>;

    /// Add an entity. Fails with `ValidationError` on an id collision or a
    /// breached record invariant.
    fn add_entity(&mut self, entity: Entity) -> Result<()>;

    /// Add a relationship. Fails with `ValidationError` if either endpoint
    /// is missing.
    fn add_relationship(&mut self, relationship: Relationship) -> Result<()>;

    /// Entities reachable from `start` along outgoing `kind` edges.
    ///
    /// Breadth-first, at most `max_depth` hops, cycle-safe. The start entity
    /// is not included.
    fn traverse(&self, start: &EntityId, kind: RelationKind, max_depth: usize) -> Result<Vec<&Entity>>;

    /// Shortest undirected path between two entities over any relationship
    /// kind, as a list of ids including both ends. Empty when no path of at
    /// most `max_depth` hops exists.
    fn find_path(&self, from: &EntityId, to: &EntityId, max_depth: usize) -> Result<Vec<EntityId>>;

    /// Inventory records held at a location: those whose `locationId`
    /// attribute names it plus targets of its outgoing `stores` edges.
    fn inventory_at(&self, location: &EntityId) -> Result<Vec<&Entity>>;

    /// All entities in insertion order.
    fn entities(&self) -> Vec<&Entity>;

    /// All relationships in insertion order.
    fn relationships(&self) -> Vec<&Relationship>;

    /// Number of entities.
    fn entity_count(&self) -> usize;

    /// Number of relationships.
    fn relationship_count(&self) -> usize;
}
