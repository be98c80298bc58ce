//! Shared types used across the store, analytics and agent crates.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::attrs;

/// Ordered attribute map. Ordering keeps serialized output deterministic.
pub type Attributes = BTreeMap<String, Value>;

/// Globally unique identifier of an entity (unique across all types).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The ontology class of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Product,
    Location,
    Supplier,
    Customer,
    Order,
    Shipment,
    Vehicle,
    Inventory,
    Machine,
    Employee,
}

impl EntityType {
    pub const ALL: [EntityType; 10] = [
        EntityType::Product,
        EntityType::Location,
        EntityType::Supplier,
        EntityType::Customer,
        EntityType::Order,
        EntityType::Shipment,
        EntityType::Vehicle,
        EntityType::Inventory,
        EntityType::Machine,
        EntityType::Employee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Product => "Product",
            EntityType::Location => "Location",
            EntityType::Supplier => "Supplier",
            EntityType::Customer => "Customer",
            EntityType::Order => "Order",
            EntityType::Shipment => "Shipment",
            EntityType::Vehicle => "Vehicle",
            EntityType::Inventory => "Inventory",
            EntityType::Machine => "Machine",
            EntityType::Employee => "Employee",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, uniquely identified record in the ontology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, entity_type: EntityType) -> Self {
        Self {
            id: id.into(),
            entity_type,
            attributes: Attributes::new(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Numeric attribute. Integers and floats both read as `f64`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(Value::as_f64)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Attribute holding the id of another entity.
    pub fn reference(&self, key: &str) -> Option<EntityId> {
        self.text(key).map(EntityId::from)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(attrs::NAME)
    }

    /// The entity's name, falling back to its id.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(self.id.as_str())
    }

    pub fn is(&self, entity_type: EntityType) -> bool {
        self.entity_type == entity_type
    }
}

/// Kind of a directed relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Supplier -> Product
    Supplies,
    /// Order -> Product
    Contains,
    /// Location -> Inventory (or Product)
    Stores,
    /// Shipment/Vehicle -> Product
    Transports,
    /// Factory -> Product
    Produces,
    /// Employee -> Location
    Manages,
    /// Employee -> Vehicle/Machine
    Operates,
    /// Any -> Location
    LocatedAt,
    /// Shipment -> Order
    Fulfills,
    /// Employee -> Location
    WorksAt,
    /// Shipment -> origin Location
    ShipsFrom,
    /// Shipment -> destination Location
    ShipsTo,
}

impl RelationKind {
    pub const ALL: [RelationKind; 12] = [
        RelationKind::Supplies,
        RelationKind::Contains,
        RelationKind::Stores,
        RelationKind::Transports,
        RelationKind::Produces,
        RelationKind::Manages,
        RelationKind::Operates,
        RelationKind::LocatedAt,
        RelationKind::Fulfills,
        RelationKind::WorksAt,
        RelationKind::ShipsFrom,
        RelationKind::ShipsTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Supplies => "supplies",
            RelationKind::Contains => "contains",
            RelationKind::Stores => "stores",
            RelationKind::Transports => "transports",
            RelationKind::Produces => "produces",
            RelationKind::Manages => "manages",
            RelationKind::Operates => "operates",
            RelationKind::LocatedAt => "located_at",
            RelationKind::Fulfills => "fulfills",
            RelationKind::WorksAt => "works_at",
            RelationKind::ShipsFrom => "ships_from",
            RelationKind::ShipsTo => "ships_to",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, kinded edge between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "sourceId")]
    pub source: EntityId,
    #[serde(rename = "targetId")]
    pub target: EntityId,
    pub kind: RelationKind,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Relationship {
    pub fn new(source: impl Into<EntityId>, kind: RelationKind, target: impl Into<EntityId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(Value::as_f64)
    }
}

/// Which side of an entity's adjacency to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Out,
    In,
    Both,
}

/// Optional filter for `list_entities`.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityFilter {
    /// Attribute present and equal to the value.
    AttributeEquals(String, Value),
    /// Entity carries the tag.
    HasTag(String),
    /// Case-insensitive substring of the entity's name.
    NameContains(String),
}

impl EntityFilter {
    pub fn matches(&self, entity: &Entity) -> bool {
        match self {
            EntityFilter::AttributeEquals(key, value) => entity.attr(key) == Some(value),
            EntityFilter::HasTag(tag) => entity.tags.contains(tag),
            EntityFilter::NameContains(fragment) => entity
                .name()
                .map(|n| n.to_lowercase().contains(&fragment.to_lowercase()))
                .unwrap_or(false),
        }
    }
}

/// Soft-invariant breach: a location storing more volume than it declares.
///
/// Reported alongside results, never raised as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityWarning {
    pub location_id: EntityId,
    pub utilization: f64,
    pub stored_volume: f64,
    pub capacity: f64,
}

impl fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is over capacity: {:.1} of {:.1} m3 ({:.1}%)",
            self.location_id,
            self.stored_volume,
            self.capacity,
            self.utilization * 100.0
        )
    }
}
