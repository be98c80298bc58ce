//! Supplygraph Core Prelude - convenient imports for common usage.
//!
//! ```rust
//! use supplygraph_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    Attributes, CapacityWarning, Direction, Entity, EntityFilter, EntityId, EntityType,
    RelationKind, Relationship,
};

// Re-export attribute keys
pub use crate::attrs;

// Re-export the OntologyStore trait
pub use crate::store::OntologyStore;

// Re-export error types
pub use crate::error::{OntologyError, Result};
