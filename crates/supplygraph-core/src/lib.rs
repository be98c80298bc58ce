//! # Supplygraph Core
//!
//! Core types and the store trait for the supply-chain ontology.
//!
//! The ontology is a typed, directed entity/relationship graph:
//!
//! - **Entity** - a uniquely identified record of one of ten types
//!   (Product, Location, Supplier, Customer, Order, Shipment, Vehicle,
//!   Inventory, Machine, Employee) with free-form attributes and tags
//! - **Relationship** - a directed, kinded edge between two entities
//! - **OntologyStore** - the write-once-then-read contract every graph
//!   backend implements
//!
//! ## Quick Start
//!
//! ```rust
//! use supplygraph_core::prelude::*;
//!
//! let warehouse = Entity::new("L1", EntityType::Location)
//!     .with_attr(attrs::NAME, "Memphis Warehouse")
//!     .with_attr(attrs::CAPACITY, 100.0);
//!
//! assert_eq!(warehouse.display_name(), "Memphis Warehouse");
//! assert_eq!(warehouse.number(attrs::CAPACITY), Some(100.0));
//! ```

pub mod attrs;
pub mod types;
pub mod store;
pub mod error;
pub mod prelude;
