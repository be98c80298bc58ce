//! Supplygraph Runtime Prelude - convenient imports for common usage.
//!
//! ```rust
//! use supplygraph_runtime::prelude::*;
//! ```

// Re-export the graph backend
pub use crate::graph_impl::OntologyGraph;

// Re-export analytics
pub use crate::analytics::{
    AnalyticsEngine, AnalyticsSettings, ExceptionKind, HealthStatus, InventoryException,
    LocationPerformance, LocationUtilization, NetworkHealth, PerformanceAnalytics,
    ShipmentFlow, SupplierScore, TimeWindow,
};

// Re-export projection and export
pub use crate::projection::{to_network_projection, NetworkProjection, ProjectedEdge, ProjectedNode};
pub use crate::export::{
    export_full, load_dataset, load_export, read_dataset, save_export, verify_round_trip,
    Dataset, ExportMetadata, OntologyExport, ValidationReport,
};

// Re-export snapshots
pub use crate::snapshot::{Snapshot, SnapshotHandle};

// Re-export from core
pub use supplygraph_core::prelude::*;
