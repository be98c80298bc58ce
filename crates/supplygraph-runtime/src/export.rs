//! Full graph export and dataset loading.
//!
//! The export is a complete JSON dump of entities and relationships plus
//! metadata. Dataset files use the same `entities`/`relationships` shape
//! without metadata, so an export file can be loaded back as a dataset.
//! Both directions go through the validating insert path.

use crate::graph_impl::OntologyGraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use supplygraph_core::error::{OntologyError, Result};
use supplygraph_core::store::OntologyStore;
use supplygraph_core::types::*;
use tracing::{info, warn};
use uuid::Uuid;

/// Export metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub snapshot_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub entity_count: usize,
    pub relationship_count: usize,
    pub entities_by_type: BTreeMap<EntityType, usize>,
    pub relationship_kinds: Vec<RelationKind>,
}

/// Complete serialized graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyExport {
    pub metadata: ExportMetadata,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

/// Input shape for bulk loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// Outcome of checking a dataset without stopping at the first problem.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub accepted_entities: usize,
    pub accepted_relationships: usize,
    pub errors: Vec<OntologyError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Dataset {
    /// Build a graph, failing on the first rejected record.
    pub fn into_graph(self) -> Result<OntologyGraph> {
        let mut graph = OntologyGraph::new();
        for entity in self.entities {
            let id = entity.id.clone();
            graph.add_entity(entity).map_err(|e| {
                warn!(entity = %id, error = %e, "rejected entity");
                e
            })?;
        }
        for rel in self.relationships {
            let (source, target, kind) = (rel.source.clone(), rel.target.clone(), rel.kind);
            graph.add_relationship(rel).map_err(|e| {
                warn!(%source, %target, %kind, error = %e, "rejected relationship");
                e
            })?;
        }
        Ok(graph)
    }

    /// Insert everything that validates and collect every rejection.
    pub fn validate(&self) -> ValidationReport {
        let mut graph = OntologyGraph::new();
        let mut report = ValidationReport::default();
        for entity in &self.entities {
            match graph.add_entity(entity.clone()) {
                Ok(()) => report.accepted_entities += 1,
                Err(e) => report.errors.push(e),
            }
        }
        for rel in &self.relationships {
            match graph.add_relationship(rel.clone()) {
                Ok(()) => report.accepted_relationships += 1,
                Err(e) => report.errors.push(e),
            }
        }
        report
    }
}

/// Dump every entity and relationship with metadata, stamped with the
/// snapshot's identity and generation time.
pub fn export_full(store: &dyn OntologyStore, snapshot_id: Uuid, generated_at: DateTime<Utc>) -> OntologyExport {
    let entities: Vec<Entity> = store.entities().into_iter().cloned().collect();
    let relationships: Vec<Relationship> = store.relationships().into_iter().cloned().collect();

    let mut entities_by_type = BTreeMap::new();
    for e in &entities {
        *entities_by_type.entry(e.entity_type).or_insert(0) += 1;
    }
    let mut relationship_kinds: Vec<RelationKind> = relationships.iter().map(|r| r.kind).collect();
    relationship_kinds.sort();
    relationship_kinds.dedup();

    OntologyExport {
        metadata: ExportMetadata {
            snapshot_id,
            generated_at,
            entity_count: entities.len(),
            relationship_count: relationships.len(),
            entities_by_type,
            relationship_kinds,
        },
        entities,
        relationships,
    }
}

impl OntologyGraph {
    /// Rebuild a graph from an export.
    pub fn from_export(export: OntologyExport) -> Result<Self> {
        Dataset {
            entities: export.entities,
            relationships: export.relationships,
        }
        .into_graph()
    }
}

/// Write an export as pretty JSON, creating parent directories.
pub fn save_export(export: &OntologyExport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(export)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    info!(path = %path.display(), entities = export.metadata.entity_count, "export written");
    Ok(())
}

pub fn load_export(path: &Path) -> Result<OntologyExport> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Read a dataset file without building it.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Read and validate a dataset file into a graph.
pub fn load_dataset(path: &Path) -> Result<OntologyGraph> {
    let graph = read_dataset(path)?.into_graph()?;
    info!(
        path = %path.display(),
        entities = graph.entity_count(),
        relationships = graph.relationship_count(),
        "dataset loaded"
    );
    Ok(graph)
}

/// Whether two stores hold the same entities and adjacency.
pub fn verify_round_trip(original: &dyn OntologyStore, restored: &dyn OntologyStore) -> bool {
    if original.entity_count() != restored.entity_count()
        || original.relationship_count() != restored.relationship_count()
    {
        return false;
    }
    original.entities().into_iter().all(|e| {
        let Ok(theirs) = restored.get_entity(&e.id) else {
            return false;
        };
        let ours_out = original.relationships_of(&e.id, None, Direction::Both).unwrap_or_default();
        let theirs_out = restored.relationships_of(&e.id, None, Direction::Both).unwrap_or_default();
        theirs == e && ours_out == theirs_out
    })
}
