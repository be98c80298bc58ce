//! Supply-chain KPIs computed from a graph snapshot.
//!
//! Every function here is a pure read over an [`OntologyStore`]:
//! - Utilization: stored volume over declared capacity, per location
//! - Delivery: order completion, fulfilment and on-time shipment rates
//! - Suppliers: stored reliability scores, ranked
//! - Exceptions: over/understocked inventory and over-capacity locations
//! - Network health: a blended score with a coarse status

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use supplygraph_core::attrs::{self, order_status, shipment_status};
use supplygraph_core::error::{OntologyError, Result};
use supplygraph_core::store::OntologyStore;
use supplygraph_core::types::*;
use tracing::warn;

/// Unit volume assumed when a product does not declare one.
pub const DEFAULT_UNIT_VOLUME: f64 = 1.0;

/// Tunable thresholds for the analytics engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Inventory above `factor × safetyStockLevel` is overstocked.
    #[serde(default = "default_overstock_factor")]
    pub overstock_factor: f64,
    /// Inventory below `factor × safetyStockLevel` is understocked.
    #[serde(default = "default_understock_factor")]
    pub understock_factor: f64,
    /// Utilization at which a location's efficiency peaks.
    #[serde(default = "default_optimal_utilization")]
    pub optimal_utilization: f64,
}

fn default_overstock_factor() -> f64 {
    3.0
}

fn default_understock_factor() -> f64 {
    0.5
}

fn default_optimal_utilization() -> f64 {
    0.8
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            overstock_factor: default_overstock_factor(),
            understock_factor: default_understock_factor(),
            optimal_utilization: default_optimal_utilization(),
        }
    }
}

/// Half-open `[start, end)` range on order dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// One location's utilization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUtilization {
    pub location_id: EntityId,
    pub name: String,
    pub utilization: f64,
    pub stored_volume: f64,
    pub capacity: f64,
}

/// A supplier and its stored reliability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierScore {
    pub supplier_id: EntityId,
    pub name: String,
    pub reliability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    Overstock,
    Understock,
}

/// An inventory record outside its product's safety-stock band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryException {
    pub inventory_id: EntityId,
    pub product_id: Option<EntityId>,
    pub location_id: Option<EntityId>,
    pub kind: ExceptionKind,
    pub quantity: f64,
    pub safety_stock: f64,
}

/// Throughput view of one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPerformance {
    pub location_id: EntityId,
    pub name: String,
    pub utilization: f64,
    pub incoming_shipments: usize,
    pub outgoing_shipments: usize,
    pub efficiency: f64,
}

/// Shipment volume aggregated over one origin → destination lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentFlow {
    pub source: EntityId,
    pub target: EntityId,
    pub volume: f64,
    pub shipments: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    NeedsAttention,
}

impl HealthStatus {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            HealthStatus::Excellent
        } else if score > 0.6 {
            HealthStatus::Good
        } else {
            HealthStatus::NeedsAttention
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::NeedsAttention => "needs_attention",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkHealth {
    pub score: f64,
    pub status: HealthStatus,
    pub fulfillment_rate: f64,
    pub on_time_rate: f64,
    pub average_utilization: f64,
}

/// Everything the analytics endpoint reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalytics {
    pub completion_rate: f64,
    pub on_time_rate: f64,
    pub fulfillment_rate: f64,
    pub utilization_by_location: Vec<LocationUtilization>,
    pub supplier_scores: Vec<SupplierScore>,
    pub network_health: NetworkHealth,
    pub location_performance: Vec<LocationPerformance>,
    pub capacity_warnings: Vec<CapacityWarning>,
}

/// Read-only KPI computation over a store.
pub struct AnalyticsEngine<'a> {
    store: &'a dyn OntologyStore,
    settings: AnalyticsSettings,
}

impl<'a> AnalyticsEngine<'a> {
    pub fn new(store: &'a dyn OntologyStore) -> Self {
        Self::with_settings(store, AnalyticsSettings::default())
    }

    pub fn with_settings(store: &'a dyn OntologyStore, settings: AnalyticsSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &'a dyn OntologyStore {
        self.store
    }

    fn location(&self, id: &EntityId) -> Result<&'a Entity> {
        let entity = self.store.get_entity(id)?;
        if !entity.is(EntityType::Location) {
            return Err(OntologyError::not_found(id.as_str()));
        }
        Ok(entity)
    }

    /// Σ quantityAvailable × unit volume over the location's inventory.
    pub fn stored_volume(&self, location_id: &EntityId) -> Result<f64> {
        self.location(location_id)?;
        let volume = self
            .store
            .inventory_at(location_id)?
            .into_iter()
            .map(|inv| inv.number(attrs::QUANTITY_AVAILABLE).unwrap_or(0.0) * self.unit_volume(inv))
            .sum();
        Ok(volume)
    }

    fn unit_volume(&self, inventory: &Entity) -> f64 {
        inventory
            .reference(attrs::PRODUCT_ID)
            .and_then(|pid| self.store.get_entity(&pid).ok())
            .and_then(|product| product.number(attrs::VOLUME))
            .unwrap_or(DEFAULT_UNIT_VOLUME)
    }

    /// Stored volume over declared capacity. Zero when capacity is zero or
    /// missing; not capped at 1.
    pub fn utilization(&self, location_id: &EntityId) -> Result<f64> {
        Ok(self.location_utilization(self.location(location_id)?)?.utilization)
    }

    fn location_utilization(&self, location: &Entity) -> Result<LocationUtilization> {
        let capacity = location.number(attrs::CAPACITY).unwrap_or(0.0);
        let stored_volume = self.stored_volume(&location.id)?;
        let utilization = if capacity > 0.0 { stored_volume / capacity } else { 0.0 };
        Ok(LocationUtilization {
            location_id: location.id.clone(),
            name: location.display_name().to_string(),
            utilization,
            stored_volume,
            capacity,
        })
    }

    /// Delivered orders over all orders, optionally restricted to orders
    /// dated inside `window`.
    pub fn order_completion_rate(&self, window: Option<&TimeWindow>) -> f64 {
        let orders: Vec<&Entity> = self
            .store
            .list_entities(EntityType::Order, None)
            .into_iter()
            .filter(|order| match window {
                None => true,
                Some(w) => order
                    .attr(attrs::ORDER_DATE)
                    .and_then(parse_timestamp)
                    .map_or(false, |at| w.contains(at)),
            })
            .collect();
        ratio(
            orders.iter().filter(|o| o.text(attrs::STATUS) == Some(order_status::DELIVERED)).count(),
            orders.len(),
        )
    }

    /// Shipped or delivered orders over all orders.
    pub fn fulfillment_rate(&self) -> f64 {
        let orders = self.store.list_entities(EntityType::Order, None);
        let fulfilled = orders
            .iter()
            .filter(|o| {
                matches!(
                    o.text(attrs::STATUS),
                    Some(order_status::SHIPPED) | Some(order_status::DELIVERED)
                )
            })
            .count();
        ratio(fulfilled, orders.len())
    }

    /// Share of completed shipments that arrived no later than scheduled.
    ///
    /// A shipment is completed when it has both arrival timestamps.
    pub fn on_time_delivery_rate(&self) -> f64 {
        let (on_time, completed) = self.punctuality();
        ratio(on_time, completed)
    }

    /// Shipments with both arrival timestamps.
    pub fn completed_shipment_count(&self) -> usize {
        self.punctuality().1
    }

    /// (on time, completed)
    fn punctuality(&self) -> (usize, usize) {
        let mut completed = 0;
        let mut on_time = 0;
        for shipment in self.store.list_entities(EntityType::Shipment, None) {
            let scheduled = shipment.attr(attrs::SCHEDULED_ARRIVAL).and_then(parse_timestamp);
            let actual = shipment.attr(attrs::ACTUAL_ARRIVAL).and_then(parse_timestamp);
            if let (Some(scheduled), Some(actual)) = (scheduled, actual) {
                completed += 1;
                if actual <= scheduled {
                    on_time += 1;
                }
            }
        }
        (on_time, completed)
    }

    /// Share of shipments currently flagged delayed.
    pub fn delayed_shipment_share(&self) -> f64 {
        let shipments = self.store.list_entities(EntityType::Shipment, None);
        let delayed = shipments
            .iter()
            .filter(|s| s.text(attrs::STATUS) == Some(shipment_status::DELAYED))
            .count();
        ratio(delayed, shipments.len())
    }

    /// Stored reliability score of a supplier.
    pub fn supplier_reliability(&self, supplier_id: &EntityId) -> Result<f64> {
        let supplier = self.store.get_entity(supplier_id)?;
        if !supplier.is(EntityType::Supplier) {
            return Err(OntologyError::not_found(supplier_id.as_str()));
        }
        supplier.number(attrs::RELIABILITY_SCORE).ok_or_else(|| {
            OntologyError::validation(
                supplier_id.as_str(),
                attrs::RELIABILITY_SCORE,
                "supplier has no reliability score",
            )
        })
    }

    /// Suppliers with a score, best first, ties by id.
    pub fn supplier_scores(&self) -> Vec<SupplierScore> {
        let mut scores: Vec<SupplierScore> = self
            .store
            .list_entities(EntityType::Supplier, None)
            .into_iter()
            .filter_map(|s| {
                s.number(attrs::RELIABILITY_SCORE).map(|reliability| SupplierScore {
                    supplier_id: s.id.clone(),
                    name: s.display_name().to_string(),
                    reliability,
                })
            })
            .collect();
        scores.sort_by(|a, b| {
            b.reliability
                .total_cmp(&a.reliability)
                .then_with(|| a.supplier_id.cmp(&b.supplier_id))
        });
        scores
    }

    /// All locations by utilization, highest first, ties by ascending id.
    pub fn rank_locations_by_utilization(&self) -> Vec<LocationUtilization> {
        let mut ranked: Vec<LocationUtilization> = self
            .store
            .list_entities(EntityType::Location, None)
            .into_iter()
            .filter_map(|loc| self.location_utilization(loc).ok())
            .collect();
        ranked.sort_by(|a, b| {
            b.utilization
                .total_cmp(&a.utilization)
                .then_with(|| a.location_id.cmp(&b.location_id))
        });
        ranked
    }

    pub fn average_utilization(&self) -> f64 {
        let ranked = self.rank_locations_by_utilization();
        if ranked.is_empty() {
            return 0.0;
        }
        ranked.iter().map(|l| l.utilization).sum::<f64>() / ranked.len() as f64
    }

    /// Locations storing more volume than they declare.
    pub fn capacity_warnings(&self) -> Vec<CapacityWarning> {
        self.rank_locations_by_utilization()
            .into_iter()
            .filter_map(over_capacity)
            .collect()
    }

    /// The capacity warning for one location, if it is over capacity.
    pub fn capacity_warning_at(&self, location_id: &EntityId) -> Option<CapacityWarning> {
        let location = self.location(location_id).ok()?;
        over_capacity(self.location_utilization(location).ok()?)
    }

    /// Efficiency in [0, 1], peaking at the optimal utilization and falling
    /// to zero at full capacity.
    pub fn efficiency_score(&self, utilization: f64) -> f64 {
        let optimal = self.settings.optimal_utilization.clamp(f64::EPSILON, 1.0 - f64::EPSILON);
        let score = if utilization <= optimal {
            utilization / optimal
        } else {
            1.0 - (utilization - optimal) / (1.0 - optimal)
        };
        score.clamp(0.0, 1.0)
    }

    pub fn network_health(&self) -> NetworkHealth {
        let fulfillment_rate = self.fulfillment_rate();
        let on_time_rate = self.on_time_delivery_rate();
        let average_utilization = self.average_utilization();
        let utilization_term = (average_utilization / self.settings.optimal_utilization).min(1.0);
        let score = (fulfillment_rate + on_time_rate + utilization_term) / 3.0;
        NetworkHealth {
            score,
            status: HealthStatus::from_score(score),
            fulfillment_rate,
            on_time_rate,
            average_utilization,
        }
    }

    /// Inventory records outside their product's safety-stock band.
    ///
    /// Records whose product declares no safety stock are skipped.
    pub fn inventory_exceptions(&self) -> Vec<InventoryException> {
        let mut exceptions = Vec::new();
        for inv in self.store.list_entities(EntityType::Inventory, None) {
            let product_id = inv.reference(attrs::PRODUCT_ID);
            let Some(safety_stock) = product_id
                .as_ref()
                .and_then(|pid| self.store.get_entity(pid).ok())
                .and_then(|p| p.number(attrs::SAFETY_STOCK_LEVEL))
            else {
                continue;
            };
            let quantity = inv.number(attrs::QUANTITY_AVAILABLE).unwrap_or(0.0);
            let kind = if quantity > safety_stock * self.settings.overstock_factor {
                ExceptionKind::Overstock
            } else if quantity < safety_stock * self.settings.understock_factor {
                ExceptionKind::Understock
            } else {
                continue;
            };
            exceptions.push(InventoryException {
                inventory_id: inv.id.clone(),
                product_id,
                location_id: inv.reference(attrs::LOCATION_ID),
                kind,
                quantity,
                safety_stock,
            });
        }
        exceptions
    }

    /// Inventory records that can be judged against a safety stock.
    pub fn assessable_inventory_count(&self) -> usize {
        self.store
            .list_entities(EntityType::Inventory, None)
            .into_iter()
            .filter(|inv| {
                inv.reference(attrs::PRODUCT_ID)
                    .and_then(|pid| self.store.get_entity(&pid).ok())
                    .and_then(|p| p.number(attrs::SAFETY_STOCK_LEVEL))
                    .is_some()
            })
            .count()
    }

    pub fn location_performance(&self) -> Vec<LocationPerformance> {
        let mut incoming: BTreeMap<EntityId, usize> = BTreeMap::new();
        let mut outgoing: BTreeMap<EntityId, usize> = BTreeMap::new();
        for shipment in self.store.list_entities(EntityType::Shipment, None) {
            if let Some(dest) = shipment.reference(attrs::DESTINATION_ID) {
                *incoming.entry(dest).or_insert(0) += 1;
            }
            if let Some(origin) = shipment.reference(attrs::ORIGIN_ID) {
                *outgoing.entry(origin).or_insert(0) += 1;
            }
        }

        self.store
            .list_entities(EntityType::Location, None)
            .into_iter()
            .filter_map(|loc| self.location_utilization(loc).ok())
            .map(|l| LocationPerformance {
                incoming_shipments: incoming.get(&l.location_id).copied().unwrap_or(0),
                outgoing_shipments: outgoing.get(&l.location_id).copied().unwrap_or(0),
                efficiency: self.efficiency_score(l.utilization),
                utilization: l.utilization,
                name: l.name,
                location_id: l.location_id,
            })
            .collect()
    }

    /// Shipment quantities summed per origin → destination lane, sorted by
    /// (source, target).
    pub fn shipment_flows(&self) -> Vec<ShipmentFlow> {
        let mut lanes: BTreeMap<(EntityId, EntityId), (f64, usize)> = BTreeMap::new();
        for shipment in self.store.list_entities(EntityType::Shipment, None) {
            let (Some(origin), Some(dest)) = (
                shipment.reference(attrs::ORIGIN_ID),
                shipment.reference(attrs::DESTINATION_ID),
            ) else {
                continue;
            };
            let lane = lanes.entry((origin, dest)).or_insert((0.0, 0));
            lane.0 += shipment.number(attrs::QUANTITY).unwrap_or(1.0);
            lane.1 += 1;
        }
        lanes
            .into_iter()
            .map(|((source, target), (volume, shipments))| ShipmentFlow {
                source,
                target,
                volume,
                shipments,
            })
            .collect()
    }

    pub fn performance_report(&self) -> PerformanceAnalytics {
        let capacity_warnings = self.capacity_warnings();
        for w in &capacity_warnings {
            warn!(location = %w.location_id, utilization = w.utilization, "location over capacity");
        }
        PerformanceAnalytics {
            completion_rate: self.order_completion_rate(None),
            on_time_rate: self.on_time_delivery_rate(),
            fulfillment_rate: self.fulfillment_rate(),
            utilization_by_location: self.rank_locations_by_utilization(),
            supplier_scores: self.supplier_scores(),
            network_health: self.network_health(),
            location_performance: self.location_performance(),
            capacity_warnings,
        }
    }
}

fn over_capacity(l: LocationUtilization) -> Option<CapacityWarning> {
    (l.utilization > 1.0).then(|| CapacityWarning {
        location_id: l.location_id,
        utilization: l.utilization,
        stored_volume: l.stored_volume,
        capacity: l.capacity,
    })
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS`, or a bare
/// date (midnight UTC).
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_impl::OntologyGraph;
    use chrono::TimeZone;
    use serde_json::json;

    fn warehouse(id: &str, capacity: f64) -> Entity {
        Entity::new(id, EntityType::Location)
            .with_attr(attrs::NAME, format!("Warehouse {}", id))
            .with_attr(attrs::CAPACITY, capacity)
    }

    fn stock(id: &str, location: &str, product: &str, qty: f64) -> Entity {
        Entity::new(id, EntityType::Inventory)
            .with_attr(attrs::LOCATION_ID, location)
            .with_attr(attrs::PRODUCT_ID, product)
            .with_attr(attrs::QUANTITY_AVAILABLE, qty)
    }

    fn order(id: &str, status: &str, date: &str) -> Entity {
        Entity::new(id, EntityType::Order)
            .with_attr(attrs::STATUS, status)
            .with_attr(attrs::ORDER_DATE, date)
    }

    #[test]
    fn utilization_is_stored_volume_over_capacity() {
        let mut g = OntologyGraph::new();
        g.add_entity(warehouse("L1", 100.0)).unwrap();
        g.add_entity(stock("INV1", "L1", "P404", 60.0)).unwrap();

        let engine = AnalyticsEngine::new(&g);
        assert!((engine.utilization(&"L1".into()).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn product_volume_scales_stored_volume() {
        let mut g = OntologyGraph::new();
        g.add_entity(warehouse("L1", 100.0)).unwrap();
        g.add_entity(Entity::new("P1", EntityType::Product).with_attr(attrs::VOLUME, 0.5)).unwrap();
        g.add_entity(stock("INV1", "L1", "P1", 60.0)).unwrap();

        let engine = AnalyticsEngine::new(&g);
        assert!((engine.stored_volume(&"L1".into()).unwrap() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn zero_capacity_yields_zero_utilization() {
        let mut g = OntologyGraph::new();
        g.add_entity(warehouse("L1", 0.0)).unwrap();
        g.add_entity(stock("INV1", "L1", "P1", 60.0)).unwrap();

        assert_eq!(AnalyticsEngine::new(&g).utilization(&"L1".into()).unwrap(), 0.0);
    }

    #[test]
    fn utilization_of_unknown_or_non_location_is_not_found() {
        let mut g = OntologyGraph::new();
        g.add_entity(Entity::new("S1", EntityType::Supplier)).unwrap();
        let engine = AnalyticsEngine::new(&g);

        assert!(engine.utilization(&"L9".into()).unwrap_err().is_not_found());
        assert!(engine.utilization(&"S1".into()).unwrap_err().is_not_found());
    }

    #[test]
    fn completion_rate_honours_half_open_window() {
        let mut g = OntologyGraph::new();
        g.add_entity(order("O1", "delivered", "2024-01-01T00:00:00Z")).unwrap();
        g.add_entity(order("O2", "pending", "2024-01-15T00:00:00Z")).unwrap();
        g.add_entity(order("O3", "delivered", "2024-02-01T00:00:00Z")).unwrap();
        let engine = AnalyticsEngine::new(&g);

        assert!((engine.order_completion_rate(None) - 2.0 / 3.0).abs() < 1e-12);

        let january = TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        );
        assert_eq!(engine.order_completion_rate(Some(&january)), 0.5);
    }

    #[test]
    fn completion_rate_without_orders_is_zero() {
        let g = OntologyGraph::new();
        assert_eq!(AnalyticsEngine::new(&g).order_completion_rate(None), 0.0);
    }

    #[test]
    fn on_time_rate_counts_only_completed_shipments() {
        let mut g = OntologyGraph::new();
        g.add_entity(
            Entity::new("SH1", EntityType::Shipment)
                .with_attr(attrs::SCHEDULED_ARRIVAL, "2024-03-01T12:00:00Z")
                .with_attr(attrs::ACTUAL_ARRIVAL, "2024-03-01T12:00:00Z"),
        )
        .unwrap();
        g.add_entity(
            Entity::new("SH2", EntityType::Shipment)
                .with_attr(attrs::SCHEDULED_ARRIVAL, "2024-03-01")
                .with_attr(attrs::ACTUAL_ARRIVAL, "2024-03-04"),
        )
        .unwrap();
        g.add_entity(
            Entity::new("SH3", EntityType::Shipment).with_attr(attrs::SCHEDULED_ARRIVAL, "2024-03-01"),
        )
        .unwrap();

        assert_eq!(AnalyticsEngine::new(&g).on_time_delivery_rate(), 0.5);
    }

    #[test]
    fn supplier_reliability_errors() {
        let mut g = OntologyGraph::new();
        g.add_entity(Entity::new("S1", EntityType::Supplier).with_attr(attrs::RELIABILITY_SCORE, 0.93))
            .unwrap();
        g.add_entity(Entity::new("S2", EntityType::Supplier)).unwrap();
        g.add_entity(warehouse("L1", 10.0)).unwrap();
        let engine = AnalyticsEngine::new(&g);

        assert_eq!(engine.supplier_reliability(&"S1".into()).unwrap(), 0.93);
        assert!(engine.supplier_reliability(&"S2".into()).unwrap_err().is_validation());
        assert!(engine.supplier_reliability(&"L1".into()).unwrap_err().is_not_found());
        assert_eq!(engine.supplier_scores().len(), 1);
    }

    #[test]
    fn ranking_breaks_ties_by_id() {
        let mut g = OntologyGraph::new();
        for id in ["L3", "L1", "L2"] {
            g.add_entity(warehouse(id, 100.0)).unwrap();
        }
        g.add_entity(stock("INV1", "L2", "P1", 90.0)).unwrap();
        g.add_entity(stock("INV3", "L3", "P1", 40.0)).unwrap();
        g.add_entity(stock("INV4", "L1", "P1", 40.0)).unwrap();

        let ids: Vec<String> = AnalyticsEngine::new(&g)
            .rank_locations_by_utilization()
            .into_iter()
            .map(|l| l.location_id.0)
            .collect();
        assert_eq!(ids, vec!["L2", "L1", "L3"]);
    }

    #[test]
    fn over_capacity_is_a_warning() {
        let mut g = OntologyGraph::new();
        g.add_entity(warehouse("L1", 50.0)).unwrap();
        g.add_entity(stock("INV1", "L1", "P1", 75.0)).unwrap();

        let warnings = AnalyticsEngine::new(&g).capacity_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].location_id, EntityId::from("L1"));
        assert!((warnings[0].utilization - 1.5).abs() < 1e-12);
    }

    #[test]
    fn capacity_warning_at_looks_at_one_location() {
        let mut g = OntologyGraph::new();
        g.add_entity(warehouse("L1", 50.0)).unwrap();
        g.add_entity(warehouse("L2", 500.0)).unwrap();
        g.add_entity(stock("INV1", "L1", "P1", 75.0)).unwrap();
        g.add_entity(stock("INV2", "L2", "P1", 75.0)).unwrap();
        let engine = AnalyticsEngine::new(&g);

        let warning = engine.capacity_warning_at(&EntityId::from("L1")).unwrap();
        assert_eq!(warning, engine.capacity_warnings()[0]);
        assert!(engine.capacity_warning_at(&EntityId::from("L2")).is_none());
        assert!(engine.capacity_warning_at(&EntityId::from("INV1")).is_none());
        assert!(engine.capacity_warning_at(&EntityId::from("nope")).is_none());
    }

    #[test]
    fn efficiency_peaks_at_optimal_utilization() {
        let g = OntologyGraph::new();
        let engine = AnalyticsEngine::new(&g);

        assert!((engine.efficiency_score(0.4) - 0.5).abs() < 1e-12);
        assert!((engine.efficiency_score(0.8) - 1.0).abs() < 1e-12);
        assert!((engine.efficiency_score(0.9) - 0.5).abs() < 1e-9);
        assert_eq!(engine.efficiency_score(1.4), 0.0);
    }

    #[test]
    fn inventory_exceptions_use_safety_stock_band() {
        let mut g = OntologyGraph::new();
        g.add_entity(Entity::new("P1", EntityType::Product).with_attr(attrs::SAFETY_STOCK_LEVEL, 10))
            .unwrap();
        g.add_entity(stock("INV1", "L1", "P1", 31.0)).unwrap();
        g.add_entity(stock("INV2", "L1", "P1", 4.0)).unwrap();
        g.add_entity(stock("INV3", "L1", "P1", 10.0)).unwrap();
        g.add_entity(stock("INV4", "L1", "P2", 0.0)).unwrap();

        let engine = AnalyticsEngine::new(&g);
        let kinds: Vec<(String, ExceptionKind)> = engine
            .inventory_exceptions()
            .into_iter()
            .map(|e| (e.inventory_id.0, e.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("INV1".to_string(), ExceptionKind::Overstock),
                ("INV2".to_string(), ExceptionKind::Understock)
            ]
        );
        assert_eq!(engine.assessable_inventory_count(), 3);
    }

    #[test]
    fn network_health_blends_three_rates() {
        let mut g = OntologyGraph::new();
        g.add_entity(order("O1", "delivered", "2024-01-01")).unwrap();
        g.add_entity(warehouse("L1", 100.0)).unwrap();
        g.add_entity(stock("INV1", "L1", "P1", 80.0)).unwrap();

        let health = AnalyticsEngine::new(&g).network_health();
        // fulfilment 1.0, on-time 0.0 (no completed shipments), utilization term 1.0
        assert!((health.score - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(health.status, HealthStatus::Good);
    }

    #[test]
    fn flows_aggregate_per_lane() {
        let mut g = OntologyGraph::new();
        for (id, from, to, qty) in [("SH1", "L2", "L1", 5.0), ("SH2", "L1", "L2", 3.0), ("SH3", "L2", "L1", 7.0)] {
            g.add_entity(
                Entity::new(id, EntityType::Shipment)
                    .with_attr(attrs::ORIGIN_ID, from)
                    .with_attr(attrs::DESTINATION_ID, to)
                    .with_attr(attrs::QUANTITY, qty),
            )
            .unwrap();
        }

        let flows = AnalyticsEngine::new(&g).shipment_flows();
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].source, EntityId::from("L1"));
        assert_eq!(flows[1].volume, 12.0);
        assert_eq!(flows[1].shipments, 2);
    }

    #[test]
    fn timestamps_accept_common_shapes() {
        assert!(parse_timestamp(&json!("2024-05-01T10:00:00+02:00")).is_some());
        assert!(parse_timestamp(&json!("2024-05-01T10:00:00.123")).is_some());
        assert!(parse_timestamp(&json!("2024-05-01")).is_some());
        assert!(parse_timestamp(&json!("yesterday")).is_none());
        assert!(parse_timestamp(&json!(17)).is_none());
    }
}
