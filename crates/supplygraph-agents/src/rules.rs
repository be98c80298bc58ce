//! The reflex rule book: one condition → action rule per intent.
//!
//! All three strategies start from the same rule outcome. The reflex agent
//! reports it directly; the others wrap it in context or planning steps.

use crate::agent::AgentRequest;
use crate::classifier::Intent;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use supplygraph_core::attrs;
use supplygraph_core::types::*;
use supplygraph_runtime::analytics::ExceptionKind;
use tracing::debug;

/// Confidence of the "no matching rule" step.
pub const UNKNOWN_CONFIDENCE: f64 = 0.2;

/// How many locations a ranking answer lists.
pub const RANKING_LIMIT: usize = 5;

/// Result of firing one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    /// Short rule name, used as the trace action.
    pub rule: &'static str,
    pub answer: String,
    pub observation: String,
    pub confidence: f64,
    /// Key under which the headline metric is tracked across queries.
    pub subject: Option<String>,
    pub metric: Option<f64>,
    pub data: Value,
    pub warnings: Vec<CapacityWarning>,
}

impl RuleOutcome {
    fn new(rule: &'static str, answer: String, confidence: f64) -> Self {
        Self {
            rule,
            observation: String::new(),
            answer,
            confidence,
            subject: None,
            metric: None,
            data: Value::Null,
            warnings: Vec::new(),
        }
    }

    fn observed(mut self, observation: impl Into<String>) -> Self {
        self.observation = observation.into();
        self
    }

    fn tracking(mut self, subject: impl Into<String>, metric: f64) -> Self {
        self.subject = Some(subject.into());
        self.metric = Some(metric);
        self
    }

    fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    fn with_warnings(mut self, warnings: Vec<CapacityWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Fire the rule for the request's intent.
pub fn fire(request: &AgentRequest<'_>) -> RuleOutcome {
    let outcome = match request.classification.intent {
        Intent::InventoryLookup => inventory_lookup(request),
        Intent::LocationInfo => location_info(request),
        Intent::PerformanceSummary => performance_summary(request),
        Intent::UtilizationRanking => utilization_ranking(request),
        Intent::SupplierReliability => supplier_reliability(request),
        Intent::OrderStatus => order_status(request),
        Intent::OptimizationRequest => optimization_fallback(request),
        Intent::Unknown => no_match(),
    };
    debug!(rule = outcome.rule, confidence = outcome.confidence, "rule fired");
    outcome
}

/// The outcome for an unclassifiable query.
pub fn no_match() -> RuleOutcome {
    RuleOutcome::new(
        "no_matching_rule",
        "I could not match that question to anything I know how to answer. Try asking about \
         inventory at a location, location details, utilization rankings, supplier reliability, \
         order status, network performance or optimization."
            .to_string(),
        UNKNOWN_CONFIDENCE,
    )
    .observed("no matching rule")
}

fn inventory_lookup(request: &AgentRequest<'_>) -> RuleOutcome {
    let c = request.classification;
    let products: Vec<&EntityId> = c.all(EntityType::Product).map(|m| &m.id).collect();
    let keep = |inv: &&Entity| {
        products.is_empty()
            || inv
                .reference(attrs::PRODUCT_ID)
                .map_or(false, |pid| products.contains(&&pid))
    };

    if let Some(location) = c.first(EntityType::Location) {
        let records: Vec<&Entity> = request
            .store
            .inventory_at(&location.id)
            .unwrap_or_default()
            .into_iter()
            .filter(keep)
            .collect();
        let (available, reserved) = totals(&records);
        let name = display_name(request, &location.id);
        let warnings = request.analytics.capacity_warning_at(&location.id).into_iter().collect();

        return RuleOutcome::new(
            "inventory_at_location",
            format!(
                "{} holds {} units available ({} reserved) across {} inventory records.",
                name,
                fmt_qty(available),
                fmt_qty(reserved),
                records.len()
            ),
            0.9,
        )
        .observed(format!("summed {} inventory records at {}", records.len(), location.id))
        .tracking(format!("inventory:{}", location.id), available)
        .with_data(json!({
            "locationId": location.id,
            "totalAvailable": available,
            "totalReserved": reserved,
            "records": records.iter().map(|r| inventory_row(r)).collect::<Vec<_>>(),
        }))
        .with_warnings(warnings);
    }

    let records: Vec<&Entity> = request
        .store
        .list_entities(EntityType::Inventory, None)
        .into_iter()
        .filter(keep)
        .collect();
    let (available, reserved) = totals(&records);
    let locations = request.store.list_entities(EntityType::Location, None).len();
    RuleOutcome::new(
        "inventory_network_wide",
        format!(
            "No location was named, so across the whole network: {} units available ({} reserved) \
             in {} inventory records at {} locations.",
            fmt_qty(available),
            fmt_qty(reserved),
            records.len(),
            locations
        ),
        0.5,
    )
    .observed(format!("fell back to network-wide sum over {} records", records.len()))
    .tracking("inventory:network", available)
    .with_data(json!({
        "totalAvailable": available,
        "totalReserved": reserved,
        "recordCount": records.len(),
    }))
}

fn location_info(request: &AgentRequest<'_>) -> RuleOutcome {
    let Some(mention) = request.classification.first(EntityType::Location) else {
        let names: Vec<&str> = request
            .store
            .list_entities(EntityType::Location, None)
            .into_iter()
            .map(Entity::display_name)
            .collect();
        return RuleOutcome::new(
            "list_locations",
            format!("The network has {} locations: {}.", names.len(), names.join(", ")),
            0.5,
        )
        .observed("no location named; listed all locations")
        .with_data(json!({ "locations": names }));
    };

    let Ok(location) = request.store.get_entity(&mention.id) else {
        return no_match();
    };
    let capacity = location.number(attrs::CAPACITY).unwrap_or(0.0);
    let utilization = request.analytics.utilization(&location.id).unwrap_or(0.0);
    let kind = location.text(attrs::LOCATION_KIND).unwrap_or("location");
    let mut answer = format!(
        "{} ({}) is a {} with capacity {} and utilization {:.1}%.",
        location.display_name(),
        location.id,
        kind.replace('_', " "),
        fmt_qty(capacity),
        utilization * 100.0
    );
    if let Some(address) = location.text(attrs::ADDRESS) {
        answer.push_str(&format!(" Address: {}.", address));
    }
    let warnings = request.analytics.capacity_warning_at(&location.id).into_iter().collect();

    RuleOutcome::new("describe_location", answer, 0.9)
        .observed(format!("read attributes of {}", location.id))
        .tracking(format!("utilization:{}", location.id), utilization)
        .with_data(json!({
            "locationId": location.id,
            "locationKind": kind,
            "address": location.attr(attrs::ADDRESS),
            "coordinates": location.attr(attrs::COORDINATES),
            "capacity": capacity,
            "utilization": utilization,
        }))
        .with_warnings(warnings)
}

fn performance_summary(request: &AgentRequest<'_>) -> RuleOutcome {
    let a = request.analytics;
    let completion = a.order_completion_rate(None);
    let health = a.network_health();
    RuleOutcome::new(
        "summarize_performance",
        format!(
            "Order completion is {:.1}%, on-time delivery {:.1}%, fulfilment {:.1}% and average \
             utilization {:.1}%. Network health is {} ({:.2}).",
            completion * 100.0,
            health.on_time_rate * 100.0,
            health.fulfillment_rate * 100.0,
            health.average_utilization * 100.0,
            health.status.as_str().replace('_', " "),
            health.score
        ),
        0.8,
    )
    .observed("computed completion, on-time, fulfilment and utilization KPIs")
    .tracking("performance:network", health.score)
    .with_data(json!({
        "completionRate": completion,
        "onTimeRate": health.on_time_rate,
        "fulfillmentRate": health.fulfillment_rate,
        "averageUtilization": health.average_utilization,
        "healthScore": health.score,
        "healthStatus": health.status,
    }))
    .with_warnings(a.capacity_warnings())
}

fn utilization_ranking(request: &AgentRequest<'_>) -> RuleOutcome {
    let ranked = request.analytics.rank_locations_by_utilization();
    let top: Vec<_> = ranked.iter().take(RANKING_LIMIT).collect();
    let listing: Vec<String> = top
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{}. {} ({:.1}%)", i + 1, l.name, l.utilization * 100.0))
        .collect();
    let answer = if listing.is_empty() {
        "There are no locations to rank.".to_string()
    } else {
        format!("Locations by utilization: {}.", listing.join("; "))
    };

    RuleOutcome::new("rank_utilization", answer, 0.85)
        .observed(format!("ranked {} locations", ranked.len()))
        .tracking("utilization:top", top.first().map_or(0.0, |l| l.utilization))
        .with_data(json!({ "ranking": top }))
        .with_warnings(request.analytics.capacity_warnings())
}

fn supplier_reliability(request: &AgentRequest<'_>) -> RuleOutcome {
    let a = request.analytics;
    if let Some(mention) = request.classification.first(EntityType::Supplier) {
        let name = display_name(request, &mention.id);
        return match a.supplier_reliability(&mention.id) {
            Ok(score) => RuleOutcome::new(
                "supplier_score",
                format!("{} has a reliability score of {:.2}.", name, score),
                0.9,
            )
            .observed(format!("read reliabilityScore of {}", mention.id))
            .tracking(format!("reliability:{}", mention.id), score)
            .with_data(json!({ "supplierId": mention.id, "reliabilityScore": score })),
            Err(e) => RuleOutcome::new(
                "supplier_score",
                format!("{} has no reliability score on record.", name),
                0.5,
            )
            .observed(e.to_string()),
        };
    }

    let scores = a.supplier_scores();
    let mean = if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|s| s.reliability).sum::<f64>() / scores.len() as f64
    };
    let listing: Vec<String> = scores
        .iter()
        .map(|s| format!("{} ({:.2})", s.name, s.reliability))
        .collect();
    let answer = if listing.is_empty() {
        "No supplier has a reliability score on record.".to_string()
    } else {
        format!(
            "Suppliers by reliability: {}. Average score {:.2}.",
            listing.join(", "),
            mean
        )
    };
    RuleOutcome::new("rank_suppliers", answer, 0.7)
        .observed(format!("ranked {} suppliers", scores.len()))
        .tracking("reliability:suppliers", mean)
        .with_data(json!({ "suppliers": scores }))
}

fn order_status(request: &AgentRequest<'_>) -> RuleOutcome {
    if let Some(mention) = request.classification.first(EntityType::Order) {
        if let Ok(order) = request.store.get_entity(&mention.id) {
            let status = order.text(attrs::STATUS).unwrap_or("unknown");
            let mut answer = format!("Order {} is {}.", order.id, status.replace('_', " "));
            if let Some(date) = order.text(attrs::REQUESTED_DELIVERY_DATE) {
                answer.push_str(&format!(" Requested delivery: {}.", date));
            }
            return RuleOutcome::new("order_lookup", answer, 0.9)
                .observed(format!("read status of {}", order.id))
                .with_data(json!({
                    "orderId": order.id,
                    "status": status,
                    "totalValue": order.attr(attrs::TOTAL_VALUE),
                }));
        }
    }

    let mut breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for order in request.store.list_entities(EntityType::Order, None) {
        let status = order.text(attrs::STATUS).unwrap_or("unknown").to_string();
        *breakdown.entry(status).or_insert(0) += 1;
    }
    let completion = request.analytics.order_completion_rate(None);
    let total: usize = breakdown.values().sum();
    let parts: Vec<String> = breakdown.iter().map(|(s, n)| format!("{} {}", n, s)).collect();
    RuleOutcome::new(
        "order_breakdown",
        format!(
            "{} orders: {}. Completion rate {:.1}%.",
            total,
            if parts.is_empty() { "none".to_string() } else { parts.join(", ") },
            completion * 100.0
        ),
        0.85,
    )
    .observed(format!("grouped {} orders by status", total))
    .tracking("orders:completion", completion)
    .with_data(json!({ "byStatus": breakdown, "completionRate": completion }))
}

fn optimization_fallback(request: &AgentRequest<'_>) -> RuleOutcome {
    let exceptions = request.analytics.inventory_exceptions();
    let over = exceptions.iter().filter(|e| e.kind == ExceptionKind::Overstock).count();
    let under = exceptions.len() - over;
    RuleOutcome::new(
        "report_exceptions",
        format!(
            "I can only report, not plan: {} inventory exceptions ({} overstocked, {} understocked).",
            exceptions.len(),
            over,
            under
        ),
        0.5,
    )
    .observed("counted inventory exceptions as a fallback")
    .tracking("inventory:exceptions", exceptions.len() as f64)
    .with_data(json!({ "exceptions": exceptions }))
}

fn totals(records: &[&Entity]) -> (f64, f64) {
    records.iter().fold((0.0, 0.0), |(a, r), inv| {
        (
            a + inv.number(attrs::QUANTITY_AVAILABLE).unwrap_or(0.0),
            r + inv.number(attrs::QUANTITY_RESERVED).unwrap_or(0.0),
        )
    })
}

fn inventory_row(inv: &Entity) -> Value {
    json!({
        "inventoryId": inv.id,
        "productId": inv.attr(attrs::PRODUCT_ID),
        "quantityAvailable": inv.number(attrs::QUANTITY_AVAILABLE).unwrap_or(0.0),
        "quantityReserved": inv.number(attrs::QUANTITY_RESERVED).unwrap_or(0.0),
    })
}

fn display_name(request: &AgentRequest<'_>, id: &EntityId) -> String {
    request
        .store
        .get_entity(id)
        .map(|e| e.display_name().to_string())
        .unwrap_or_else(|_| id.to_string())
}

/// Whole quantities print without decimals.
pub fn fmt_qty(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{:.2}", x)
    }
}
