//! Goal-based agent - scores candidate actions against an objective.
//!
//! Each intent maps to an objective carrying a fixed weight vector over
//! (need, coverage, impact) and a relevance per candidate action. Every
//! candidate derives its need from the analytics engine, is scored, and
//! appears as its own trace step before the final recommendation.

use crate::agent::{Agent, AgentKind, AgentRequest};
use crate::classifier::Intent;
use crate::context::SessionContext;
use crate::reasoning::{Reasoning, Trace};
use crate::rules;
use serde::{Deserialize, Serialize};
use serde_json::json;
use supplygraph_core::types::EntityType;
use supplygraph_runtime::analytics::{AnalyticsEngine, ExceptionKind};

/// Candidates scoring at least this much are recommended alongside the winner.
pub const SELECTION_THRESHOLD: f64 = 0.5;

const LOW_RELIABILITY: f64 = 0.8;
const OVERLOADED: f64 = 0.9;
const UNDERUSED: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Balanced,
    OptimizeInventory,
    MaximizeUtilization,
    ImproveDelivery,
    ReduceCosts,
}

/// Weights over (need, coverage, impact).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub need: f64,
    pub coverage: f64,
    pub impact: f64,
}

impl Objective {
    pub fn for_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::OptimizationRequest | Intent::PerformanceSummary => Some(Objective::Balanced),
            Intent::InventoryLookup => Some(Objective::OptimizeInventory),
            Intent::UtilizationRanking | Intent::LocationInfo => Some(Objective::MaximizeUtilization),
            Intent::OrderStatus => Some(Objective::ImproveDelivery),
            Intent::SupplierReliability => Some(Objective::ReduceCosts),
            Intent::Unknown => None,
        }
    }

    pub fn weights(&self) -> Weights {
        let (need, coverage, impact) = match self {
            Objective::Balanced => (0.5, 0.2, 0.3),
            Objective::OptimizeInventory => (0.6, 0.2, 0.2),
            Objective::MaximizeUtilization => (0.6, 0.1, 0.3),
            Objective::ImproveDelivery => (0.6, 0.2, 0.2),
            Objective::ReduceCosts => (0.5, 0.2, 0.3),
        };
        Weights { need, coverage, impact }
    }

    /// How strongly an action serves this objective, in [0, 1].
    pub fn relevance(&self, action: CandidateAction) -> f64 {
        use CandidateAction::*;
        match (self, action) {
            (Objective::Balanced, _) => 1.0,

            (Objective::OptimizeInventory, IncreaseSafetyStock | ReduceOverstock) => 1.0,
            (Objective::OptimizeInventory, RebalanceCapacity) => 0.6,
            (Objective::OptimizeInventory, ReviewSuppliers) => 0.5,
            (Objective::OptimizeInventory, RerouteShipments) => 0.4,

            (Objective::MaximizeUtilization, RebalanceCapacity) => 1.0,
            (Objective::MaximizeUtilization, ReduceOverstock) => 0.7,
            (Objective::MaximizeUtilization, RerouteShipments) => 0.5,
            (Objective::MaximizeUtilization, IncreaseSafetyStock) => 0.4,
            (Objective::MaximizeUtilization, ReviewSuppliers) => 0.3,

            (Objective::ImproveDelivery, RerouteShipments) => 1.0,
            (Objective::ImproveDelivery, ReviewSuppliers) => 0.7,
            (Objective::ImproveDelivery, IncreaseSafetyStock | RebalanceCapacity) => 0.5,
            (Objective::ImproveDelivery, ReduceOverstock) => 0.3,

            (Objective::ReduceCosts, ReviewSuppliers) => 1.0,
            (Objective::ReduceCosts, ReduceOverstock) => 0.9,
            (Objective::ReduceCosts, RebalanceCapacity) => 0.6,
            (Objective::ReduceCosts, RerouteShipments) => 0.5,
            (Objective::ReduceCosts, IncreaseSafetyStock) => 0.4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::Balanced => "balanced",
            Objective::OptimizeInventory => "optimize_inventory",
            Objective::MaximizeUtilization => "maximize_utilization",
            Objective::ImproveDelivery => "improve_delivery",
            Objective::ReduceCosts => "reduce_costs",
        }
    }
}

/// Actions the agent can recommend, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateAction {
    IncreaseSafetyStock,
    ReduceOverstock,
    RerouteShipments,
    RebalanceCapacity,
    ReviewSuppliers,
}

impl CandidateAction {
    pub const ALL: [CandidateAction; 5] = [
        CandidateAction::IncreaseSafetyStock,
        CandidateAction::ReduceOverstock,
        CandidateAction::RerouteShipments,
        CandidateAction::RebalanceCapacity,
        CandidateAction::ReviewSuppliers,
    ];

    /// Fixed prior on how much the action moves the network.
    pub fn impact(&self) -> f64 {
        match self {
            CandidateAction::IncreaseSafetyStock => 0.9,
            CandidateAction::ReduceOverstock => 0.7,
            CandidateAction::RerouteShipments => 0.8,
            CandidateAction::RebalanceCapacity => 0.7,
            CandidateAction::ReviewSuppliers => 0.6,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            CandidateAction::IncreaseSafetyStock => "increase safety stock for understocked items",
            CandidateAction::ReduceOverstock => "reduce overstocked inventory",
            CandidateAction::RerouteShipments => "reroute late or delayed shipments",
            CandidateAction::RebalanceCapacity => "rebalance load across over- and under-used locations",
            CandidateAction::ReviewSuppliers => "review low-reliability suppliers",
        }
    }

    /// (need, coverage, evidence) from analytics.
    fn assess(&self, analytics: &AnalyticsEngine<'_>) -> (f64, f64, String) {
        match self {
            CandidateAction::IncreaseSafetyStock | CandidateAction::ReduceOverstock => {
                let wanted = if *self == CandidateAction::IncreaseSafetyStock {
                    ExceptionKind::Understock
                } else {
                    ExceptionKind::Overstock
                };
                let assessable = analytics.assessable_inventory_count();
                let hits = analytics
                    .inventory_exceptions()
                    .into_iter()
                    .filter(|e| e.kind == wanted)
                    .count();
                share(hits, assessable, "inventory records")
            }
            CandidateAction::RerouteShipments => {
                let shipments = analytics.store().list_entities(EntityType::Shipment, None).len();
                if shipments == 0 {
                    return (0.0, 0.0, "no shipments to assess".to_string());
                }
                let late = if analytics.completed_shipment_count() > 0 {
                    1.0 - analytics.on_time_delivery_rate()
                } else {
                    0.0
                };
                let delayed = analytics.delayed_shipment_share();
                (
                    (late + delayed).min(1.0),
                    1.0,
                    format!("{:.0}% late on arrival, {:.0}% currently delayed", late * 100.0, delayed * 100.0),
                )
            }
            CandidateAction::RebalanceCapacity => {
                let ranked = analytics.rank_locations_by_utilization();
                let sized: Vec<_> = ranked.iter().filter(|l| l.capacity > 0.0).collect();
                let off = sized
                    .iter()
                    .filter(|l| l.utilization > OVERLOADED || l.utilization < UNDERUSED)
                    .count();
                share(off, sized.len(), "locations outside the 50-90% band")
            }
            CandidateAction::ReviewSuppliers => {
                let scores = analytics.supplier_scores();
                let weak = scores.iter().filter(|s| s.reliability < LOW_RELIABILITY).count();
                share(weak, scores.len(), "suppliers below 0.8 reliability")
            }
        }
    }
}

fn share(part: usize, whole: usize, what: &str) -> (f64, f64, String) {
    if whole == 0 {
        (0.0, 0.0, format!("no {} to assess", what))
    } else {
        (part as f64 / whole as f64, 1.0, format!("{} of {} {}", part, whole, what))
    }
}

/// One scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAction {
    pub action: CandidateAction,
    pub need: f64,
    pub coverage: f64,
    pub impact: f64,
    pub relevance: f64,
    pub score: f64,
    pub evidence: String,
}

/// Score every candidate against an objective, in declaration order.
pub fn score_candidates(objective: Objective, analytics: &AnalyticsEngine<'_>) -> Vec<ScoredAction> {
    let w = objective.weights();
    CandidateAction::ALL
        .iter()
        .map(|action| {
            let (need, coverage, evidence) = action.assess(analytics);
            let impact = action.impact();
            let relevance = objective.relevance(*action);
            let score = (relevance * (w.need * need + w.coverage * coverage + w.impact * impact)).clamp(0.0, 1.0);
            ScoredAction {
                action: *action,
                need,
                coverage,
                impact,
                relevance,
                score,
                evidence,
            }
        })
        .collect()
}

/// Highest score; the earliest candidate wins ties.
pub fn winner(scored: &[ScoredAction]) -> Option<&ScoredAction> {
    scored
        .iter()
        .fold(None, |best: Option<&ScoredAction>, c| match best {
            Some(b) if b.score >= c.score => Some(b),
            _ => Some(c),
        })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoalBasedAgent;

impl Agent for GoalBasedAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::GoalBased
    }

    fn reason(&self, request: &AgentRequest<'_>, _session: Option<&mut SessionContext>) -> Reasoning {
        let intent = request.classification.intent;
        let Some(objective) = Objective::for_intent(intent) else {
            let outcome = rules::no_match();
            let mut trace = Trace::new();
            trace.push("Derive an objective from the query", outcome.rule, outcome.observation, outcome.confidence);
            return Reasoning::from_trace(outcome.answer, trace, outcome.data);
        };

        let finding = rules::fire(request);
        let scored = score_candidates(objective, request.analytics);
        let mut trace = Trace::new();
        for c in &scored {
            trace.push(
                format!("Evaluate {:?} for {}", c.action, objective.as_str()),
                "score_candidate",
                format!(
                    "{}; need {:.2}, coverage {:.0}, impact {:.1}, relevance {:.1} -> score {:.2}",
                    c.evidence, c.need, c.coverage, c.impact, c.relevance, c.score
                ),
                c.score,
            );
        }

        let Some(best) = winner(&scored) else {
            return Reasoning::from_trace(finding.answer, trace, finding.data);
        };
        let selected: Vec<&ScoredAction> = scored
            .iter()
            .filter(|c| c.score >= SELECTION_THRESHOLD || c.action == best.action)
            .collect();
        let also: Vec<&str> = selected
            .iter()
            .filter(|c| c.action != best.action)
            .map(|c| c.action.describe())
            .collect();

        let mut answer = format!(
            "{} To {}, {} (score {:.2}).",
            finding.answer,
            objective.as_str().replace('_', " "),
            best.action.describe(),
            best.score
        );
        if !also.is_empty() {
            answer.push_str(&format!(" Also worthwhile: {}.", also.join("; ")));
        }

        trace.push(
            "Recommend the highest-scoring action set",
            "recommend",
            format!("selected {} of {} candidates", selected.len(), scored.len()),
            best.score,
        );

        let data = json!({
            "objective": objective,
            "weights": objective.weights(),
            "candidates": scored,
            "selected": selected.iter().map(|c| c.action).collect::<Vec<_>>(),
            "finding": finding.data,
        });
        Reasoning::from_trace(answer, trace, data)
            .with_confidence(best.score)
            .with_warnings(finding.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplygraph_core::prelude::*;
    use supplygraph_runtime::graph_impl::OntologyGraph;

    fn scored(action: CandidateAction, score: f64) -> ScoredAction {
        ScoredAction {
            action,
            need: 0.0,
            coverage: 0.0,
            impact: 0.0,
            relevance: 1.0,
            score,
            evidence: String::new(),
        }
    }

    #[test]
    fn weights_sum_to_one() {
        for objective in [
            Objective::Balanced,
            Objective::OptimizeInventory,
            Objective::MaximizeUtilization,
            Objective::ImproveDelivery,
            Objective::ReduceCosts,
        ] {
            let w = objective.weights();
            assert!((w.need + w.coverage + w.impact - 1.0).abs() < 1e-12, "{:?}", objective);
        }
    }

    #[test]
    fn ties_go_to_the_earlier_candidate() {
        let list = vec![
            scored(CandidateAction::IncreaseSafetyStock, 0.4),
            scored(CandidateAction::RerouteShipments, 0.7),
            scored(CandidateAction::ReviewSuppliers, 0.7),
        ];
        assert_eq!(winner(&list).unwrap().action, CandidateAction::RerouteShipments);
        assert!(winner(&[]).is_none());
    }

    #[test]
    fn empty_network_scores_priors_only() {
        let g = OntologyGraph::new();
        let analytics = AnalyticsEngine::new(&g);
        let scores = score_candidates(Objective::Balanced, &analytics);

        assert_eq!(scores.len(), 5);
        // no data: need 0, coverage 0, score = 0.3 × impact
        assert!((scores[0].score - 0.27).abs() < 1e-12);
        assert_eq!(winner(&scores).unwrap().action, CandidateAction::IncreaseSafetyStock);
    }

    #[test]
    fn understock_drives_safety_stock_recommendation() {
        let mut g = OntologyGraph::new();
        g.add_entity(Entity::new("P1", EntityType::Product).with_attr(attrs::SAFETY_STOCK_LEVEL, 100))
            .unwrap();
        g.add_entity(
            Entity::new("INV1", EntityType::Inventory)
                .with_attr(attrs::PRODUCT_ID, "P1")
                .with_attr(attrs::QUANTITY_AVAILABLE, 10),
        )
        .unwrap();
        let analytics = AnalyticsEngine::new(&g);
        let scores = score_candidates(Objective::OptimizeInventory, &analytics);

        // need 1.0 × 0.6 + coverage 1 × 0.2 + impact 0.9 × 0.2
        assert!((scores[0].score - 0.98).abs() < 1e-12);
        assert_eq!(winner(&scores).unwrap().action, CandidateAction::IncreaseSafetyStock);
    }

    #[test]
    fn each_objective_has_a_fully_relevant_action() {
        for objective in [
            Objective::OptimizeInventory,
            Objective::MaximizeUtilization,
            Objective::ImproveDelivery,
            Objective::ReduceCosts,
        ] {
            let top = CandidateAction::ALL
                .iter()
                .filter(|a| objective.relevance(**a) == 1.0)
                .count();
            assert!(top >= 1, "{:?}", objective);
            assert!(top < CandidateAction::ALL.len(), "{:?}", objective);
        }
    }
}
