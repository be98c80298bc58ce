//! Simple reflex agent - stateless condition → action.
//!
//! Fires exactly one rule per query and reports it as a single trace step.
//! Confidence is fixed per rule.

use crate::agent::{Agent, AgentKind, AgentRequest};
use crate::context::SessionContext;
use crate::reasoning::{Reasoning, Trace};
use crate::rules;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleReflexAgent;

impl Agent for SimpleReflexAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::SimpleReflex
    }

    fn reason(&self, request: &AgentRequest<'_>, _session: Option<&mut SessionContext>) -> Reasoning {
        let outcome = rules::fire(request);
        let mut trace = Trace::new();
        trace.push(
            format!("Apply the {} rule", request.classification.intent),
            outcome.rule,
            outcome.observation.clone(),
            outcome.confidence,
        );
        Reasoning::from_trace(outcome.answer, trace, outcome.data).with_warnings(outcome.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::run_query;
    use crate::classifier::{Intent, QueryClassifier};
    use supplygraph_core::prelude::*;
    use supplygraph_runtime::analytics::AnalyticsEngine;
    use supplygraph_runtime::graph_impl::OntologyGraph;

    fn warehouse_with_stock() -> OntologyGraph {
        let mut g = OntologyGraph::new();
        g.add_entity(Entity::new("L1", EntityType::Location).with_attr(attrs::CAPACITY, 100.0))
            .unwrap();
        g.add_entity(
            Entity::new("INV1", EntityType::Inventory)
                .with_attr(attrs::LOCATION_ID, "L1")
                .with_attr(attrs::QUANTITY_AVAILABLE, 60),
        )
        .unwrap();
        g
    }

    #[test]
    fn inventory_question_fires_one_rule() {
        let g = warehouse_with_stock();
        let analytics = AnalyticsEngine::new(&g);
        let result = run_query(
            &SimpleReflexAgent,
            &QueryClassifier::new(),
            "How many items are in L1",
            &analytics,
            None,
        );

        assert_eq!(result.intent, Intent::InventoryLookup);
        assert_eq!(result.trace.len(), 1);
        assert!(result.overall_confidence >= 0.8);
        assert!(result.answer.contains("60"), "answer was {:?}", result.answer);
    }

    #[test]
    fn unknown_query_is_low_confidence() {
        let g = warehouse_with_stock();
        let analytics = AnalyticsEngine::new(&g);
        let result = run_query(&SimpleReflexAgent, &QueryClassifier::new(), "hello there", &analytics, None);

        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.trace.len(), 1);
        assert!(result.overall_confidence <= 0.3);
    }
}
