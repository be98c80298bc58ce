//! Model-based agent - reflex rules plus a session world model.
//!
//! Before answering, the agent consults the session's context for the
//! metric the rule tracks. The answer step's confidence moves by
//! [`CORROBORATION_DELTA`] depending on whether the new value keeps the
//! recorded trend. Without a session the agent reasons against an empty,
//! throwaway context.

use crate::agent::{Agent, AgentKind, AgentRequest};
use crate::classifier::Intent;
use crate::context::{SessionContext, Trend};
use crate::reasoning::{clamp_unit, Reasoning, Trace};
use crate::rules;

pub const CORROBORATION_DELTA: f64 = 0.1;
const PRIOR_CONTEXT_CONFIDENCE: f64 = 0.8;
const NO_CONTEXT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelBasedAgent;

impl Agent for ModelBasedAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::ModelBased
    }

    fn uses_session(&self) -> bool {
        true
    }

    fn reason(&self, request: &AgentRequest<'_>, session: Option<&mut SessionContext>) -> Reasoning {
        let mut scratch;
        let session = match session {
            Some(s) => s,
            None => {
                scratch = SessionContext::default();
                &mut scratch
            }
        };

        let intent = request.classification.intent;
        let outcome = rules::fire(request);

        if intent == Intent::Unknown {
            session.record(request.query, intent, None, None);
            let mut trace = Trace::new();
            trace.push("Match the query against known rules", outcome.rule, outcome.observation, outcome.confidence);
            return Reasoning::from_trace(outcome.answer, trace, outcome.data);
        }

        let prior = outcome
            .subject
            .as_deref()
            .and_then(|subject| session.observation(subject))
            .copied();

        let mut trace = Trace::new();
        let (context_observation, context_confidence) = match (&outcome.subject, prior) {
            (Some(subject), Some(obs)) => (
                format!(
                    "{} was {} ({}, seen {} times); {} of the last {} queries asked about {}",
                    subject,
                    rules::fmt_qty(obs.value),
                    obs.trend.as_str(),
                    obs.count,
                    session.intent_count(intent),
                    session.len(),
                    intent
                ),
                PRIOR_CONTEXT_CONFIDENCE,
            ),
            (Some(subject), None) => (
                format!("no prior observation of {}; {} queries in context", subject, session.len()),
                NO_CONTEXT_CONFIDENCE,
            ),
            (None, _) => (
                format!("nothing to track for this rule; {} queries in context", session.len()),
                NO_CONTEXT_CONFIDENCE,
            ),
        };
        trace.push("Consult session context", "read_context", context_observation, context_confidence);

        let mut answer_confidence = outcome.confidence;
        let mut answer = outcome.answer;
        let mut answer_observation = outcome.observation;
        if let (Some(obs), Some(value)) = (prior, outcome.metric) {
            let direction = Trend::between(obs.value, value);
            if direction == obs.trend {
                answer_confidence += CORROBORATION_DELTA;
                answer_observation.push_str(&format!("; {} trend corroborated", direction.as_str()));
            } else {
                answer_confidence -= CORROBORATION_DELTA;
                answer_observation.push_str(&format!(
                    "; now {} against a {} trend",
                    direction.as_str(),
                    obs.trend.as_str()
                ));
                answer.push_str(&format!(
                    " This is {} compared with the previous {} in this session.",
                    match direction {
                        Trend::Rising => "up",
                        Trend::Falling => "down",
                        Trend::Flat => "unchanged",
                    },
                    rules::fmt_qty(obs.value)
                ));
            }
        }
        trace.push(
            format!("Apply the {} rule in context", intent),
            outcome.rule,
            answer_observation,
            clamp_unit(answer_confidence),
        );

        session.record(request.query, intent, outcome.subject.as_deref(), outcome.metric);

        Reasoning::from_trace(answer, trace, outcome.data).with_warnings(outcome.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::run_query;
    use crate::classifier::QueryClassifier;
    use supplygraph_core::prelude::*;
    use supplygraph_runtime::analytics::AnalyticsEngine;
    use supplygraph_runtime::graph_impl::OntologyGraph;

    fn stocked(qty: f64) -> OntologyGraph {
        let mut g = OntologyGraph::new();
        g.add_entity(Entity::new("L1", EntityType::Location).with_attr(attrs::CAPACITY, 100.0))
            .unwrap();
        g.add_entity(
            Entity::new("INV1", EntityType::Inventory)
                .with_attr(attrs::LOCATION_ID, "L1")
                .with_attr(attrs::QUANTITY_AVAILABLE, qty),
        )
        .unwrap();
        g
    }

    fn ask(g: &OntologyGraph, session: &mut SessionContext) -> f64 {
        let analytics = AnalyticsEngine::new(g);
        run_query(
            &ModelBasedAgent,
            &QueryClassifier::new(),
            "How many items are in L1",
            &analytics,
            Some(session),
        )
        .overall_confidence
    }

    #[test]
    fn first_query_has_no_context() {
        let g = stocked(60.0);
        let mut session = SessionContext::default();
        // mean of 0.5 (no context) and 0.9 (rule)
        assert!((ask(&g, &mut session) - 0.7).abs() < 1e-9);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn corroboration_raises_and_contradiction_lowers() {
        let g = stocked(60.0);
        let mut session = SessionContext::default();
        ask(&g, &mut session);

        // Same value again: flat matches flat.
        let corroborated = ask(&g, &mut session);
        assert!((corroborated - (0.8 + 1.0) / 2.0).abs() < 1e-9);

        // Value rises against the flat trend.
        let contradicted = ask(&stocked(75.0), &mut session);
        assert!((contradicted - (0.8 + 0.8) / 2.0).abs() < 1e-9);
        assert!(contradicted < corroborated);
    }

    #[test]
    fn unknown_still_lands_in_history() {
        let g = stocked(60.0);
        let analytics = AnalyticsEngine::new(&g);
        let mut session = SessionContext::default();
        let result = run_query(
            &ModelBasedAgent,
            &QueryClassifier::new(),
            "hello there",
            &analytics,
            Some(&mut session),
        );

        assert_eq!(result.trace.len(), 1);
        assert!(result.overall_confidence <= 0.3);
        assert_eq!(session.len(), 1);
    }
}
