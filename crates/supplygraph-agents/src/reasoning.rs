//! Reasoning traces and query results.

use crate::agent::AgentKind;
use crate::classifier::{Intent, Mention};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use supplygraph_core::types::CapacityWarning;

/// One step of a justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// 1-based position in the trace.
    pub step: usize,
    pub description: String,
    pub action: String,
    pub observation: String,
    /// Always in [0, 1].
    pub confidence: f64,
}

/// Ordered list of trace steps under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step; confidence is clamped to [0, 1].
    pub fn push(
        &mut self,
        description: impl Into<String>,
        action: impl Into<String>,
        observation: impl Into<String>,
        confidence: f64,
    ) -> &mut Self {
        self.steps.push(TraceStep {
            step: self.steps.len() + 1,
            description: description.into(),
            action: action.into(),
            observation: observation.into(),
            confidence: clamp_unit(confidence),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Mean step confidence, 0 for an empty trace.
    pub fn mean_confidence(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.steps.iter().map(|s| s.confidence).sum::<f64>() / self.steps.len() as f64
    }

    pub fn into_steps(self) -> Vec<TraceStep> {
        self.steps
    }
}

/// What a strategy produces before timing and classification are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Reasoning {
    pub answer: String,
    pub trace: Trace,
    pub overall_confidence: f64,
    pub data: Value,
    pub warnings: Vec<CapacityWarning>,
}

impl Reasoning {
    /// Overall confidence is the mean of the steps.
    pub fn from_trace(answer: impl Into<String>, trace: Trace, data: Value) -> Self {
        let overall_confidence = trace.mean_confidence();
        Self {
            answer: answer.into(),
            trace,
            overall_confidence,
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.overall_confidence = clamp_unit(confidence);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<CapacityWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Full answer to one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub agent: AgentKind,
    pub intent: Intent,
    pub answer: String,
    pub trace: Vec<TraceStep>,
    pub overall_confidence: f64,
    /// Wall time spent answering; not part of the deterministic output.
    pub elapsed_ms: f64,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CapacityWarning>,
    #[serde(default)]
    pub data: Value,
}

pub(crate) fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
