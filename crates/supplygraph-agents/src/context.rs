//! Session world model for the model-based agent.
//!
//! A `SessionContext` remembers the last N queries of one session and the
//! most recent value of every tracked metric together with its direction of
//! change. It is created per session and dropped when the session ends.

use crate::classifier::Intent;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Default number of queries kept in a session's history.
pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

const TREND_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Flat,
}

impl Trend {
    /// Direction from `previous` to `current`.
    pub fn between(previous: f64, current: f64) -> Self {
        let delta = current - previous;
        if delta > TREND_EPSILON {
            Trend::Rising
        } else if delta < -TREND_EPSILON {
            Trend::Falling
        } else {
            Trend::Flat
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Flat => "flat",
        }
    }
}

/// Last value seen for a tracked subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub value: f64,
    pub trend: Trend,
    /// How many times the subject has been observed.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub intent: Intent,
    pub subject: Option<String>,
    pub metric: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    window: usize,
    history: VecDeque<HistoryEntry>,
    observations: BTreeMap<String, Observation>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

impl SessionContext {
    /// A window of zero is treated as one.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            history: VecDeque::with_capacity(window),
            observations: BTreeMap::new(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn observation(&self, subject: &str) -> Option<&Observation> {
        self.observations.get(subject)
    }

    /// How many remembered queries had this intent.
    pub fn intent_count(&self, intent: Intent) -> usize {
        self.history.iter().filter(|h| h.intent == intent).count()
    }

    /// Append a query to the history, evicting the oldest past the window,
    /// and update the subject's observation if a metric was produced.
    pub fn record(&mut self, query: &str, intent: Intent, subject: Option<&str>, metric: Option<f64>) {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            query: query.to_string(),
            intent,
            subject: subject.map(str::to_string),
            metric,
        });

        if let (Some(subject), Some(value)) = (subject, metric) {
            let updated = match self.observations.get(subject) {
                Some(prev) => Observation {
                    value,
                    trend: Trend::between(prev.value, value),
                    count: prev.count + 1,
                },
                None => Observation {
                    value,
                    trend: Trend::Flat,
                    count: 1,
                },
            };
            self.observations.insert(subject.to_string(), updated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded_by_window() {
        let mut ctx = SessionContext::new(3);
        for i in 0..5 {
            ctx.record(&format!("q{}", i), Intent::Unknown, None, None);
        }
        let queries: Vec<&str> = ctx.history().map(|h| h.query.as_str()).collect();
        assert_eq!(queries, vec!["q2", "q3", "q4"]);
    }

    #[test]
    fn first_observation_is_flat_then_tracks_direction() {
        let mut ctx = SessionContext::default();
        ctx.record("a", Intent::InventoryLookup, Some("inventory:L1"), Some(60.0));
        assert_eq!(ctx.observation("inventory:L1").unwrap().trend, Trend::Flat);

        ctx.record("b", Intent::InventoryLookup, Some("inventory:L1"), Some(45.0));
        let obs = ctx.observation("inventory:L1").unwrap();
        assert_eq!(obs.trend, Trend::Falling);
        assert_eq!(obs.value, 45.0);
        assert_eq!(obs.count, 2);
        assert_eq!(ctx.intent_count(Intent::InventoryLookup), 2);
    }

    #[test]
    fn zero_window_keeps_one_entry() {
        let mut ctx = SessionContext::new(0);
        ctx.record("a", Intent::Unknown, None, None);
        ctx.record("b", Intent::Unknown, None, None);
        assert_eq!(ctx.len(), 1);
    }
}
