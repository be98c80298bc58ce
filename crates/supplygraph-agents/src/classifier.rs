//! Query classifier - maps free text to an intent plus entity mentions.
//!
//! Classification is a fixed, ordered rule table. Each rule pairs an intent
//! with a matcher; the first matching rule wins, so table order is the
//! tie-breaker. Anything unmatched is `Unknown`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use supplygraph_core::store::OntologyStore;
use supplygraph_core::types::{EntityId, EntityType};
use tracing::{debug, warn};

/// What a query is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    InventoryLookup,
    LocationInfo,
    PerformanceSummary,
    UtilizationRanking,
    SupplierReliability,
    OrderStatus,
    OptimizationRequest,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::InventoryLookup => "inventory_lookup",
            Intent::LocationInfo => "location_info",
            Intent::PerformanceSummary => "performance_summary",
            Intent::UtilizationRanking => "utilization_ranking",
            Intent::SupplierReliability => "supplier_reliability",
            Intent::OrderStatus => "order_status",
            Intent::OptimizationRequest => "optimization_request",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule recognises its intent.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Every word must appear as a whole word.
    Keywords(Vec<&'static str>),
    /// Regex over the lowercased query.
    Pattern(Regex),
}

impl Matcher {
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Matcher::Keywords(words) => words.iter().all(|w| contains_phrase(lowered, w)),
            Matcher::Pattern(re) => re.is_match(lowered),
        }
    }

    fn describe(&self) -> String {
        match self {
            Matcher::Keywords(words) => format!("keywords [{}]", words.join(", ")),
            Matcher::Pattern(re) => format!("pattern /{}/", re.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub intent: Intent,
    pub matcher: Matcher,
}

/// An entity named in the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// The text that matched: the entity's name or its id.
    pub matched: String,
}

/// Classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub mentions: Vec<Mention>,
    /// Description of the rule that fired, if any.
    pub matched_rule: Option<String>,
}

impl Classification {
    /// First mentioned entity of a type.
    pub fn first(&self, entity_type: EntityType) -> Option<&Mention> {
        self.mentions.iter().find(|m| m.entity_type == entity_type)
    }

    pub fn all(&self, entity_type: EntityType) -> impl Iterator<Item = &Mention> {
        self.mentions.iter().filter(move |m| m.entity_type == entity_type)
    }
}

enum Cue {
    Words(&'static [&'static str]),
    Regex(&'static str),
}

use Cue::{Regex as Re, Words};

/// The rule table, in evaluation order.
const RULES: &[(Intent, &[Cue])] = &[
    (
        Intent::OptimizationRequest,
        &[Re(r"optimi[sz]"), Re(r"recommend"), Re(r"what should"), Re(r"reduc\w*\s+costs?"), Words(&["improve"])],
    ),
    (
        Intent::UtilizationRanking,
        &[
            Re(r"(highest|lowest|most|least|top|rank).*(utiliz|capacity|full)"),
            Re(r"utiliz.*(rank|by location)"),
        ],
    ),
    (
        Intent::InventoryLookup,
        &[
            Re(r"how many.*(items|units|products)"),
            Re(r"inventory.*level"),
            Re(r"stock.*level"),
            Re(r"quantity.*available"),
            Re(r"\bitems\b.*\bin\b"),
            Re(r"\bproducts\b.*\bat\b"),
            Words(&["inventory"]),
            Words(&["stock"]),
        ],
    ),
    (
        Intent::OrderStatus,
        &[
            Re(r"order.*status"),
            Re(r"track.*order"),
            Re(r"delivery.*status"),
            Re(r"shipment.*status"),
            Re(r"when.*arrive"),
            Words(&["orders"]),
            Words(&["order"]),
        ],
    ),
    (
        Intent::SupplierReliability,
        &[Re(r"who.*supplies"), Re(r"supplier"), Re(r"vendor"), Re(r"reliab")],
    ),
    (
        Intent::LocationInfo,
        &[
            Re(r"where.*located"),
            Re(r"which.*location"),
            Re(r"find.*location"),
            Re(r"address.*of"),
            Re(r"coordinates.*of"),
            Re(r"capacity.*of"),
            Re(r"tell.*about"),
        ],
    ),
    (
        Intent::PerformanceSummary,
        &[Re(r"perform"), Re(r"efficien"), Re(r"throughput"), Re(r"kpi"), Re(r"health"), Re(r"utiliz")],
    ),
];

/// Ordered intent rules plus mention extraction.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    rules: Vec<Rule>,
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClassifier {
    /// Compile the built-in rule table.
    pub fn new() -> Self {
        let mut rules = Vec::new();
        for (intent, cues) in RULES {
            for cue in cues.iter() {
                let matcher = match cue {
                    Words(words) => Matcher::Keywords(words.to_vec()),
                    Re(pattern) => match Regex::new(pattern) {
                        Ok(re) => Matcher::Pattern(re),
                        Err(e) => {
                            warn!(%pattern, error = %e, "skipping invalid intent pattern");
                            continue;
                        }
                    },
                };
                rules.push(Rule { intent: *intent, matcher });
            }
        }
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Intent of a query, without mention extraction.
    pub fn intent_of(&self, query: &str) -> (Intent, Option<&Rule>) {
        let lowered = query.trim().to_lowercase();
        if lowered.is_empty() {
            return (Intent::Unknown, None);
        }
        self.rules
            .iter()
            .find(|r| r.matcher.matches(&lowered))
            .map_or((Intent::Unknown, None), |r| (r.intent, Some(r)))
    }

    /// Classify a query and extract every known entity it names.
    pub fn classify(&self, query: &str, store: &dyn OntologyStore) -> Classification {
        let (intent, rule) = self.intent_of(query);
        let mentions = extract_mentions(query, store);
        let matched_rule = rule.map(|r| r.matcher.describe());
        debug!(%intent, mentions = mentions.len(), rule = ?matched_rule, "classified query");
        Classification {
            intent,
            mentions,
            matched_rule,
        }
    }
}

/// Entities whose name or id appears in the query as a whole phrase.
pub fn extract_mentions(query: &str, store: &dyn OntologyStore) -> Vec<Mention> {
    let lowered = query.to_lowercase();
    if lowered.trim().is_empty() {
        return Vec::new();
    }
    store
        .entities()
        .into_iter()
        .filter_map(|e| {
            let by_name = e.name().filter(|n| contains_phrase(&lowered, &n.to_lowercase()));
            let matched = by_name.or_else(|| {
                contains_phrase(&lowered, &e.id.as_str().to_lowercase()).then_some(e.id.as_str())
            })?;
            Some(Mention {
                id: e.id.clone(),
                entity_type: e.entity_type,
                matched: matched.to_string(),
            })
        })
        .collect()
}

/// Whether `needle` occurs in `haystack` bounded by non-alphanumeric
/// characters (or the ends of the string).
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplygraph_core::attrs;
    use supplygraph_core::types::Entity;
    use supplygraph_runtime::graph_impl::OntologyGraph;

    fn classify(q: &str) -> Intent {
        QueryClassifier::new().intent_of(q).0
    }

    #[test]
    fn every_pattern_compiles() {
        let expected: usize = RULES.iter().map(|(_, cues)| cues.len()).sum();
        assert_eq!(QueryClassifier::new().rules().len(), expected);
    }

    #[test]
    fn intents_from_typical_questions() {
        assert_eq!(classify("How many items are in L1"), Intent::InventoryLookup);
        assert_eq!(classify("Which location has the highest utilization?"), Intent::UtilizationRanking);
        assert_eq!(classify("What is the status of order O-17?"), Intent::OrderStatus);
        assert_eq!(classify("Who supplies widgets?"), Intent::SupplierReliability);
        assert_eq!(classify("Where is the Dallas hub located"), Intent::LocationInfo);
        assert_eq!(classify("How is the network performing?"), Intent::PerformanceSummary);
        assert_eq!(classify("What should we do to cut costs?"), Intent::OptimizationRequest);
    }

    #[test]
    fn table_order_breaks_ties() {
        // Matches both the optimization and inventory rules.
        assert_eq!(classify("Optimize inventory levels"), Intent::OptimizationRequest);
        // Matches both ranking and the generic utilization rule.
        assert_eq!(classify("Rank sites by utilization"), Intent::UtilizationRanking);
    }

    #[test]
    fn unmatched_and_empty_queries_are_unknown() {
        assert_eq!(classify("hello there"), Intent::Unknown);
        assert_eq!(classify("   "), Intent::Unknown);
        // "restocking" must not match the whole-word "stock" keyword
        assert_eq!(classify("restocking"), Intent::Unknown);
        // item/product cues need whole words
        assert_eq!(classify("itemsXinY"), Intent::Unknown);
        assert_eq!(classify("byproducts data"), Intent::Unknown);
        assert_eq!(classify("Which items are in Dallas?"), Intent::InventoryLookup);
    }

    #[test]
    fn mentions_match_whole_names_and_ids() {
        let mut g = OntologyGraph::new();
        g.add_entity(Entity::new("L1", EntityType::Location).with_attr(attrs::NAME, "Dallas Hub"))
            .unwrap();
        g.add_entity(Entity::new("L10", EntityType::Location)).unwrap();
        g.add_entity(Entity::new("P1", EntityType::Product).with_attr(attrs::NAME, "Milk"))
            .unwrap();

        let c = QueryClassifier::new().classify("How many units of milk at dallas hub?", &g);
        assert_eq!(c.intent, Intent::InventoryLookup);
        let ids: Vec<&str> = c.mentions.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["L1", "P1"]);
        assert_eq!(c.first(EntityType::Location).unwrap().matched, "Dallas Hub");

        let c = QueryClassifier::new().classify("stock in L10", &g);
        let ids: Vec<&str> = c.mentions.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["L10"]);
    }

    #[test]
    fn phrase_boundaries() {
        assert!(contains_phrase("items in l1?", "l1"));
        assert!(!contains_phrase("items in l10", "l1"));
        assert!(!contains_phrase("anything", ""));
    }
}
