//! Cover-crop goal rules
//!
//! A goal is a named conjunction of `field op threshold` predicates over soil
//! values. Classification keeps every goal whose predicates all hold; when no
//! goal matches fully, it widens to goals with at least one true predicate.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::{Deserialize, Serialize};

/// Comparison used by a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
}

impl Operator {
    pub fn apply(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::LessThan => value < threshold,
            Self::GreaterThan => value > threshold,
        }
    }
}

/// One `{key, op, value}` descriptor of the rule file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub key: String,
    pub op: Operator,
    pub value: f64,
}

impl Predicate {
    /// `None` when the field is absent from the soil values
    pub fn evaluate(&self, soil: &SoilValues) -> Option<bool> {
        soil.get(&self.key).map(|v| self.op.apply(v, self.value))
    }
}

/// Named soil values addressed by predicate keys (N, P, K, sand, silt, clay, ...)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoilValues(BTreeMap<String, f64>);

impl SoilValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// The six values used by the cover-crop goal rules
    pub fn nutrients_and_texture(n: f64, p: f64, k: f64, sand: f64, silt: f64, clay: f64) -> Self {
        Self::new()
            .with("N", n)
            .with("P", p)
            .with("K", k)
            .with("sand", sand)
            .with("silt", silt)
            .with("clay", clay)
    }
}

/// Goal name to predicate list, as stored in the rule file
pub type GoalRules = BTreeMap<String, Vec<Predicate>>;

/// Two-pass goal classifier
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    goals: GoalRules,
}

impl RuleEngine {
    pub fn new(goals: GoalRules) -> Self {
        Self { goals }
    }

    /// Parse the JSON rule file format
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn goals(&self) -> impl Iterator<Item = &str> {
        self.goals.keys().map(String::as_str)
    }

    pub fn classify(&self, soil: &SoilValues) -> BTreeSet<String> {
        // Predicates on fields we were not given are skipped
        let strict: BTreeSet<String> = self
            .goals
            .iter()
            .filter(|(_, preds)| preds.iter().all(|p| p.evaluate(soil).unwrap_or(true)))
            .map(|(goal, _)| goal.clone())
            .collect();

        if !strict.is_empty() {
            debug!("classify: {} goals matched all predicates", strict.len());
            return strict;
        }

        let loose: BTreeSet<String> = self
            .goals
            .iter()
            .filter(|(_, preds)| preds.iter().any(|p| p.evaluate(soil) == Some(true)))
            .map(|(goal, _)| goal.clone())
            .collect();
        debug!("classify: no full match, {} goals with a true predicate", loose.len());
        loose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RuleEngine {
        RuleEngine::from_json(
            r#"{
                "A": [{"key": "N", "op": "<", "value": 50}, {"key": "sand", "op": ">", "value": 60}],
                "B": [{"key": "N", "op": ">", "value": 100}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_full_match() {
        let soil = SoilValues::new().with("N", 30.0).with("sand", 70.0);
        let goals = engine().classify(&soil);
        assert_eq!(goals.into_iter().collect::<Vec<_>>(), vec!["A".to_string()]);
    }

    #[test]
    fn test_fallback_counts_single_predicates() {
        let soil = SoilValues::new().with("N", 30.0).with("sand", 10.0);
        let goals = engine().classify(&soil);
        assert_eq!(goals.into_iter().collect::<Vec<_>>(), vec!["A".to_string()]);
    }

    #[test]
    fn test_nothing_satisfiable_is_empty() {
        let soil = SoilValues::new().with("N", 75.0).with("sand", 10.0);
        assert!(engine().classify(&soil).is_empty());
    }

    #[test]
    fn test_absent_fields_are_ignored_in_strict_pass() {
        // sand missing: A reduces to N < 50
        let soil = SoilValues::new().with("N", 30.0);
        let goals = engine().classify(&soil);
        assert!(goals.contains("A"));
        assert!(!goals.contains("B"));
    }

    #[test]
    fn test_operator_is_strict() {
        assert!(!Operator::LessThan.apply(50.0, 50.0));
        assert!(!Operator::GreaterThan.apply(50.0, 50.0));
        assert!(Operator::GreaterThan.apply(50.1, 50.0));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let err = RuleEngine::from_json(r#"{"A": [{"key": "N", "op": ">=", "value": 1}]}"#);
        assert!(err.is_err());
    }
}
