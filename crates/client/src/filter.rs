//! Grid filter conditions over serialized records.
//!
//! Each condition names a top-level field of a JSON row and a typed predicate.
//! Text predicates compare case-insensitively; numeric predicates parse the
//! field as a decimal and never match non-numeric values.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The nine comparison operators offered by the filter dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operator", content = "value", rename_all = "camelCase")]
pub enum Predicate {
    Equals(String),
    NotEquals(String),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    GreaterThan(Decimal),
    LessThan(Decimal),
    GreaterThanOrEqual(Decimal),
    LessThanOrEqual(Decimal),
}

/// How a condition combines with everything before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub field: String,
    #[serde(flatten)]
    pub predicate: Predicate,
    #[serde(default)]
    pub logical_operator: LogicalOperator,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            field: field.into(),
            predicate,
            logical_operator: LogicalOperator::And,
        }
    }

    pub fn or(mut self) -> Self {
        self.logical_operator = LogicalOperator::Or;
        self
    }

    /// Evaluate against one row. A missing field never matches.
    pub fn matches(&self, row: &Value) -> bool {
        let Some(value) = row.get(&self.field) else {
            return false;
        };

        match &self.predicate {
            Predicate::Equals(expected) => text(value) == expected.to_lowercase(),
            Predicate::NotEquals(expected) => text(value) != expected.to_lowercase(),
            Predicate::Contains(needle) => text(value).contains(&needle.to_lowercase()),
            Predicate::StartsWith(prefix) => text(value).starts_with(&prefix.to_lowercase()),
            Predicate::EndsWith(suffix) => text(value).ends_with(&suffix.to_lowercase()),
            Predicate::GreaterThan(bound) => number(value).is_some_and(|n| n > *bound),
            Predicate::LessThan(bound) => number(value).is_some_and(|n| n < *bound),
            Predicate::GreaterThanOrEqual(bound) => number(value).is_some_and(|n| n >= *bound),
            Predicate::LessThanOrEqual(bound) => number(value).is_some_and(|n| n <= *bound),
        }
    }
}

/// Fold conditions left to right; the first condition's joiner is ignored.
/// An empty filter matches every row.
pub fn matches_all(conditions: &[FilterCondition], row: &Value) -> bool {
    let mut iter = conditions.iter();
    let Some(first) = iter.next() else {
        return true;
    };

    iter.fold(first.matches(row), |acc, condition| {
        match condition.logical_operator {
            LogicalOperator::And => acc && condition.matches(row),
            LogicalOperator::Or => acc || condition.matches(row),
        }
    })
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        Value::Null => String::new(),
        other => other.to_string().to_lowercase(),
    }
}

fn number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row() -> Value {
        json!({
            "invoiceNumber": "ACME1_20240401_101500",
            "buyer": "Acme Traders",
            "totalAmount": 212.4,
            "status": "draft"
        })
    }

    #[test]
    fn text_operators_ignore_case() {
        let row = row();
        assert!(FilterCondition::new("buyer", Predicate::Equals("acme traders".into())).matches(&row));
        assert!(FilterCondition::new("buyer", Predicate::Contains("TRADE".into())).matches(&row));
        assert!(FilterCondition::new("invoiceNumber", Predicate::StartsWith("acme1".into())).matches(&row));
        assert!(FilterCondition::new("invoiceNumber", Predicate::EndsWith("101500".into())).matches(&row));
        assert!(FilterCondition::new("status", Predicate::NotEquals("paid".into())).matches(&row));
    }

    #[test]
    fn numeric_operators() {
        let row = row();
        assert!(FilterCondition::new("totalAmount", Predicate::GreaterThan(dec!(200))).matches(&row));
        assert!(FilterCondition::new("totalAmount", Predicate::LessThanOrEqual(dec!(212.4))).matches(&row));
        assert!(!FilterCondition::new("totalAmount", Predicate::LessThan(dec!(212.4))).matches(&row));
        assert!(FilterCondition::new("totalAmount", Predicate::GreaterThanOrEqual(dec!(212.4))).matches(&row));
    }

    #[test]
    fn numeric_operators_skip_non_numbers_and_missing_fields() {
        let row = row();
        assert!(!FilterCondition::new("buyer", Predicate::GreaterThan(dec!(0))).matches(&row));
        assert!(!FilterCondition::new("dueDate", Predicate::NotEquals("x".into())).matches(&row));
    }

    #[test]
    fn conditions_fold_left_to_right() {
        let row = row();
        let miss = FilterCondition::new("status", Predicate::Equals("paid".into()));
        let hit = FilterCondition::new("buyer", Predicate::Contains("acme".into()));

        assert!(matches_all(&[], &row));
        assert!(!matches_all(&[miss.clone(), hit.clone()], &row));
        assert!(matches_all(&[miss.clone(), hit.clone().or()], &row));
        // The first condition's joiner is ignored; `miss` is AND-ed in.
        assert!(!matches_all(&[hit.clone().or(), miss], &row));
        assert!(matches_all(&[hit], &row));
    }

    #[test]
    fn deserializes_dialog_payload() {
        let conditions: Vec<FilterCondition> = serde_json::from_value(json!([
            { "field": "buyer", "operator": "contains", "value": "acme" },
            { "field": "totalAmount", "operator": "greaterThan", "value": 100, "logicalOperator": "OR" }
        ]))
        .unwrap();

        assert_eq!(conditions[0].predicate, Predicate::Contains("acme".into()));
        assert_eq!(conditions[0].logical_operator, LogicalOperator::And);
        assert_eq!(conditions[1].predicate, Predicate::GreaterThan(dec!(100)));
        assert_eq!(conditions[1].logical_operator, LogicalOperator::Or);
    }
}
