//! Condition evaluation against collection entries
//!
//! Fields are looked up on the entry value with dotted paths. Two names are
//! reserved: `_` is the entry value itself and `_key` its key.

use regex::Regex;
use tracing::trace;

use crate::collection::{Key, Value};
use crate::parser::{CompareOp, Condition, ConditionExpr, LogicalOp};

/// Resolve `path` against an entry
pub fn resolve_field(value: &Value, key: &Key, path: &str) -> Option<Value> {
    match path {
        "_" => return Some(value.clone()),
        "_key" => return Some(key.to_value()),
        _ => {}
    }

    let mut current = value;
    for segment in path.split('.') {
        current = current.field(&Key::from(segment))?;
    }
    Some(current.clone())
}

/// Evaluate a chain of conditions. `and` binds tighter than `or`.
pub fn evaluate(expr: &ConditionExpr, value: &Value, key: &Key) -> bool {
    let mut any_group = false;
    let mut group = true;

    for (op, condition) in expr.chain() {
        if op == Some(LogicalOp::Or) {
            any_group |= group;
            group = true;
        }
        group = group && matches_condition(condition, value, key);
    }

    any_group || group
}

fn matches_condition(condition: &Condition, value: &Value, key: &Key) -> bool {
    let Some(actual) = resolve_field(value, key, &condition.field) else {
        trace!(field = %condition.field, "condition field missing");
        return false;
    };
    let expected = &condition.value;
    let op = &condition.operator;

    match op {
        CompareOp::Like | CompareOp::Matches => {
            compare_strings(&actual.to_text(), &expected.to_text(), op)
        }
        CompareOp::Contains => match &actual {
            Value::Collection(items) => items.iter().any(|(_, v)| v == expected),
            _ => compare_strings(&actual.to_text(), &expected.to_text(), op),
        },
        _ => match (actual.as_f64(), expected) {
            (Some(left), Value::Int(_) | Value::Float(_)) => {
                compare_numbers(left, expected.as_f64().unwrap_or(0.0), op)
            }
            (_, Value::Str(right)) if !actual.is_collection() => {
                compare_strings(&actual.to_text(), right, op)
            }
            _ => match op {
                CompareOp::Equal => actual == *expected,
                CompareOp::NotEqual => actual != *expected,
                _ => false,
            },
        },
    }
}

fn compare_numbers(left: f64, right: f64, op: &CompareOp) -> bool {
    match op {
        CompareOp::Equal => (left - right).abs() < f64::EPSILON,
        CompareOp::NotEqual => (left - right).abs() >= f64::EPSILON,
        CompareOp::GreaterThan => left > right,
        CompareOp::GreaterThanOrEqual => left >= right,
        CompareOp::LessThan => left < right,
        CompareOp::LessThanOrEqual => left <= right,
        _ => false,
    }
}

fn compare_strings(left: &str, right: &str, op: &CompareOp) -> bool {
    match op {
        CompareOp::Equal => left == right,
        CompareOp::NotEqual => left != right,
        CompareOp::GreaterThan => left > right,
        CompareOp::GreaterThanOrEqual => left >= right,
        CompareOp::LessThan => left < right,
        CompareOp::LessThanOrEqual => left <= right,
        CompareOp::Like => {
            let pattern: Vec<String> = right.split('%').map(regex::escape).collect();
            Regex::new(&format!("^{}$", pattern.join(".*")))
                .map(|r| r.is_match(left))
                .unwrap_or(false)
        }
        CompareOp::Contains => left.contains(right),
        CompareOp::Matches => match Regex::new(right) {
            Ok(r) => r.is_match(left),
            Err(e) => {
                trace!(pattern = %right, error = %e, "invalid regex in condition");
                false
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_pipeline, Arg};

    fn condition(text: &str) -> ConditionExpr {
        let pipeline = parse_pipeline(&format!("filter({})", text)).unwrap();
        match pipeline.stages[0].args[0].clone() {
            Arg::Condition(expr) => expr,
            other => panic!("Expected condition, got {:?}", other),
        }
    }

    fn user() -> Value {
        Value::from(collection!{
            "name" => "ada",
            "age" => 36,
            "tags" => collection!["math", "code"],
            "address" => collection!{"city" => "London"}
        })
    }

    #[test]
    fn test_compare_numbers() {
        assert!(compare_numbers(10.0, 5.0, &CompareOp::GreaterThan));
        assert!(compare_numbers(5.0, 10.0, &CompareOp::LessThan));
        assert!(compare_numbers(5.0, 5.0, &CompareOp::Equal));
        assert!(!compare_numbers(5.0, 5.0, &CompareOp::Like));
    }

    #[test]
    fn test_compare_strings() {
        assert!(compare_strings("hello", "hello", &CompareOp::Equal));
        assert!(compare_strings("hello world", "world", &CompareOp::Contains));
        assert!(compare_strings("hello world", "hello%", &CompareOp::Like));
        assert!(!compare_strings("a.c", "abc", &CompareOp::Like));
        assert!(compare_strings("abc", "a.c", &CompareOp::Matches));
        assert!(!compare_strings("abc", "(", &CompareOp::Matches));
        assert!(compare_strings("b", "a", &CompareOp::GreaterThan));
    }

    #[test]
    fn test_resolve_field() {
        let key = Key::from(3u64);
        let value = user();
        assert_eq!(resolve_field(&value, &key, "name"), Some(Value::from("ada")));
        assert_eq!(resolve_field(&value, &key, "address.city"), Some(Value::from("London")));
        assert_eq!(resolve_field(&value, &key, "tags.1"), Some(Value::from("code")));
        assert_eq!(resolve_field(&value, &key, "_key"), Some(Value::from(3)));
        assert_eq!(resolve_field(&value, &key, "_"), Some(value.clone()));
        assert_eq!(resolve_field(&value, &key, "address.zip"), None);
        assert_eq!(resolve_field(&Value::from(1), &key, "name"), None);
    }

    #[test]
    fn test_evaluate_simple() {
        let key = Key::from(0u64);
        let value = user();
        assert!(evaluate(&condition("age > 30"), &value, &key));
        assert!(evaluate(&condition("age = 36.0"), &value, &key));
        assert!(evaluate(&condition("name = 'ada'"), &value, &key));
        assert!(evaluate(&condition("name like 'a%'"), &value, &key));
        assert!(evaluate(&condition("tags contains 'code'"), &value, &key));
        assert!(evaluate(&condition("address.city matches '^Lon'"), &value, &key));
        assert!(!evaluate(&condition("missing = 1"), &value, &key));
    }

    #[test]
    fn test_evaluate_precedence() {
        let key = Key::from(0u64);
        let value = user();
        // false and true or true
        assert!(evaluate(&condition("age < 10 and name = 'ada' or _key = 0"), &value, &key));
        // true or false and false
        assert!(evaluate(&condition("age > 10 or name = 'x' and age < 0"), &value, &key));
        // false or true and false
        assert!(!evaluate(&condition("age < 10 or name = 'ada' and age < 0"), &value, &key));
    }

    #[test]
    fn test_evaluate_scalars_with_underscore() {
        let key = Key::from(0u64);
        assert!(evaluate(&condition("_ >= 2"), &Value::from(3), &key));
        assert!(!evaluate(&condition("_ >= 2"), &Value::from(1), &key));
        assert!(evaluate(&condition("_ = null"), &Value::Null, &key));
        assert!(evaluate(&condition("_ = true"), &Value::from(true), &key));
    }
}
