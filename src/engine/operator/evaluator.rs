//! Per-kind operator evaluation

use std::cmp::Ordering;

use super::kind::OperatorKind;
use super::pattern::PatternCache;
use crate::engine::error::EvalError;
use crate::engine::value::Value;

/// Evaluate `kind` with a resolved `value` and the condition's `target`
pub fn evaluate(
    kind: OperatorKind,
    value: &Value,
    target: &Value,
    patterns: &PatternCache,
) -> Result<bool, EvalError> {
    match kind {
        OperatorKind::Equals => Ok(value == target),
        OperatorKind::NotEquals => Ok(value != target),
        OperatorKind::Contains => contains(kind, value, target),
        OperatorKind::NotContains => contains(kind, value, target).map(|found| !found),
        OperatorKind::StartsWith => string_test(kind, value, target, |s, t| s.starts_with(t)),
        OperatorKind::EndsWith => string_test(kind, value, target, |s, t| s.ends_with(t)),
        OperatorKind::GreaterThan => compare(kind, value, target, |o| o == Ordering::Greater),
        OperatorKind::GreaterThanOrEqual => compare(kind, value, target, |o| o != Ordering::Less),
        OperatorKind::LessThan => compare(kind, value, target, |o| o == Ordering::Less),
        OperatorKind::LessThanOrEqual => compare(kind, value, target, |o| o != Ordering::Greater),
        OperatorKind::Regex => regex_match(kind, value, target, patterns),
        OperatorKind::NotRegex => regex_match(kind, value, target, patterns).map(|m| !m),
        OperatorKind::InList => in_list(kind, value, target),
        OperatorKind::NotInList => in_list(kind, value, target).map(|found| !found),
        OperatorKind::IsEmpty => Ok(value.is_empty()),
        OperatorKind::IsNotEmpty => Ok(!value.is_empty()),
        OperatorKind::Between => between(kind, value, target),
    }
}

/// Substring for strings, membership for lists, key presence for maps.
/// Selected by the kind of `value`.
fn contains(kind: OperatorKind, value: &Value, target: &Value) -> Result<bool, EvalError> {
    match value {
        Value::String(s) => match target {
            Value::String(t) => Ok(s.contains(t.as_str())),
            other => Err(EvalError::mismatch(kind, "a string target", other.kind())),
        },
        Value::List(items) => Ok(items.contains(target)),
        Value::Map(map) => match target {
            Value::String(key) => Ok(map.contains_key(key)),
            other => Err(EvalError::mismatch(kind, "a string key", other.kind())),
        },
        other => Err(EvalError::mismatch(kind, "string, list or map", other.kind())),
    }
}

fn string_test<F>(kind: OperatorKind, value: &Value, target: &Value, test: F) -> Result<bool, EvalError>
where
    F: Fn(&str, &str) -> bool,
{
    match (value, target) {
        (Value::String(s), Value::String(t)) => Ok(test(s, t)),
        (Value::String(_), other) => Err(EvalError::mismatch(kind, "a string target", other.kind())),
        (other, _) => Err(EvalError::mismatch(kind, "string", other.kind())),
    }
}

fn ordering(kind: OperatorKind, value: &Value, target: &Value) -> Result<Option<Ordering>, EvalError> {
    value
        .compare(target)
        .map_err(|_| EvalError::mismatch(kind, ordered_expectation(value), mismatched(value, target).kind()))
}

/// What the other operand should have been, given the one that is orderable
fn ordered_expectation(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "number",
        Value::String(_) => "string",
        _ => "number or string",
    }
}

/// The operand to blame in a mismatch report
fn mismatched<'a>(value: &'a Value, target: &'a Value) -> &'a Value {
    if value.is_orderable() {
        target
    } else {
        value
    }
}

fn compare<F>(kind: OperatorKind, value: &Value, target: &Value, accept: F) -> Result<bool, EvalError>
where
    F: Fn(Ordering) -> bool,
{
    // NaN is incomparable: never matches, never errors.
    Ok(ordering(kind, value, target)?.map(accept).unwrap_or(false))
}

fn regex_match(
    kind: OperatorKind,
    value: &Value,
    target: &Value,
    patterns: &PatternCache,
) -> Result<bool, EvalError> {
    let pattern = match target {
        Value::String(p) => p,
        other => {
            return Err(EvalError::invalid_target(
                kind,
                format!("pattern must be a string, found {}", other.kind()),
            ))
        }
    };
    let text = match value {
        Value::String(s) => s,
        other => return Err(EvalError::mismatch(kind, "string", other.kind())),
    };

    let re = patterns.get_or_compile(pattern)?;
    Ok(re.is_match(text))
}

fn in_list(kind: OperatorKind, value: &Value, target: &Value) -> Result<bool, EvalError> {
    match target {
        Value::List(options) => Ok(options.contains(value)),
        other => Err(EvalError::invalid_target(
            kind,
            format!("expected a list, found {}", other.kind()),
        )),
    }
}

fn between(kind: OperatorKind, value: &Value, target: &Value) -> Result<bool, EvalError> {
    let (min, max) = match target.as_list() {
        Some([min, max]) => (min, max),
        Some(items) => {
            return Err(EvalError::invalid_target(
                kind,
                format!("expected [min, max], found {} elements", items.len()),
            ))
        }
        None => {
            return Err(EvalError::invalid_target(
                kind,
                format!("expected [min, max], found {}", target.kind()),
            ))
        }
    };

    let above_min = ordering(kind, value, min)?;
    let below_max = ordering(kind, value, max)?;
    Ok(matches!(above_min, Some(Ordering::Greater | Ordering::Equal))
        && matches!(below_max, Some(Ordering::Less | Ordering::Equal)))
}
