use super::{LogicOperator, Operands};
use crate::error::OperatorValidationError;
use crate::node::{NodeDefinition, NodeKind};
use crate::value::Value;
use ahash::AHashSet;

fn list<'a>(operands: &Operands<'a>, index: usize) -> Option<&'a [Value]> {
    operands.value(index).and_then(Value::as_list)
}

/// Hashes a collection for membership tests. Values are normalized first so
/// `1` and `1.0` land in the same bucket.
fn hashed(items: &[Value]) -> AHashSet<Value> {
    items.iter().map(Value::normalized).collect()
}

fn numbers<'a>(operands: &Operands<'a>) -> impl Iterator<Item = f64> {
    list(operands, 0)
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_f64)
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::List(items) => Some(items.len()),
        Value::String(s) => Some(s.chars().count()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

fn contains(operands: &Operands<'_>) -> Option<bool> {
    let items = list(operands, 0)?;
    let element = operands.value(1)?.normalized();
    Some(items.iter().any(|item| item.normalized() == element))
}

pub(super) fn contains_element(operands: &Operands<'_>) -> Value {
    Value::Bool(contains(operands).unwrap_or(false))
}

/// A missing array contains nothing.
pub(super) fn not_contains_element(operands: &Operands<'_>) -> Value {
    Value::Bool(!contains(operands).unwrap_or(false))
}

pub(super) fn not_empty(operands: &Operands<'_>) -> Value {
    let present = match operands.value(0) {
        None | Some(Value::Null) => false,
        Some(value) => length(value).is_none_or(|len| len > 0),
    };
    Value::Bool(present)
}

pub(super) fn length_gt(operands: &Operands<'_>) -> Value {
    let longer = match (operands.value(0).and_then(length), operands.value(1)) {
        (Some(len), Some(limit)) => limit.as_f64().is_some_and(|limit| len as f64 > limit),
        _ => false,
    };
    Value::Bool(longer)
}

pub(super) fn sum(operands: &Operands<'_>) -> Value {
    Value::Float(numbers(operands).sum())
}

pub(super) fn avg(operands: &Operands<'_>) -> Value {
    let (total, count) = numbers(operands).fold((0.0, 0usize), |(t, c), n| (t + n, c + 1));
    if count == 0 {
        Value::Float(0.0)
    } else {
        Value::Float(total / count as f64)
    }
}

pub(super) fn min(operands: &Operands<'_>) -> Value {
    Value::Float(numbers(operands).reduce(f64::min).unwrap_or(0.0))
}

pub(super) fn max(operands: &Operands<'_>) -> Value {
    Value::Float(numbers(operands).reduce(f64::max).unwrap_or(0.0))
}

pub(super) fn contains_all(operands: &Operands<'_>) -> Value {
    let result = match (list(operands, 0), list(operands, 1)) {
        (Some(source), Some(reference)) => {
            let source = hashed(source);
            reference.iter().all(|item| source.contains(&item.normalized()))
        }
        _ => false,
    };
    Value::Bool(result)
}

pub(super) fn contains_any(operands: &Operands<'_>) -> Value {
    let result = match (list(operands, 0), list(operands, 1)) {
        (Some(source), Some(reference)) => {
            let source = hashed(source);
            reference.iter().any(|item| source.contains(&item.normalized()))
        }
        _ => false,
    };
    Value::Bool(result)
}

pub(super) fn in_set(operands: &Operands<'_>) -> Value {
    let result = match (operands.value(0), list(operands, 1)) {
        (Some(value), Some(set)) => hashed(set).contains(&value.normalized()),
        _ => false,
    };
    Value::Bool(result)
}

/// The membership set of `IN_SET` must be a literal array.
pub(super) fn validate_in_set(
    node: &NodeDefinition,
    inputs: &[&NodeDefinition],
) -> Result<(), OperatorValidationError> {
    match inputs.get(1).map(|input| &input.kind) {
        Some(NodeKind::Constant {
            value: Value::List(_),
        }) => Ok(()),
        _ => Err(OperatorValidationError::InvalidInput {
            node_id: node.id,
            operator: LogicOperator::InSet,
            index: 1,
            message: "the set must be a constant array".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::test_support::run;

    fn ints(values: &[i64]) -> Option<Value> {
        Some(Value::List(values.iter().map(|v| Value::Integer(*v)).collect()))
    }

    #[test]
    fn contains_all_and_any() {
        assert_eq!(
            run(LogicOperator::ContainsAll, &[ints(&[1, 2, 3]), ints(&[1, 2])]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::ContainsAll, &[ints(&[1, 2, 3]), ints(&[1, 4])]),
            Value::Bool(false)
        );
        assert_eq!(
            run(LogicOperator::ContainsAny, &[ints(&[1, 2, 3]), ints(&[9, 3])]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::ContainsAny, &[None, ints(&[1])]),
            Value::Bool(false)
        );
    }

    #[test]
    fn membership_ignores_number_representation() {
        let set = Some(Value::List(vec![Value::Float(2.0), Value::from("x")]));
        assert_eq!(
            run(LogicOperator::InSet, &[Some(Value::Integer(2)), set.clone()]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::InSet, &[Some(Value::from("y")), set.clone()]),
            Value::Bool(false)
        );
        assert_eq!(
            run(LogicOperator::ContainsElement, &[set, Some(Value::Integer(2))]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::NotContainsElement, &[None, Some(Value::Integer(2))]),
            Value::Bool(true)
        );
    }

    #[test]
    fn nested_membership_agrees_across_operators() {
        let nested = Some(Value::List(vec![Value::List(vec![Value::Float(1.0)])]));
        let needle = Some(Value::List(vec![Value::Integer(1)]));
        assert_eq!(
            run(LogicOperator::ContainsElement, &[nested.clone(), needle.clone()]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::InSet, &[needle, nested]),
            Value::Bool(true)
        );
    }

    #[test]
    fn aggregations_skip_non_numbers() {
        let mixed = Some(Value::List(vec![
            Value::Integer(4),
            Value::from("x"),
            Value::Float(2.0),
            Value::Null,
        ]));
        assert_eq!(run(LogicOperator::Sum, &[mixed.clone()]), Value::Float(6.0));
        assert_eq!(run(LogicOperator::Avg, &[mixed.clone()]), Value::Float(3.0));
        assert_eq!(run(LogicOperator::Min, &[mixed.clone()]), Value::Float(2.0));
        assert_eq!(run(LogicOperator::Max, &[mixed]), Value::Float(4.0));
    }

    #[test]
    fn aggregations_default_to_zero() {
        let words = Some(Value::List(vec![Value::from("a")]));
        for op in [
            LogicOperator::Sum,
            LogicOperator::Avg,
            LogicOperator::Min,
            LogicOperator::Max,
        ] {
            assert_eq!(run(op, &[None]), Value::Float(0.0));
            assert_eq!(run(op, &[words.clone()]), Value::Float(0.0));
        }
    }

    #[test]
    fn emptiness_and_length() {
        assert_eq!(run(LogicOperator::NotEmpty, &[ints(&[])]), Value::Bool(false));
        assert_eq!(run(LogicOperator::NotEmpty, &[Some("".into())]), Value::Bool(false));
        assert_eq!(run(LogicOperator::NotEmpty, &[Some(Value::Integer(0))]), Value::Bool(true));
        assert_eq!(run(LogicOperator::NotEmpty, &[None]), Value::Bool(false));
        assert_eq!(
            run(LogicOperator::LengthGt, &[ints(&[1, 2]), Some(Value::Integer(1))]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::LengthGt, &[Some("ab".into()), Some(Value::Integer(2))]),
            Value::Bool(false)
        );
    }

    #[test]
    fn in_set_needs_a_constant_array() {
        let value = NodeDefinition::provider(1, "source.crm.status");
        let set = NodeDefinition::constant(2, Value::List(vec![Value::from("open")]));
        let node = NodeDefinition::logic(3, LogicOperator::InSet, &[1, 2]);
        assert!(LogicOperator::InSet.validate(&node, &[&value, &set]).is_ok());

        let dynamic = NodeDefinition::provider(2, "source.crm.allowed");
        let err = LogicOperator::InSet
            .validate(&node, &[&value, &dynamic])
            .unwrap_err();
        assert!(matches!(
            err,
            OperatorValidationError::InvalidInput { index: 1, .. }
        ));
    }
}
