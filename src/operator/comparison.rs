use super::Operands;
use crate::value::Value;
use std::cmp::Ordering;

/// Orders two values: numbers by magnitude, strings lexicographically.
/// Anything else is unordered.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

fn ordered(operands: &Operands<'_>, left: usize, right: usize) -> Option<Ordering> {
    compare(operands.value(left)?, operands.value(right)?)
}

pub(super) fn equals(operands: &Operands<'_>) -> Value {
    let equal = match (operands.value(0), operands.value(1)) {
        (Some(l), Some(r)) => l.loosely_equals(r),
        _ => false,
    };
    Value::Bool(equal)
}

pub(super) fn less_than(operands: &Operands<'_>) -> Value {
    Value::Bool(ordered(operands, 0, 1) == Some(Ordering::Less))
}

pub(super) fn greater_than(operands: &Operands<'_>) -> Value {
    Value::Bool(ordered(operands, 0, 1) == Some(Ordering::Greater))
}

/// Inclusive on both ends: `low <= value <= high`.
pub(super) fn between(operands: &Operands<'_>) -> Value {
    let above_low = matches!(
        ordered(operands, 0, 1),
        Some(Ordering::Greater | Ordering::Equal)
    );
    let below_high = matches!(
        ordered(operands, 0, 2),
        Some(Ordering::Less | Ordering::Equal)
    );
    Value::Bool(above_low && below_high)
}

#[cfg(test)]
mod tests {
    use crate::operator::LogicOperator;
    use crate::operator::test_support::run;
    use crate::value::Value;

    fn n(v: f64) -> Option<Value> {
        Some(Value::Float(v))
    }

    #[test]
    fn equality_is_numeric_aware() {
        assert_eq!(
            run(LogicOperator::Equals, &[Some(Value::Integer(2)), n(2.0)]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::Equals, &[Some("a".into()), Some("b".into())]),
            Value::Bool(false)
        );
        assert_eq!(run(LogicOperator::Equals, &[None, None]), Value::Bool(false));
    }

    #[test]
    fn ordering_respects_input_order() {
        assert_eq!(run(LogicOperator::LessThan, &[n(1.0), n(2.0)]), Value::Bool(true));
        assert_eq!(run(LogicOperator::LessThan, &[n(2.0), n(1.0)]), Value::Bool(false));
        assert_eq!(
            run(LogicOperator::GreaterThan, &[Some("b".into()), Some("a".into())]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::GreaterThan, &[Some("b".into()), n(1.0)]),
            Value::Bool(false)
        );
    }

    #[test]
    fn between_is_inclusive() {
        assert_eq!(run(LogicOperator::Between, &[n(5.0), n(1.0), n(5.0)]), Value::Bool(true));
        assert_eq!(run(LogicOperator::Between, &[n(1.0), n(1.0), n(5.0)]), Value::Bool(true));
        assert_eq!(run(LogicOperator::Between, &[n(6.0), n(1.0), n(5.0)]), Value::Bool(false));
        assert_eq!(run(LogicOperator::Between, &[None, n(1.0), n(5.0)]), Value::Bool(false));
    }
}
