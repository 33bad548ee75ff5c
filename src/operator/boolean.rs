use super::Operands;
use crate::value::Value;

fn holds_true(value: Option<&Value>) -> bool {
    value.is_some_and(Value::is_true)
}

fn true_count(operands: &Operands<'_>) -> usize {
    operands.values().filter(|v| holds_true(*v)).count()
}

pub(super) fn all_true(operands: &Operands<'_>) -> Value {
    Value::Bool(operands.values().all(holds_true))
}

pub(super) fn any_true(operands: &Operands<'_>) -> Value {
    Value::Bool(operands.values().any(holds_true))
}

pub(super) fn not(operands: &Operands<'_>) -> Value {
    Value::Bool(!holds_true(operands.value(0)))
}

pub(super) fn is_true(operands: &Operands<'_>) -> Value {
    Value::Bool(holds_true(operands.value(0)))
}

pub(super) fn is_false(operands: &Operands<'_>) -> Value {
    Value::Bool(matches!(operands.value(0), Some(Value::Bool(false))))
}

/// Exactly one input is boolean `true`, not "at least one".
pub(super) fn exactly_one_true(operands: &Operands<'_>) -> Value {
    Value::Bool(true_count(operands) == 1)
}

/// Missing and non-boolean inputs count as not true.
pub(super) fn none_true(operands: &Operands<'_>) -> Value {
    Value::Bool(true_count(operands) == 0)
}
