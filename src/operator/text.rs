use super::Operands;
use crate::value::Value;

pub(super) fn string_contains(operands: &Operands<'_>) -> Value {
    let contains = match (operands.value(0), operands.value(1)) {
        (Some(Value::String(haystack)), Some(Value::String(needle))) => {
            haystack.contains(needle.as_str())
        }
        _ => false,
    };
    Value::Bool(contains)
}
