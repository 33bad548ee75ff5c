use super::Operands;
use crate::value::Value;
use serde_json::Map;

type Object = Map<String, serde_json::Value>;

fn object<'a>(operands: &Operands<'a>) -> Option<&'a Object> {
    operands.value(0).and_then(Value::as_object)
}

fn has(map: &Object, key: &Value) -> bool {
    key.as_str().is_some_and(|key| map.contains_key(key))
}

fn has_key_inner(operands: &Operands<'_>) -> bool {
    match (object(operands), operands.value(1)) {
        (Some(map), Some(key)) => has(map, key),
        _ => false,
    }
}

/// Counts how many listed keys the object has, out of how many were listed.
/// `None` when there is no object or no key list.
fn keys_found(operands: &Operands<'_>) -> Option<(usize, usize)> {
    let map = object(operands)?;
    let keys = operands.value(1)?.as_list()?;
    let found = keys.iter().filter(|key| has(map, key)).count();
    Some((found, keys.len()))
}

pub(super) fn has_key(operands: &Operands<'_>) -> Value {
    Value::Bool(has_key_inner(operands))
}

/// Without an object there is no key, so this holds.
pub(super) fn lacks_key(operands: &Operands<'_>) -> Value {
    Value::Bool(!has_key_inner(operands))
}

pub(super) fn has_all_keys(operands: &Operands<'_>) -> Value {
    Value::Bool(keys_found(operands).is_some_and(|(found, total)| found == total))
}

pub(super) fn has_any_key(operands: &Operands<'_>) -> Value {
    Value::Bool(keys_found(operands).is_some_and(|(found, _)| found > 0))
}

pub(super) fn has_no_keys(operands: &Operands<'_>) -> Value {
    Value::Bool(keys_found(operands).is_none_or(|(found, _)| found == 0))
}

#[cfg(test)]
mod tests {
    use crate::operator::LogicOperator;
    use crate::operator::test_support::run;
    use crate::value::Value;
    use serde_json::json;

    fn contact() -> Option<Value> {
        Some(Value::from(json!({"email": "a@b.c", "phone": null})))
    }

    fn keys(names: &[&str]) -> Option<Value> {
        Some(Value::List(names.iter().map(|n| Value::from(*n)).collect()))
    }

    #[test]
    fn single_key_presence() {
        assert_eq!(
            run(LogicOperator::HasKey, &[contact(), Some("phone".into())]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::LacksKey, &[contact(), Some("fax".into())]),
            Value::Bool(true)
        );
    }

    #[test]
    fn missing_container_lacks_every_key() {
        let key = Some(Value::from("email"));
        assert_eq!(run(LogicOperator::HasKey, &[None, key.clone()]), Value::Bool(false));
        assert_eq!(run(LogicOperator::LacksKey, &[None, key.clone()]), Value::Bool(true));
        assert_eq!(
            run(LogicOperator::LacksKey, &[Some(Value::Integer(3)), key]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::HasNoKeys, &[None, keys(&["email"])]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::HasAllKeys, &[None, keys(&["email"])]),
            Value::Bool(false)
        );
    }

    #[test]
    fn key_lists() {
        assert_eq!(
            run(LogicOperator::HasAllKeys, &[contact(), keys(&["email", "phone"])]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::HasAllKeys, &[contact(), keys(&["email", "fax"])]),
            Value::Bool(false)
        );
        assert_eq!(
            run(LogicOperator::HasAnyKey, &[contact(), keys(&["fax", "phone"])]),
            Value::Bool(true)
        );
        assert_eq!(
            run(LogicOperator::HasNoKeys, &[contact(), keys(&["fax", "phone"])]),
            Value::Bool(false)
        );
        assert_eq!(
            run(LogicOperator::HasNoKeys, &[contact(), keys(&["fax"])]),
            Value::Bool(true)
        );
    }
}
