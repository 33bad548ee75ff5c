//! Read-only operator metadata for external tooling such as graph editors.

use super::LogicOperator;
use crate::value::ValueType;
use serde::Serialize;

use OperatorCategory as C;
use ValueType as T;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorCategory {
    Comparison,
    Boolean,
    String,
    Array,
    Object,
    Existence,
}

/// Human-readable description and static signature of one operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorInfo {
    pub operator: LogicOperator,
    pub name: &'static str,
    pub description: &'static str,
    pub category: OperatorCategory,
    /// Expected input types in order. For variadic operators the last entry
    /// applies to every further input.
    pub input_types: &'static [ValueType],
    pub min_inputs: usize,
    /// `None` for variadic operators.
    pub max_inputs: Option<usize>,
    pub output_type: ValueType,
}

impl OperatorInfo {
    pub fn input_type(&self, index: usize) -> ValueType {
        self.input_types
            .get(index)
            .or_else(|| self.input_types.last())
            .copied()
            .unwrap_or(ValueType::Any)
    }

    pub fn arity_label(&self) -> String {
        match self.max_inputs {
            Some(max) if max == self.min_inputs => max.to_string(),
            Some(max) => format!("{} to {}", self.min_inputs, max),
            None => format!("at least {}", self.min_inputs),
        }
    }
}

const ANY_ANY: &[ValueType] = &[T::Any, T::Any];

/// Describes every operator, in declaration order.
pub fn catalog() -> Vec<OperatorInfo> {
    LogicOperator::ALL.iter().map(|op| describe(*op)).collect()
}

pub(super) fn describe(operator: LogicOperator) -> OperatorInfo {
    let (name, description, category, input_types, min_inputs, max_inputs): (
        &'static str,
        &'static str,
        OperatorCategory,
        &'static [ValueType],
        usize,
        Option<usize>,
    ) = match operator {
        LogicOperator::Equals => (
            "EQUALS",
            "True when both inputs hold the same value; numbers compare by magnitude",
            C::Comparison,
            ANY_ANY,
            2,
            Some(2),
        ),
        LogicOperator::LessThan => (
            "LESS_THAN",
            "True when the first input orders before the second",
            C::Comparison,
            ANY_ANY,
            2,
            Some(2),
        ),
        LogicOperator::GreaterThan => (
            "GREATER_THAN",
            "True when the first input orders after the second",
            C::Comparison,
            ANY_ANY,
            2,
            Some(2),
        ),
        LogicOperator::Between => (
            "BETWEEN",
            "True when the first input lies within the inclusive range given by the second and third",
            C::Comparison,
            &[T::Any, T::Any, T::Any],
            3,
            Some(3),
        ),
        LogicOperator::And => (
            "AND",
            "True when every input is boolean true",
            C::Boolean,
            &[T::Boolean],
            2,
            None,
        ),
        LogicOperator::Or => (
            "OR",
            "True when at least one input is boolean true",
            C::Boolean,
            &[T::Boolean],
            2,
            None,
        ),
        LogicOperator::Not => (
            "NOT",
            "True when the input is not boolean true",
            C::Boolean,
            &[T::Boolean],
            1,
            Some(1),
        ),
        LogicOperator::IsTrue => (
            "IS_TRUE",
            "True when the input is boolean true",
            C::Boolean,
            &[T::Any],
            1,
            Some(1),
        ),
        LogicOperator::IsFalse => (
            "IS_FALSE",
            "True when the input is boolean false",
            C::Boolean,
            &[T::Any],
            1,
            Some(1),
        ),
        LogicOperator::OneOf => (
            "ONE_OF",
            "True when exactly one input is boolean true",
            C::Boolean,
            &[T::Any],
            1,
            None,
        ),
        LogicOperator::NoneOf => (
            "NONE_OF",
            "True when no input is boolean true",
            C::Boolean,
            &[T::Any],
            1,
            None,
        ),
        LogicOperator::StringContains => (
            "STRING_CONTAINS",
            "True when the first string contains the second as a substring",
            C::String,
            &[T::String, T::String],
            2,
            Some(2),
        ),
        LogicOperator::ContainsElement => (
            "CONTAINS_ELEMENT",
            "True when the array contains the element",
            C::Array,
            &[T::Array, T::Any],
            2,
            Some(2),
        ),
        LogicOperator::NotContainsElement => (
            "NOT_CONTAINS_ELEMENT",
            "True when the array does not contain the element",
            C::Array,
            &[T::Array, T::Any],
            2,
            Some(2),
        ),
        LogicOperator::NotEmpty => (
            "NOT_EMPTY",
            "True when the input is present and, if a collection or string, non-empty",
            C::Array,
            &[T::Any],
            1,
            Some(1),
        ),
        LogicOperator::LengthGt => (
            "LENGTH_GT",
            "True when the length of the collection or string exceeds the number",
            C::Array,
            &[T::Any, T::Number],
            2,
            Some(2),
        ),
        LogicOperator::Sum => (
            "SUM",
            "Sum of the numeric elements of the array",
            C::Array,
            &[T::Array],
            1,
            Some(1),
        ),
        LogicOperator::Avg => (
            "AVG",
            "Mean of the numeric elements of the array",
            C::Array,
            &[T::Array],
            1,
            Some(1),
        ),
        LogicOperator::Min => (
            "MIN",
            "Smallest numeric element of the array",
            C::Array,
            &[T::Array],
            1,
            Some(1),
        ),
        LogicOperator::Max => (
            "MAX",
            "Largest numeric element of the array",
            C::Array,
            &[T::Array],
            1,
            Some(1),
        ),
        LogicOperator::ContainsAll => (
            "CONTAINS_ALL",
            "True when the source array contains every element of the reference array",
            C::Array,
            &[T::Array, T::Array],
            2,
            Some(2),
        ),
        LogicOperator::ContainsAny => (
            "CONTAINS_ANY",
            "True when the source array contains at least one element of the reference array",
            C::Array,
            &[T::Array, T::Array],
            2,
            Some(2),
        ),
        LogicOperator::InSet => (
            "IN_SET",
            "True when the value is a member of the constant set",
            C::Array,
            &[T::Any, T::Array],
            2,
            Some(2),
        ),
        LogicOperator::HasKey => (
            "HAS_KEY",
            "True when the object has the key",
            C::Object,
            &[T::Object, T::String],
            2,
            Some(2),
        ),
        LogicOperator::LacksKey => (
            "LACKS_KEY",
            "True when the object lacks the key, or there is no object",
            C::Object,
            &[T::Object, T::String],
            2,
            Some(2),
        ),
        LogicOperator::HasAllKeys => (
            "HAS_ALL_KEYS",
            "True when the object has every listed key",
            C::Object,
            &[T::Object, T::Array],
            2,
            Some(2),
        ),
        LogicOperator::HasAnyKey => (
            "HAS_ANY_KEY",
            "True when the object has at least one listed key",
            C::Object,
            &[T::Object, T::Array],
            2,
            Some(2),
        ),
        LogicOperator::HasNoKeys => (
            "HAS_NO_KEYS",
            "True when the object has none of the listed keys, or there is no object",
            C::Object,
            &[T::Object, T::Array],
            2,
            Some(2),
        ),
        LogicOperator::MatchesSchema => (
            "MATCHES_SCHEMA",
            "True when the document validates against the JSON schema",
            C::Object,
            &[T::Any, T::String],
            2,
            Some(2),
        ),
        LogicOperator::Exists => (
            "EXISTS",
            "True when the provider's path is present in the source data, even if null",
            C::Existence,
            &[T::Any],
            1,
            Some(1),
        ),
        LogicOperator::NotExists => (
            "NOT_EXISTS",
            "True when the provider's path is absent from the source data",
            C::Existence,
            &[T::Any],
            1,
            Some(1),
        ),
        LogicOperator::IsNotNull => (
            "IS_NOT_NULL",
            "True when the provider's path is present and not null",
            C::Existence,
            &[T::Any],
            1,
            Some(1),
        ),
    };

    OperatorInfo {
        operator,
        name,
        description,
        category,
        input_types,
        min_inputs,
        max_inputs,
        output_type: operator.return_type(),
    }
}
