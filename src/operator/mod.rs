//! The operator library behind logic nodes.
//!
//! Operators form a closed enum. Each one declares a static signature and
//! return type (see [`catalog`]), validates its node's wiring once before the
//! graph is published, and computes a result from its inputs' already
//! calculated values during a pass.

use crate::error::{GraphEvaluationError, OperatorValidationError};
use crate::node::NodeDefinition;
use crate::value::{Document, Value, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;

mod boolean;
pub mod catalog;
mod collection;
mod comparison;
mod existence;
mod object;
mod schema;
mod text;

pub use catalog::{OperatorCategory, OperatorInfo, catalog};
pub use schema::SchemaCache;

/// Every operator a logic node can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicOperator {
    // Comparison
    Equals,
    LessThan,
    GreaterThan,
    Between,

    // Boolean
    And,
    Or,
    Not,
    IsTrue,
    IsFalse,
    OneOf,
    NoneOf,

    // String
    StringContains,

    // Array / set
    ContainsElement,
    NotContainsElement,
    NotEmpty,
    LengthGt,
    Sum,
    Avg,
    Min,
    Max,
    ContainsAll,
    ContainsAny,
    InSet,

    // Object
    HasKey,
    LacksKey,
    HasAllKeys,
    HasAnyKey,
    HasNoKeys,
    MatchesSchema,

    // Existence
    Exists,
    NotExists,
    IsNotNull,
}

impl LogicOperator {
    pub const ALL: [LogicOperator; 32] = [
        LogicOperator::Equals,
        LogicOperator::LessThan,
        LogicOperator::GreaterThan,
        LogicOperator::Between,
        LogicOperator::And,
        LogicOperator::Or,
        LogicOperator::Not,
        LogicOperator::IsTrue,
        LogicOperator::IsFalse,
        LogicOperator::OneOf,
        LogicOperator::NoneOf,
        LogicOperator::StringContains,
        LogicOperator::ContainsElement,
        LogicOperator::NotContainsElement,
        LogicOperator::NotEmpty,
        LogicOperator::LengthGt,
        LogicOperator::Sum,
        LogicOperator::Avg,
        LogicOperator::Min,
        LogicOperator::Max,
        LogicOperator::ContainsAll,
        LogicOperator::ContainsAny,
        LogicOperator::InSet,
        LogicOperator::HasKey,
        LogicOperator::LacksKey,
        LogicOperator::HasAllKeys,
        LogicOperator::HasAnyKey,
        LogicOperator::HasNoKeys,
        LogicOperator::MatchesSchema,
        LogicOperator::Exists,
        LogicOperator::NotExists,
        LogicOperator::IsNotNull,
    ];

    /// The wire name, e.g. `"LESS_THAN"`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// The declared result type, known without data.
    pub fn return_type(self) -> ValueType {
        match self {
            LogicOperator::Sum | LogicOperator::Avg | LogicOperator::Min | LogicOperator::Max => {
                ValueType::Number
            }
            _ => ValueType::Boolean,
        }
    }

    pub fn info(self) -> OperatorInfo {
        catalog::describe(self)
    }

    /// Checks the wiring of `node` against this operator's signature.
    ///
    /// `inputs` are the definitions of the node's inputs, in order.
    pub fn validate(
        self,
        node: &NodeDefinition,
        inputs: &[&NodeDefinition],
    ) -> Result<(), OperatorValidationError> {
        let info = self.info();

        let count = inputs.len();
        let too_many = info.max_inputs.is_some_and(|max| count > max);
        if count < info.min_inputs || too_many {
            return Err(OperatorValidationError::Arity {
                node_id: node.id,
                operator: self,
                expected: info.arity_label(),
                found: count,
            });
        }

        for (index, input) in inputs.iter().enumerate() {
            let expected = info.input_type(index);
            let found = input.output_type();
            if !expected.accepts(found) {
                return Err(OperatorValidationError::InputType {
                    node_id: node.id,
                    operator: self,
                    index,
                    expected,
                    found,
                });
            }
        }

        match self {
            LogicOperator::InSet => collection::validate_in_set(node, inputs),
            LogicOperator::MatchesSchema => schema::validate_schema_input(node, inputs),
            LogicOperator::Exists | LogicOperator::NotExists | LogicOperator::IsNotNull => {
                existence::validate_provider_input(self, node, inputs)
            }
            _ => Ok(()),
        }
    }

    /// Computes the operator's result from its inputs' calculated values.
    pub fn execute(self, operands: &Operands<'_>) -> Result<Value, GraphEvaluationError> {
        let result = match self {
            LogicOperator::Equals => comparison::equals(operands),
            LogicOperator::LessThan => comparison::less_than(operands),
            LogicOperator::GreaterThan => comparison::greater_than(operands),
            LogicOperator::Between => comparison::between(operands),

            LogicOperator::And => boolean::all_true(operands),
            LogicOperator::Or => boolean::any_true(operands),
            LogicOperator::Not => boolean::not(operands),
            LogicOperator::IsTrue => boolean::is_true(operands),
            LogicOperator::IsFalse => boolean::is_false(operands),
            LogicOperator::OneOf => boolean::exactly_one_true(operands),
            LogicOperator::NoneOf => boolean::none_true(operands),

            LogicOperator::StringContains => text::string_contains(operands),

            LogicOperator::ContainsElement => collection::contains_element(operands),
            LogicOperator::NotContainsElement => collection::not_contains_element(operands),
            LogicOperator::NotEmpty => collection::not_empty(operands),
            LogicOperator::LengthGt => collection::length_gt(operands),
            LogicOperator::Sum => collection::sum(operands),
            LogicOperator::Avg => collection::avg(operands),
            LogicOperator::Min => collection::min(operands),
            LogicOperator::Max => collection::max(operands),
            LogicOperator::ContainsAll => collection::contains_all(operands),
            LogicOperator::ContainsAny => collection::contains_any(operands),
            LogicOperator::InSet => collection::in_set(operands),

            LogicOperator::HasKey => object::has_key(operands),
            LogicOperator::LacksKey => object::lacks_key(operands),
            LogicOperator::HasAllKeys => object::has_all_keys(operands),
            LogicOperator::HasAnyKey => object::has_any_key(operands),
            LogicOperator::HasNoKeys => object::has_no_keys(operands),
            LogicOperator::MatchesSchema => return schema::matches_schema(operands),

            LogicOperator::Exists => return existence::exists(operands),
            LogicOperator::NotExists => return existence::not_exists(operands),
            LogicOperator::IsNotNull => return existence::is_not_null(operands),
        };
        Ok(result)
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The view an operator gets of its node during a pass: the node itself, its
/// inputs' definitions and their calculated results, and the source document
/// for operators that inspect paths.
pub struct Operands<'a> {
    node: &'a NodeDefinition,
    inputs: Vec<(&'a NodeDefinition, Option<&'a Value>)>,
    source: Option<&'a Document>,
    schemas: &'a SchemaCache,
}

impl<'a> Operands<'a> {
    pub fn new(
        node: &'a NodeDefinition,
        inputs: Vec<(&'a NodeDefinition, Option<&'a Value>)>,
        source: Option<&'a Document>,
        schemas: &'a SchemaCache,
    ) -> Self {
        Self {
            node,
            inputs,
            source,
            schemas,
        }
    }

    pub fn node(&self) -> &NodeDefinition {
        self.node
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// The calculated value of input `index`; `None` when it is absent or null.
    pub fn value(&self, index: usize) -> Option<&'a Value> {
        self.inputs.get(index).and_then(|(_, value)| *value)
    }

    pub fn values(&self) -> impl Iterator<Item = Option<&'a Value>> + '_ {
        self.inputs.iter().map(|(_, value)| *value)
    }

    /// The definition wired into input `index`.
    pub fn input_node(&self, index: usize) -> Option<&'a NodeDefinition> {
        self.inputs.get(index).map(|(node, _)| *node)
    }

    pub fn source(&self) -> Option<&'a Document> {
        self.source
    }

    pub fn schemas(&self) -> &SchemaCache {
        self.schemas
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for op in LogicOperator::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.name()));
            let back: LogicOperator = serde_json::from_str(&json).unwrap();
            assert_eq!(back, op);
        }
        assert_eq!(LogicOperator::LengthGt.to_string(), "LENGTH_GT");
    }

    #[test]
    fn aggregations_return_numbers() {
        assert_eq!(LogicOperator::Avg.return_type(), ValueType::Number);
        assert_eq!(LogicOperator::HasKey.return_type(), ValueType::Boolean);
    }

    #[test]
    fn arity_is_checked() {
        let a = NodeDefinition::constant(1, 1i64);
        let node = NodeDefinition::logic(9, LogicOperator::Between, &[1, 1]);
        let err = LogicOperator::Between.validate(&node, &[&a, &a]).unwrap_err();
        assert!(matches!(
            err,
            OperatorValidationError::Arity { found: 2, .. }
        ));
    }

    #[test]
    fn declared_input_types_are_checked() {
        let text = NodeDefinition::constant(1, "yes");
        let node = NodeDefinition::logic(9, LogicOperator::And, &[1, 1]);
        let err = LogicOperator::And.validate(&node, &[&text, &text]).unwrap_err();
        assert!(matches!(
            err,
            OperatorValidationError::InputType {
                expected: ValueType::Boolean,
                found: ValueType::String,
                ..
            }
        ));

        let provider = NodeDefinition::provider(2, "source.a.flag");
        assert!(LogicOperator::And.validate(&node, &[&provider, &provider]).is_ok());
    }
}
