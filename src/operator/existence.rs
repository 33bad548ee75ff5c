//! Existence checks look at the provider's path in the source document
//! itself, so they can tell an absent path from an explicit null.

use super::{LogicOperator, Operands};
use crate::error::{GraphEvaluationError, OperatorValidationError};
use crate::node::{NodeDefinition, source_relative_path};
use crate::value::{Document, Value, resolve};

fn lookup<'a>(operands: &Operands<'a>) -> Result<Option<&'a Document>, GraphEvaluationError> {
    let node_id = operands.node().id;
    let path = operands
        .input_node(0)
        .and_then(NodeDefinition::provider_path)
        .ok_or_else(|| GraphEvaluationError::ExecutionFailed {
            node_id,
            message: "existence checks need a provider input".to_string(),
        })?;
    let source = operands
        .source()
        .ok_or_else(|| GraphEvaluationError::DataNotFound {
            node_id,
            key: "source".to_string(),
        })?;
    Ok(resolve(source, source_relative_path(path)))
}

pub(super) fn exists(operands: &Operands<'_>) -> Result<Value, GraphEvaluationError> {
    Ok(Value::Bool(lookup(operands)?.is_some()))
}

pub(super) fn not_exists(operands: &Operands<'_>) -> Result<Value, GraphEvaluationError> {
    Ok(Value::Bool(lookup(operands)?.is_none()))
}

pub(super) fn is_not_null(operands: &Operands<'_>) -> Result<Value, GraphEvaluationError> {
    Ok(Value::Bool(lookup(operands)?.is_some_and(|doc| !doc.is_null())))
}

pub(super) fn validate_provider_input(
    operator: LogicOperator,
    node: &NodeDefinition,
    inputs: &[&NodeDefinition],
) -> Result<(), OperatorValidationError> {
    if inputs.first().is_some_and(|input| input.is_provider()) {
        return Ok(());
    }
    Err(OperatorValidationError::InvalidInput {
        node_id: node.id,
        operator,
        index: 0,
        message: "input must be a provider node".to_string(),
    })
}
