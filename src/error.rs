use crate::node::NodeId;
use crate::operator::LogicOperator;
use crate::value::ValueType;
use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

/// Errors in a single node's wiring or configuration, found while building
/// or validating a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeConfigurationError {
    #[error("Node {node_id} shares its id with another node in the graph")]
    DuplicateId { node_id: NodeId },

    #[error("Node {node_id} references input node {input_id}, which is not part of the graph")]
    UnknownInput { node_id: NodeId, input_id: NodeId },

    #[error("Provider node {node_id} has an invalid path '{path}': {reason}")]
    InvalidProviderPath {
        node_id: NodeId,
        path: String,
        reason: String,
    },

    #[error("Final node {node_id} accepts at most one input, but {count} are connected")]
    TooManyFinalInputs { node_id: NodeId, count: usize },

    #[error("Change detection node {node_id} has a negative time window of {millis} ms")]
    NegativeTimeWindow { node_id: NodeId, millis: i64 },

    #[error(transparent)]
    Operator(#[from] OperatorValidationError),

    #[error("Graph declares {declared} nodes, but {actual} were compiled")]
    NodeCountMismatch { declared: usize, actual: usize },
}

impl NodeConfigurationError {
    /// The node the error points at, if it concerns a single node.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::DuplicateId { node_id }
            | Self::UnknownInput { node_id, .. }
            | Self::InvalidProviderPath { node_id, .. }
            | Self::TooManyFinalInputs { node_id, .. }
            | Self::NegativeTimeWindow { node_id, .. } => Some(*node_id),
            Self::Operator(err) => Some(err.node_id()),
            Self::NodeCountMismatch { .. } => None,
        }
    }
}

/// Errors raised by an operator when checking the wiring of its logic node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperatorValidationError {
    #[error(
        "Operator {operator} on node {node_id} requires {expected} inputs, but {found} are connected"
    )]
    Arity {
        node_id: NodeId,
        operator: LogicOperator,
        expected: String,
        found: usize,
    },

    #[error(
        "Operator {operator} on node {node_id} expects input {index} to be {expected}, but it is declared as {found}"
    )]
    InputType {
        node_id: NodeId,
        operator: LogicOperator,
        index: usize,
        expected: ValueType,
        found: ValueType,
    },

    #[error("Operator {operator} on node {node_id}, input {index}: {message}")]
    InvalidInput {
        node_id: NodeId,
        operator: LogicOperator,
        index: usize,
        message: String,
    },
}

impl OperatorValidationError {
    pub fn node_id(&self) -> NodeId {
        match self {
            Self::Arity { node_id, .. }
            | Self::InputType { node_id, .. }
            | Self::InvalidInput { node_id, .. } => *node_id,
        }
    }
}

/// A structural problem reported by the graph validator. An empty list of
/// these means the graph can be published.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Graph contains a cycle through nodes [{}]", .node_ids.iter().join(", "))]
    Cycle { node_ids: Vec<NodeId> },

    #[error("Final node error: {message}")]
    FinalNode {
        message: String,
        node_ids: Vec<NodeId>,
    },

    #[error("Config node error: {message}")]
    ConfigNode { message: String },

    #[error(transparent)]
    NodeConfiguration(#[from] NodeConfigurationError),
}

/// Coarse classification of runtime failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationErrorKind {
    DataNotFound,
    TypeMismatch,
    ExecutionFailed,
}

/// Errors that abort an evaluation pass. Partial results of the pass are discarded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphEvaluationError {
    #[error("Node {node_id} needs '{key}', which is not present in the data context")]
    DataNotFound { node_id: NodeId, key: String },

    #[error("Type mismatch on node {node_id}: expected {expected}, but found {found}")]
    TypeMismatch {
        node_id: NodeId,
        expected: String,
        found: String,
    },

    #[error("Execution failed on node {node_id}: {message}")]
    ExecutionFailed { node_id: NodeId, message: String },

    #[error("Graph cannot be evaluated, it contains a cycle through nodes [{}]", .node_ids.iter().join(", "))]
    Cycle { node_ids: Vec<NodeId> },

    #[error("Graph cannot be evaluated, it has no final node")]
    MissingFinalNode,
}

impl GraphEvaluationError {
    pub fn kind(&self) -> EvaluationErrorKind {
        match self {
            Self::DataNotFound { .. } => EvaluationErrorKind::DataNotFound,
            Self::TypeMismatch { .. } => EvaluationErrorKind::TypeMismatch,
            Self::ExecutionFailed { .. } | Self::Cycle { .. } | Self::MissingFinalNode => {
                EvaluationErrorKind::ExecutionFailed
            }
        }
    }
}

/// Errors that can occur when loading a stored graph definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("Failed to parse graph definition JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid graph definition: {0}")]
    ValidationError(String),
}

/// Errors from turning a definition into a publishable graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("Graph failed validation: {}", .0.iter().join("; "))]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    NodeConfiguration(#[from] NodeConfigurationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_error_lists_node_ids() {
        let err = ValidationError::Cycle {
            node_ids: vec![3, 7],
        };
        assert_eq!(err.to_string(), "Graph contains a cycle through nodes [3, 7]");
    }

    #[test]
    fn evaluation_errors_map_to_kinds() {
        let missing = GraphEvaluationError::DataNotFound {
            node_id: 1,
            key: "source".to_string(),
        };
        assert_eq!(missing.kind(), EvaluationErrorKind::DataNotFound);
        assert_eq!(
            GraphEvaluationError::MissingFinalNode.kind(),
            EvaluationErrorKind::ExecutionFailed
        );
        assert_eq!(
            serde_json::to_string(&EvaluationErrorKind::TypeMismatch).unwrap(),
            "\"TYPE_MISMATCH\""
        );
    }

    #[test]
    fn operator_errors_point_at_their_node() {
        let err = NodeConfigurationError::from(OperatorValidationError::Arity {
            node_id: 9,
            operator: LogicOperator::Between,
            expected: "3".to_string(),
            found: 2,
        });
        assert_eq!(err.node_id(), Some(9));
        assert!(err.to_string().contains("BETWEEN"));
    }
}
