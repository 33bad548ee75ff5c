//! Structural checks run once before a graph version is published.

use super::sort::topological_sort;
use crate::error::{NodeConfigurationError, ValidationError};
use crate::node::{NodeDefinition, NodeId, NodeKind};
use crate::value::ValueType;
use ahash::{AHashMap, AHashSet};
use log::{debug, warn};

/// Validates a compiled node list and returns every problem found.
///
/// A cycle short-circuits: it is reported alone, since no other check is
/// meaningful on a cyclic graph. Otherwise all checks run and accumulate.
/// `declared_node_count` is the node count the stored definition claims.
pub fn validate(nodes: &[NodeDefinition], declared_node_count: usize) -> Vec<ValidationError> {
    let order = topological_sort(nodes);
    if order.has_cycle {
        warn!("Rejecting graph: cycle through nodes {:?}", order.cycle_node_ids);
        return vec![ValidationError::Cycle {
            node_ids: order.cycle_node_ids,
        }];
    }

    let by_id: AHashMap<NodeId, &NodeDefinition> = nodes.iter().map(|n| (n.id, n)).collect();

    let mut errors = Vec::new();
    errors.extend(validate_final_node(nodes, &by_id));
    errors.extend(validate_config_presence(nodes));
    errors.extend(
        validate_node_configuration(nodes, &by_id)
            .into_iter()
            .map(ValidationError::from),
    );
    if declared_node_count != nodes.len() {
        errors.push(
            NodeConfigurationError::NodeCountMismatch {
                declared: declared_node_count,
                actual: nodes.len(),
            }
            .into(),
        );
    }

    if errors.is_empty() {
        debug!("Graph with {} nodes passed validation", nodes.len());
    } else {
        warn!("Graph failed validation with {} error(s)", errors.len());
    }
    errors
}

/// Exactly one final node, fed (if at all) by a boolean-typed node.
pub fn validate_final_node(
    nodes: &[NodeDefinition],
    by_id: &AHashMap<NodeId, &NodeDefinition>,
) -> Vec<ValidationError> {
    let finals: Vec<&NodeDefinition> = nodes.iter().filter(|n| n.is_final()).collect();
    let mut errors = Vec::new();

    if finals.len() != 1 {
        errors.push(ValidationError::FinalNode {
            message: format!("expected exactly one final node, found {}", finals.len()),
            node_ids: finals.iter().map(|n| n.id).collect(),
        });
    }

    for node in &finals {
        let Some(input) = node.inputs.first().and_then(|id| by_id.get(id)) else {
            continue;
        };
        let found = input.output_type();
        if found != ValueType::Boolean {
            errors.push(ValidationError::FinalNode {
                message: format!(
                    "final node {} must be fed by a boolean node, but node {} produces {}",
                    node.id, input.id, found
                ),
                node_ids: vec![node.id, input.id],
            });
        }
    }

    errors
}

/// At least one change detection node.
pub fn validate_config_presence(nodes: &[NodeDefinition]) -> Option<ValidationError> {
    if nodes.iter().any(NodeDefinition::is_config) {
        None
    } else {
        Some(ValidationError::ConfigNode {
            message: "graph needs at least one change detection node".to_string(),
        })
    }
}

/// Per-node wiring and configuration: unique ids, known inputs, the node's
/// own settings and, for logic nodes, its operator's signature.
pub fn validate_node_configuration(
    nodes: &[NodeDefinition],
    by_id: &AHashMap<NodeId, &NodeDefinition>,
) -> Vec<NodeConfigurationError> {
    let mut errors = Vec::new();
    let mut seen = AHashSet::with_capacity(nodes.len());

    for node in nodes {
        if !seen.insert(node.id) {
            errors.push(NodeConfigurationError::DuplicateId { node_id: node.id });
        }

        let mut inputs = Vec::with_capacity(node.inputs.len());
        for input_id in &node.inputs {
            match by_id.get(input_id) {
                Some(input) => inputs.push(*input),
                None => errors.push(NodeConfigurationError::UnknownInput {
                    node_id: node.id,
                    input_id: *input_id,
                }),
            }
        }

        if let Err(err) = node.check_configuration() {
            errors.push(err);
        }

        if let NodeKind::Logic { operator } = &node.kind {
            // Operator checks need the complete wiring.
            if inputs.len() == node.inputs.len() {
                if let Err(err) = operator.validate(node, &inputs) {
                    errors.push(err.into());
                }
            }
        }
    }

    errors
}
