//! The compiled graph: an arena of immutable node definitions with resolved
//! input slots and a cached evaluation order.

use crate::definition::IntoGraph;
use crate::error::{CompileError, NodeConfigurationError};
use crate::node::{NodeDefinition, NodeId};
use ahash::AHashMap;
use log::debug;

mod sort;
mod validate;

pub use sort::{TopologicalOrder, topological_sort};
pub use validate::{
    validate, validate_config_presence, validate_final_node, validate_node_configuration,
};

/// A graph ready for evaluation.
///
/// Nothing in a `LogicGraph` changes after construction, so one instance can
/// be shared by any number of concurrent evaluation passes.
#[derive(Debug, Clone)]
pub struct LogicGraph {
    nodes: Vec<NodeDefinition>,
    index: AHashMap<NodeId, usize>,
    input_slots: Vec<Vec<usize>>,
    order: TopologicalOrder,
}

impl LogicGraph {
    /// Builds the arena. Fails on duplicate ids or inputs that name no node.
    ///
    /// A cyclic graph can still be built; evaluating it fails. Run
    /// [`validate`] (or use [`LogicGraph::compile`]) before publishing.
    pub fn new(nodes: Vec<NodeDefinition>) -> Result<Self, NodeConfigurationError> {
        let mut index = AHashMap::with_capacity(nodes.len());
        for (slot, node) in nodes.iter().enumerate() {
            if index.insert(node.id, slot).is_some() {
                return Err(NodeConfigurationError::DuplicateId { node_id: node.id });
            }
        }

        let input_slots = nodes
            .iter()
            .map(|node| {
                node.inputs
                    .iter()
                    .map(|input_id| {
                        index.get(input_id).copied().ok_or(
                            NodeConfigurationError::UnknownInput {
                                node_id: node.id,
                                input_id: *input_id,
                            },
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let order = topological_sort(&nodes);
        debug!(
            "Built graph with {} nodes (cyclic: {})",
            nodes.len(),
            order.has_cycle
        );

        Ok(Self {
            nodes,
            index,
            input_slots,
            order,
        })
    }

    /// Converts, validates and builds a graph in one step. Any validation
    /// error rejects the graph.
    pub fn compile<D: IntoGraph>(definition: D) -> Result<Self, CompileError> {
        let definition = definition.into_graph()?;
        let declared = definition.declared_node_count();
        let errors = validate(&definition.nodes, declared);
        if !errors.is_empty() {
            return Err(CompileError::Invalid(errors));
        }
        Ok(Self::new(definition.nodes)?)
    }

    pub fn nodes(&self) -> &[NodeDefinition] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeDefinition> {
        self.slot(id).map(|slot| &self.nodes[slot])
    }

    /// Arena position of a node id.
    pub fn slot(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Arena positions of the inputs of the node at `slot`, in wiring order.
    pub fn input_slots(&self, slot: usize) -> &[usize] {
        &self.input_slots[slot]
    }

    pub fn order(&self) -> &TopologicalOrder {
        &self.order
    }

    /// Position of the first final node.
    pub fn final_slot(&self) -> Option<usize> {
        self.nodes.iter().position(NodeDefinition::is_final)
    }
}
