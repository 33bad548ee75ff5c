//! The node model: immutable vertex definitions of a logic graph.
//!
//! Definitions carry identity, ordered input wiring and configuration only.
//! Results live in a per-pass buffer owned by the evaluator, so one graph can
//! be evaluated by many passes at once.

use crate::change::ChangeDetectionConfig;
use crate::error::NodeConfigurationError;
use crate::operator::LogicOperator;
use crate::value::{Value, ValueType};
use serde::{Deserialize, Serialize};

/// Identifier of a node, unique within one graph.
pub type NodeId = u64;

/// The reserved first segment of every provider path.
pub const SOURCE_ROOT: &str = "source";

/// A single vertex of a logic graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    /// Ordered input wiring. Order matters for asymmetric operators.
    #[serde(default)]
    pub inputs: Vec<NodeId>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// The closed set of node variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    /// A literal value.
    Constant { value: Value },
    /// Resolves `source.<alias>.<field path…>` from the data context.
    Provider {
        #[serde(rename = "jsonPath", alias = "json_path")]
        json_path: String,
    },
    /// Applies an operator to already-calculated inputs.
    Logic { operator: LogicOperator },
    /// A literal JSON-Schema document, as text.
    Schema { schema: String },
    /// Change detection over directly connected provider inputs.
    Config(ChangeDetectionConfig),
    /// The terminal node whose result is the graph's verdict.
    Final,
}

impl NodeDefinition {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            name: String::new(),
            inputs: Vec::new(),
            kind,
        }
    }

    pub fn constant(id: NodeId, value: impl Into<Value>) -> Self {
        Self::new(
            id,
            NodeKind::Constant {
                value: value.into(),
            },
        )
    }

    pub fn provider(id: NodeId, json_path: &str) -> Self {
        Self::new(
            id,
            NodeKind::Provider {
                json_path: json_path.to_string(),
            },
        )
    }

    pub fn logic(id: NodeId, operator: LogicOperator, inputs: &[NodeId]) -> Self {
        Self::new(id, NodeKind::Logic { operator }).with_inputs(inputs)
    }

    pub fn schema(id: NodeId, schema: &str) -> Self {
        Self::new(
            id,
            NodeKind::Schema {
                schema: schema.to_string(),
            },
        )
    }

    pub fn config(id: NodeId, config: ChangeDetectionConfig, inputs: &[NodeId]) -> Self {
        Self::new(id, NodeKind::Config(config)).with_inputs(inputs)
    }

    pub fn final_node(id: NodeId, input: Option<NodeId>) -> Self {
        Self::new(id, NodeKind::Final).with_inputs(input.as_slice())
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_inputs(mut self, inputs: &[NodeId]) -> Self {
        self.inputs = inputs.to_vec();
        self
    }

    /// The declared output type, known without any data.
    pub fn output_type(&self) -> ValueType {
        match &self.kind {
            NodeKind::Constant { value } => value.value_type(),
            NodeKind::Provider { .. } => ValueType::Any,
            NodeKind::Logic { operator } => operator.return_type(),
            NodeKind::Schema { .. } => ValueType::String,
            NodeKind::Config(_) | NodeKind::Final => ValueType::Boolean,
        }
    }

    /// Short variant label used in logs and error messages.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Constant { .. } => "constant",
            NodeKind::Provider { .. } => "provider",
            NodeKind::Logic { .. } => "logic",
            NodeKind::Schema { .. } => "schema",
            NodeKind::Config(_) => "config",
            NodeKind::Final => "final",
        }
    }

    pub fn provider_path(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Provider { json_path } => Some(json_path),
            _ => None,
        }
    }

    pub fn is_provider(&self) -> bool {
        matches!(self.kind, NodeKind::Provider { .. })
    }

    pub fn is_final(&self) -> bool {
        matches!(self.kind, NodeKind::Final)
    }

    pub fn is_config(&self) -> bool {
        matches!(self.kind, NodeKind::Config(_))
    }

    /// Checks the parts of a node's configuration that do not depend on the
    /// rest of the graph.
    pub fn check_configuration(&self) -> Result<(), NodeConfigurationError> {
        match &self.kind {
            NodeKind::Provider { json_path } => check_provider_path(json_path).map_err(|reason| {
                NodeConfigurationError::InvalidProviderPath {
                    node_id: self.id,
                    path: json_path.clone(),
                    reason: reason.to_string(),
                }
            }),
            NodeKind::Final if self.inputs.len() > 1 => {
                Err(NodeConfigurationError::TooManyFinalInputs {
                    node_id: self.id,
                    count: self.inputs.len(),
                })
            }
            NodeKind::Config(config) if config.time_window_millis < 0 => {
                Err(NodeConfigurationError::NegativeTimeWindow {
                    node_id: self.id,
                    millis: config.time_window_millis,
                })
            }
            _ => Ok(()),
        }
    }
}

fn check_provider_path(path: &str) -> Result<(), &'static str> {
    let mut segments = path.split('.');
    if segments.next() != Some(SOURCE_ROOT) {
        return Err("path must start with the 'source' segment");
    }
    let rest: Vec<&str> = segments.collect();
    if rest.is_empty() {
        return Err("path must name at least one segment below 'source'");
    }
    if rest.iter().any(|segment| segment.is_empty()) {
        return Err("path contains an empty segment");
    }
    Ok(())
}

/// Strips the leading `source` segment, giving the path inside the source document.
pub fn source_relative_path(json_path: &str) -> &str {
    json_path
        .strip_prefix(SOURCE_ROOT)
        .map(|rest| rest.strip_prefix('.').unwrap_or(rest))
        .unwrap_or(json_path)
}
