//! Stored graph definitions and the conversion seam for external mappers.

use crate::error::DefinitionError;
use crate::node::NodeDefinition;
use serde::{Deserialize, Serialize};

/// A node list as stored for one graph version, already mapped from the
/// editor format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDefinition {
    #[serde(default)]
    pub name: String,
    /// The node count recorded alongside the definition. When present, the
    /// validator checks it against the nodes actually compiled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_count: Option<usize>,
    pub nodes: Vec<NodeDefinition>,
}

impl GraphDefinition {
    pub fn new(nodes: Vec<NodeDefinition>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_node_count(mut self, count: usize) -> Self {
        self.node_count = Some(count);
        self
    }

    pub fn declared_node_count(&self) -> usize {
        self.node_count.unwrap_or(self.nodes.len())
    }

    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let definition: GraphDefinition = serde_json::from_str(json)
            .map_err(|e| DefinitionError::JsonParseError(e.to_string()))?;
        if definition.nodes.is_empty() {
            return Err(DefinitionError::ValidationError(
                "graph definition contains no nodes".to_string(),
            ));
        }
        Ok(definition)
    }
}

/// Implemented by whatever produces node lists for the engine, typically a
/// mapper from an editor or storage format.
///
/// ```rust,no_run
/// use logic_graph::prelude::*;
/// use logic_graph::error::DefinitionError;
///
/// struct EditorRule {
///     field: String,
/// }
///
/// impl IntoGraph for EditorRule {
///     fn into_graph(self) -> Result<GraphDefinition, DefinitionError> {
///         if self.field.is_empty() {
///             return Err(DefinitionError::ValidationError("empty field".to_string()));
///         }
///         Ok(GraphDefinition::new(vec![
///             NodeDefinition::provider(1, &format!("source.crm.{}", self.field)),
///             NodeDefinition::config(2, ChangeDetectionConfig::any_change(), &[1]),
///             NodeDefinition::final_node(3, Some(2)),
///         ]))
///     }
/// }
///
/// let graph = LogicGraph::compile(EditorRule { field: "email".to_string() });
/// ```
pub trait IntoGraph {
    fn into_graph(self) -> Result<GraphDefinition, DefinitionError>;
}

impl IntoGraph for GraphDefinition {
    fn into_graph(self) -> Result<GraphDefinition, DefinitionError> {
        Ok(self)
    }
}

impl IntoGraph for Vec<NodeDefinition> {
    fn into_graph(self) -> Result<GraphDefinition, DefinitionError> {
        Ok(GraphDefinition::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::DetectionMode;
    use crate::node::NodeKind;
    use crate::operator::LogicOperator;

    const STORED: &str = r#"{
        "name": "new contacts",
        "nodeCount": 4,
        "nodes": [
            {"id": 1, "type": "provider", "jsonPath": "source.crm.email"},
            {"id": 2, "type": "logic", "operator": "NOT_EMPTY", "inputs": [1]},
            {"id": 3, "type": "config", "mode": "AND", "inputs": [1], "timeWindowEnabled": true, "timeWindowMillis": 500},
            {"id": 4, "type": "final", "inputs": [2]}
        ]
    }"#;

    #[test]
    fn parses_stored_definition() {
        let definition = GraphDefinition::from_json(STORED).unwrap();
        assert_eq!(definition.name, "new contacts");
        assert_eq!(definition.declared_node_count(), 4);
        assert_eq!(
            definition.nodes[1].kind,
            NodeKind::Logic {
                operator: LogicOperator::NotEmpty
            }
        );
        match &definition.nodes[2].kind {
            NodeKind::Config(config) => {
                assert_eq!(config.mode, DetectionMode::And);
                assert!(config.active);
                assert_eq!(config.time_window_millis, 500);
            }
            other => panic!("expected a config node, got {:?}", other),
        }
        assert_eq!(definition.nodes[3].inputs, vec![2]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            GraphDefinition::from_json("{"),
            Err(DefinitionError::JsonParseError(_))
        ));
        assert!(matches!(
            GraphDefinition::from_json(r#"{"nodes": []}"#),
            Err(DefinitionError::ValidationError(_))
        ));
        assert!(matches!(
            GraphDefinition::from_json(r#"{"nodes": [{"id": 1, "type": "teleport"}]}"#),
            Err(DefinitionError::JsonParseError(_))
        ));
    }
}
