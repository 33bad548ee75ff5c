use super::DataContext;
use crate::change::{Snapshot, detect_changes};
use crate::error::GraphEvaluationError;
use crate::graph::LogicGraph;
use crate::node::{NodeDefinition, NodeKind, SOURCE_ROOT, source_relative_path};
use crate::operator::{Operands, SchemaCache};
use crate::value::{Document, Value, extract_value};
use log::trace;

/// What one pass leaves behind.
pub(super) struct PassResults {
    pub(super) results: Vec<Option<Value>>,
    pub(super) snapshot: Snapshot,
}

/// Runs one evaluation pass. Results live in a vector owned by the pass,
/// indexed by arena slot, so the graph itself is only read.
pub(super) struct PassEngine<'a> {
    graph: &'a LogicGraph,
    context: &'a DataContext,
    schemas: &'a SchemaCache,
    now: i64,
}

impl<'a> PassEngine<'a> {
    pub(super) fn new(
        graph: &'a LogicGraph,
        context: &'a DataContext,
        schemas: &'a SchemaCache,
        now: i64,
    ) -> Self {
        Self {
            graph,
            context,
            schemas,
            now,
        }
    }

    pub(super) fn run(&self) -> Result<PassResults, GraphEvaluationError> {
        let order = self.graph.order();
        if order.has_cycle {
            return Err(GraphEvaluationError::Cycle {
                node_ids: order.cycle_node_ids.clone(),
            });
        }

        let mut results: Vec<Option<Value>> = vec![None; self.graph.len()];
        let mut snapshot = Snapshot::new();

        for &slot in &order.sorted {
            let node = &self.graph.nodes()[slot];
            let value = self.calculate(slot, node, &results, &mut snapshot)?;
            trace!("Node {} ({}) -> {:?}", node.id, node.kind_name(), value);
            results[slot] = value;
        }

        Ok(PassResults { results, snapshot })
    }

    fn calculate(
        &self,
        slot: usize,
        node: &NodeDefinition,
        results: &[Option<Value>],
        snapshot: &mut Snapshot,
    ) -> Result<Option<Value>, GraphEvaluationError> {
        let inputs = self.graph.input_slots(slot);
        match &node.kind {
            NodeKind::Constant { value: Value::Null } => Ok(None),
            NodeKind::Constant { value } => Ok(Some(value.clone())),
            NodeKind::Schema { schema } => Ok(Some(Value::String(schema.clone()))),
            NodeKind::Provider { json_path } => {
                let source = self.source(node)?;
                Ok(extract_value(source, source_relative_path(json_path)))
            }
            NodeKind::Logic { operator } => {
                let wired = inputs
                    .iter()
                    .map(|&s| (&self.graph.nodes()[s], results[s].as_ref()))
                    .collect();
                let source = self.context.source.as_ref();
                let operands = Operands::new(node, wired, source, self.schemas);
                operator.execute(&operands).map(Some)
            }
            NodeKind::Config(config) => {
                let observed: Vec<(&str, Option<&Value>)> = inputs
                    .iter()
                    .filter_map(|&s| {
                        let path = self.graph.nodes()[s].provider_path()?;
                        Some((path, results[s].as_ref()))
                    })
                    .collect();
                let empty = Snapshot::new();
                let previous = self.context.snapshot.as_ref().unwrap_or(&empty);
                let report = detect_changes(config, &observed, previous, self.now);
                trace!(
                    "Config node {}: {} of {} provider(s) changed",
                    node.id,
                    report.changed,
                    observed.len()
                );
                snapshot.extend(report.snapshot);
                Ok(Some(Value::Bool(report.fired)))
            }
            NodeKind::Final => match inputs.first() {
                None => Ok(Some(Value::Bool(true))),
                Some(&input) => match &results[input] {
                    Some(Value::Bool(verdict)) => Ok(Some(Value::Bool(*verdict))),
                    other => Err(GraphEvaluationError::TypeMismatch {
                        node_id: node.id,
                        expected: "a boolean verdict".to_string(),
                        found: other
                            .as_ref()
                            .map_or("nothing".to_string(), |v| v.value_type().to_string()),
                    }),
                },
            },
        }
    }

    /// The source document a provider reads from.
    fn source(&self, node: &NodeDefinition) -> Result<&'a Document, GraphEvaluationError> {
        match self.context.source.as_ref() {
            None => Err(GraphEvaluationError::DataNotFound {
                node_id: node.id,
                key: SOURCE_ROOT.to_string(),
            }),
            Some(source) if !source.is_object() => Err(GraphEvaluationError::TypeMismatch {
                node_id: node.id,
                expected: "a JSON object under 'source'".to_string(),
                found: json_kind(source).to_string(),
            }),
            Some(source) => Ok(source),
        }
    }
}

fn json_kind(document: &Document) -> &'static str {
    match document {
        Document::Null => "null",
        Document::Bool(_) => "a boolean",
        Document::Number(_) => "a number",
        Document::String(_) => "a string",
        Document::Array(_) => "an array",
        Document::Object(_) => "an object",
    }
}
