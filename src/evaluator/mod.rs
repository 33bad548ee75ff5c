use crate::change::Snapshot;
use crate::error::GraphEvaluationError;
use crate::graph::LogicGraph;
use crate::node::{NodeDefinition, NodeId};
use crate::operator::SchemaCache;
use crate::value::{Document, Value};
use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

mod engine;

use engine::PassEngine;

/// Everything one evaluation pass reads besides the graph.
///
/// Serialized, the fields keep the names the rest of the platform uses:
/// `source` for the data keyed by source-system alias and `__snapshot` for
/// the snapshot returned by the previous pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Document>,
    #[serde(
        rename = "__snapshot",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub snapshot: Option<Snapshot>,
    /// Fixed "now" in epoch milliseconds. Falls back to the wall clock.
    #[serde(skip)]
    pub clock: Option<i64>,
}

impl DataContext {
    pub fn new(source: Document) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_clock(mut self, now_millis: i64) -> Self {
        self.clock = Some(now_millis);
        self
    }

    pub fn now(&self) -> i64 {
        self.clock.unwrap_or_else(wall_clock_millis)
    }
}

fn wall_clock_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// The result of a successful pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationOutcome {
    /// The final node's result.
    pub verdict: bool,
    /// Change detection state for the next pass, merged over every change
    /// detection node. Callers persist it and pass it back via
    /// [`DataContext::with_snapshot`].
    pub snapshot: Snapshot,
    results: AHashMap<NodeId, Value>,
}

impl EvaluationOutcome {
    /// The calculated result of a node. `None` when the node produced no
    /// value (a missing or null provider path, for instance).
    pub fn result(&self, node_id: NodeId) -> Option<&Value> {
        self.results.get(&node_id)
    }
}

/// Evaluates compiled graphs against data contexts.
///
/// An `Evaluator` holds no per-pass state. It can be shared across threads
/// and used with any number of graphs; compiled schemas are cached across
/// passes.
#[derive(Debug, Default)]
pub struct Evaluator {
    schemas: SchemaCache,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    /// Runs one pass of `graph` over `context`.
    ///
    /// Any error discards the partial results of the pass.
    pub fn evaluate(
        &self,
        graph: &LogicGraph,
        context: &DataContext,
    ) -> Result<EvaluationOutcome, GraphEvaluationError> {
        let now = context.now();
        debug!("Evaluating graph of {} nodes at {}", graph.len(), now);

        let pass = PassEngine::new(graph, context, &self.schemas, now).run()?;

        let final_slot = graph
            .final_slot()
            .ok_or(GraphEvaluationError::MissingFinalNode)?;
        let verdict = match &pass.results[final_slot] {
            Some(Value::Bool(verdict)) => *verdict,
            other => {
                return Err(GraphEvaluationError::TypeMismatch {
                    node_id: graph.nodes()[final_slot].id,
                    expected: "a boolean verdict".to_string(),
                    found: format!("{:?}", other),
                });
            }
        };
        debug!("Verdict: {} ({} snapshot entries)", verdict, pass.snapshot.len());

        let results = graph
            .nodes()
            .iter()
            .zip(pass.results)
            .filter_map(|(node, value)| value.map(|v| (node.id, v)))
            .collect();

        Ok(EvaluationOutcome {
            verdict,
            snapshot: pass.snapshot,
            results,
        })
    }

    /// Like [`Evaluator::evaluate`], returning only the verdict.
    pub fn verdict(
        &self,
        graph: &LogicGraph,
        context: &DataContext,
    ) -> Result<bool, GraphEvaluationError> {
        self.evaluate(graph, context).map(|outcome| outcome.verdict)
    }
}

/// One-shot evaluation of a bare node list.
///
/// Builds a throwaway [`LogicGraph`] and evaluator. Prefer building the graph
/// once when the same nodes are evaluated repeatedly.
pub fn evaluate(
    nodes: &[NodeDefinition],
    context: &DataContext,
) -> Result<bool, GraphEvaluationError> {
    let graph = LogicGraph::new(nodes.to_vec()).map_err(|err| {
        GraphEvaluationError::ExecutionFailed {
            node_id: err.node_id().unwrap_or_default(),
            message: err.to_string(),
        }
    })?;
    Evaluator::new().verdict(&graph, context)
}
