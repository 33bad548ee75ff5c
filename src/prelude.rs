//! Prelude module for convenient imports
//!
//! Re-exports the types needed to build, compile and evaluate a graph.
//!
//! ```rust,no_run
//! use logic_graph::prelude::*;
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("path/to/graph.json")?;
//! let graph = LogicGraph::compile(GraphDefinition::from_json(&json)?)?;
//! let verdict = Evaluator::new().verdict(&graph, &DataContext::default())?;
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::change::{ChangeDetectionConfig, DetectionMode, Snapshot, SnapshotEntry};
pub use crate::definition::{GraphDefinition, IntoGraph};
pub use crate::node::{NodeDefinition, NodeId, NodeKind};
pub use crate::operator::LogicOperator;
pub use crate::value::{Document, Value, ValueType};

// Compilation and evaluation
pub use crate::evaluator::{DataContext, EvaluationOutcome, Evaluator};
pub use crate::graph::{LogicGraph, validate};

// Error types
pub use crate::error::{
    CompileError, DefinitionError, GraphEvaluationError, NodeConfigurationError,
    OperatorValidationError, ValidationError,
};
