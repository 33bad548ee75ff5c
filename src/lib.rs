//! # logic-graph - Trigger Graph Validation and Evaluation
//!
//! **logic-graph** decides whether freshly arrived data from an external
//! system should fire a downstream transformation. The decision is a
//! user-authored directed acyclic graph of typed nodes: providers that read
//! the incoming data, constants and schemas, logic nodes applying one of a
//! fixed set of operators, change detection nodes that compare against the
//! previous run, and a single final node whose result is the verdict.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the graph**: Build [`NodeDefinition`](node::NodeDefinition)s
//!     directly, load a stored [`GraphDefinition`](definition::GraphDefinition)
//!     from JSON, or implement [`IntoGraph`](definition::IntoGraph) for your own
//!     editor format.
//! 2.  **Compile**: [`LogicGraph::compile`](graph::LogicGraph::compile) runs the
//!     validator (cycles, final node, change detection presence, node wiring and
//!     operator signatures) and builds an immutable arena with a cached order.
//! 3.  **Evaluate**: An [`Evaluator`](evaluator::Evaluator) runs the graph
//!     against a [`DataContext`](evaluator::DataContext) and returns the verdict
//!     plus the snapshot to hand back on the next run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logic_graph::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Fire when the CRM total changed and exceeds 10.
//!     let graph = LogicGraph::compile(vec![
//!         NodeDefinition::provider(1, "source.crm.total"),
//!         NodeDefinition::constant(2, 10i64),
//!         NodeDefinition::logic(3, LogicOperator::GreaterThan, &[1, 2]),
//!         NodeDefinition::config(4, ChangeDetectionConfig::any_change(), &[1]),
//!         NodeDefinition::logic(5, LogicOperator::And, &[3, 4]),
//!         NodeDefinition::final_node(6, Some(5)),
//!     ])?;
//!
//!     let evaluator = Evaluator::new();
//!
//!     let first = evaluator.evaluate(&graph, &DataContext::new(json!({"crm": {"total": 12}})))?;
//!     println!("first run fires: {}", first.verdict);
//!
//!     // Same data again, with the snapshot from the first run.
//!     let context = DataContext::new(json!({"crm": {"total": 12}})).with_snapshot(first.snapshot);
//!     let second = evaluator.evaluate(&graph, &context)?;
//!     println!("unchanged data fires: {}", second.verdict);
//!
//!     Ok(())
//! }
//! ```

pub mod change;
pub mod definition;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod node;
pub mod operator;
pub mod prelude;
pub mod value;
