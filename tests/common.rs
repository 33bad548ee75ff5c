//! Common test utilities for building graphs and data contexts.
use logic_graph::prelude::*;
use serde_json::json;

#[allow(dead_code)]
pub const CRM_TOTAL: &str = "source.crm.total";
#[allow(dead_code)]
pub const ERP_TOTAL: &str = "source.erp.total";

/// `provider(crm.total) -> config -> final`
#[allow(dead_code)]
pub fn single_provider_graph(config: ChangeDetectionConfig) -> Vec<NodeDefinition> {
    vec![
        NodeDefinition::provider(1, CRM_TOTAL).named("CRM total"),
        NodeDefinition::config(2, config, &[1]).named("changed"),
        NodeDefinition::final_node(3, Some(2)),
    ]
}

/// `provider(crm.total), provider(erp.total) -> config -> final`
#[allow(dead_code)]
pub fn two_provider_graph(config: ChangeDetectionConfig) -> Vec<NodeDefinition> {
    vec![
        NodeDefinition::provider(1, CRM_TOTAL),
        NodeDefinition::provider(2, ERP_TOTAL),
        NodeDefinition::config(3, config, &[1, 2]),
        NodeDefinition::final_node(4, Some(3)),
    ]
}

#[allow(dead_code)]
pub fn compile(nodes: Vec<NodeDefinition>) -> LogicGraph {
    LogicGraph::compile(nodes).unwrap_or_else(|e| panic!("graph should compile: {}", e))
}

/// Source data with both totals set.
#[allow(dead_code)]
pub fn totals(crm: i64, erp: i64) -> Document {
    json!({
        "crm": {"total": crm},
        "erp": {"total": erp}
    })
}

/// Context at a fixed time, optionally carrying a previous snapshot.
#[allow(dead_code)]
pub fn context_at(source: Document, snapshot: Option<Snapshot>, now: i64) -> DataContext {
    let context = DataContext::new(source).with_clock(now);
    match snapshot {
        Some(snapshot) => context.with_snapshot(snapshot),
        None => context,
    }
}
