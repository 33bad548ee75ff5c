//! Tests for the topological sorter.
mod common;
use logic_graph::graph::topological_sort;
use logic_graph::prelude::*;

#[test]
fn test_two_node_cycle_is_fully_excluded() {
    let nodes = vec![
        NodeDefinition::logic(10, LogicOperator::Not, &[20]),
        NodeDefinition::logic(20, LogicOperator::Not, &[10]),
    ];
    let order = topological_sort(&nodes);
    assert!(order.has_cycle);
    assert!(order.sorted.is_empty());
    assert_eq!(order.cycle_node_ids, vec![10, 20]);
}

#[test]
fn test_acyclic_prefix_survives_a_cycle() {
    let nodes = vec![
        NodeDefinition::provider(1, common::CRM_TOTAL),
        NodeDefinition::constant(2, 5i64),
        NodeDefinition::logic(3, LogicOperator::GreaterThan, &[1, 2]),
        // 4 <-> 5 form a cycle fed by 3
        NodeDefinition::logic(4, LogicOperator::And, &[3, 5]),
        NodeDefinition::logic(5, LogicOperator::Not, &[4]),
        NodeDefinition::final_node(6, Some(5)),
    ];
    let order = topological_sort(&nodes);
    assert!(order.has_cycle);
    let mut sorted = order.sorted_ids(&nodes);
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 2, 3]);
    assert_eq!(order.cycle_node_ids, vec![4, 5]);
}

#[test]
fn test_node_linking_two_cycles_is_not_a_cycle_member() {
    let nodes = vec![
        // 1 <-> 2
        NodeDefinition::logic(1, LogicOperator::And, &[2]),
        NodeDefinition::logic(2, LogicOperator::Not, &[1]),
        // 3 only bridges the two cycles
        NodeDefinition::logic(3, LogicOperator::IsTrue, &[1]),
        // 4 <-> 5, fed by 3
        NodeDefinition::logic(4, LogicOperator::And, &[3, 5]),
        NodeDefinition::logic(5, LogicOperator::Not, &[4]),
        NodeDefinition::final_node(6, Some(5)),
    ];
    let order = topological_sort(&nodes);
    assert!(order.has_cycle);
    assert!(order.sorted.is_empty());
    assert_eq!(order.cycle_node_ids, vec![1, 2, 4, 5]);
}

#[test]
fn test_every_node_follows_its_inputs() {
    let nodes = vec![
        NodeDefinition::final_node(7, Some(6)),
        NodeDefinition::logic(6, LogicOperator::Or, &[4, 5]),
        NodeDefinition::config(5, ChangeDetectionConfig::any_change(), &[1, 2]),
        NodeDefinition::logic(4, LogicOperator::Between, &[1, 2, 3]),
        NodeDefinition::constant(3, 100i64),
        NodeDefinition::provider(2, common::ERP_TOTAL),
        NodeDefinition::provider(1, common::CRM_TOTAL),
    ];
    let order = topological_sort(&nodes);
    assert!(!order.has_cycle);
    assert_eq!(order.sorted.len(), nodes.len());

    let ids = order.sorted_ids(&nodes);
    for node in &nodes {
        let at = ids.iter().position(|&id| id == node.id).unwrap();
        for input in &node.inputs {
            let input_at = ids.iter().position(|id| id == input).unwrap();
            assert!(input_at < at, "{} must come before {}", input, node.id);
        }
    }
}

#[test]
fn test_node_without_inputs_is_a_root() {
    let nodes = vec![NodeDefinition::constant(1, true)];
    let order = topological_sort(&nodes);
    assert_eq!(order.sorted, vec![0]);
    assert!(order.cycle_node_ids.is_empty());
}
