use crate::node::{NodeDefinition, NodeId};
use ahash::AHashMap;
use std::collections::VecDeque;

/// The result of ordering a node list so every node follows its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologicalOrder {
    /// Positions into the sorted node slice, inputs first. On a cyclic graph
    /// this is only the acyclic prefix.
    pub sorted: Vec<usize>,
    pub has_cycle: bool,
    /// Ids of the nodes that lie on a cycle, ascending.
    pub cycle_node_ids: Vec<NodeId>,
}

impl TopologicalOrder {
    /// The sorted node ids, for logs and tests.
    pub fn sorted_ids(&self, nodes: &[NodeDefinition]) -> Vec<NodeId> {
        self.sorted.iter().map(|&slot| nodes[slot].id).collect()
    }
}

/// Orders `nodes` with Kahn's algorithm. Edges run from each input to its
/// dependent; input ids that name no node are ignored here and reported by
/// the validator instead.
///
/// Nodes that are never freed are either on a cycle or only reachable through
/// one. `cycle_node_ids` keeps the former only, so the report names exactly the
/// cycle members.
pub fn topological_sort(nodes: &[NodeDefinition]) -> TopologicalOrder {
    let mut slot_of: AHashMap<NodeId, usize> = AHashMap::with_capacity(nodes.len());
    for (slot, node) in nodes.iter().enumerate() {
        slot_of.entry(node.id).or_insert(slot);
    }

    let mut in_degree = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (slot, node) in nodes.iter().enumerate() {
        for input in &node.inputs {
            if let Some(&from) = slot_of.get(input) {
                dependents[from].push(slot);
                in_degree[slot] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&s| in_degree[s] == 0).collect();
    let mut sorted = Vec::with_capacity(nodes.len());
    while let Some(slot) = queue.pop_front() {
        sorted.push(slot);
        for &dependent in &dependents[slot] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if sorted.len() == nodes.len() {
        return TopologicalOrder {
            sorted,
            has_cycle: false,
            cycle_node_ids: Vec::new(),
        };
    }

    let unfreed: Vec<bool> = in_degree.iter().map(|&d| d > 0).collect();
    let on_cycle = cycle_members(&unfreed, &dependents);

    let mut cycle_node_ids: Vec<NodeId> = nodes
        .iter()
        .zip(&on_cycle)
        .filter(|(_, on_cycle)| **on_cycle)
        .map(|(node, _)| node.id)
        .collect();
    cycle_node_ids.sort_unstable();
    cycle_node_ids.dedup();

    TopologicalOrder {
        sorted,
        has_cycle: true,
        cycle_node_ids,
    }
}

/// Marks the unfreed nodes that belong to a strongly connected component of
/// more than one node, or that feed themselves. Tarjan's algorithm, run
/// iteratively over the unfreed subgraph only.
fn cycle_members(unfreed: &[bool], dependents: &[Vec<usize>]) -> Vec<bool> {
    const UNVISITED: usize = usize::MAX;

    let len = unfreed.len();
    let mut index = vec![UNVISITED; len];
    let mut low_link = vec![0usize; len];
    let mut on_stack = vec![false; len];
    let mut stack: Vec<usize> = Vec::new();
    let mut on_cycle = vec![false; len];
    let mut next_index = 0;

    for root in (0..len).filter(|&s| unfreed[s]) {
        if index[root] != UNVISITED {
            continue;
        }
        // (slot, position of the next dependent to visit)
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
        index[root] = next_index;
        low_link[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(frame) = frames.last_mut() {
            let (slot, edge) = *frame;
            if let Some(&next) = dependents[slot].get(edge) {
                frame.1 += 1;
                if !unfreed[next] {
                    continue;
                }
                if index[next] == UNVISITED {
                    index[next] = next_index;
                    low_link[next] = next_index;
                    next_index += 1;
                    stack.push(next);
                    on_stack[next] = true;
                    frames.push((next, 0));
                } else if on_stack[next] {
                    low_link[slot] = low_link[slot].min(index[next]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                low_link[parent] = low_link[parent].min(low_link[slot]);
            }
            if low_link[slot] != index[slot] {
                continue;
            }

            let mut component = Vec::new();
            while let Some(member) = stack.pop() {
                on_stack[member] = false;
                component.push(member);
                if member == slot {
                    break;
                }
            }
            let cyclic = component.len() > 1 || dependents[slot].contains(&slot);
            if cyclic {
                for member in component {
                    on_cycle[member] = true;
                }
            }
        }
    }

    on_cycle
}
