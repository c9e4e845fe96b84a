//! # Graph Query Utilities
//!
//! Stateless helpers shared by the transpiler and the debug dump: root
//! discovery, control-flow successor lookup and small string utilities.

use crate::{BlueprintGraph, Node, NodeId, PinId};

/// Every node beginning a control-flow region: at least one exec output pin
/// and no exec input pin, in node-id order.
///
/// An empty result is not an error; the caller reports the region as empty
/// and emits nothing for it.
pub fn find_roots(graph: &BlueprintGraph) -> Vec<NodeId> {
    graph
        .nodes()
        .filter(|node| {
            graph.exec_outputs(node.id).next().is_some()
                && graph.exec_inputs(node.id).next().is_none()
        })
        .map(|node| node.id)
        .collect()
}

/// The unique control-flow successor of a node, following its exec output
/// pins through reroute nodes.
///
/// Fan-out belongs to the branching node kinds; when more than one successor
/// is found here the condition is unsupported, a warning is logged and the
/// first successor in pin declaration order is taken so output stays
/// deterministic.
pub fn find_next_exec_node(graph: &BlueprintGraph, node: NodeId) -> Option<NodeId> {
    let mut next = Vec::new();
    for pin in graph.exec_outputs(node) {
        collect_exec_targets(graph, pin.id, &mut next);
    }

    if next.len() > 1 {
        tracing::warn!(
            "[GRAPH] Unsupported multi exec out ({} successors) on node {:?} '{}'",
            next.len(),
            node,
            graph.node(node).class,
        );
    }

    next.first().copied()
}

fn collect_exec_targets(graph: &BlueprintGraph, pin: PinId, out: &mut Vec<NodeId>) {
    for link in &graph.pin(pin).links {
        let target: &Node = graph.owner(*link);
        if target.is_reroute() {
            for reroute_pin in graph.exec_outputs(target.id) {
                collect_exec_targets(graph, reroute_pin.id, out);
            }
        } else if !out.contains(&target.id) {
            out.push(target.id);
        }
    }
}

/// Join with a pre-sized buffer. Empty input yields an empty string, a
/// single item is returned unseparated.
pub fn join(sep: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let size = sep.len() * (items.len() - 1) + items.iter().map(String::len).sum::<usize>();
    let mut result = String::with_capacity(size);

    for item in &items[..items.len() - 1] {
        result.push_str(item);
        result.push_str(sep);
    }
    result.push_str(&items[items.len() - 1]);
    result
}

/// Display names may carry spaces ("Delta Seconds"); generated identifiers
/// may not.
pub fn make_legal_name(name: &str) -> String {
    name.replace(' ', "_")
}
