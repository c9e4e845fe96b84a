//! # Graph Debug Dump
//!
//! Structured trace of a graph's raw shape, for diagnosing a transform gone
//! wrong without opening the editor. Everything goes through `tracing` at
//! debug level; nothing here affects emission.

use crate::{query, BlueprintGraph, Node, NodeId};

/// Log every node with its pins and link counts.
pub fn dump_graph(graph: &BlueprintGraph) {
    tracing::debug!("[GRAPH] Graph: {} ({:?})", graph.name, graph.kind);

    for node in graph.nodes() {
        dump_node(graph, node);
    }
}

fn dump_node(graph: &BlueprintGraph, node: &Node) {
    tracing::debug!("> Node: {} ({:?})", node.class, node.id);
    if let Some(member) = &node.member_name {
        tracing::debug!(">> Member: {}", member);
    }

    tracing::debug!(">> Input Pins:");
    for pin in graph.pins_of(node.id).filter(|p| p.is_input()) {
        tracing::debug!(">>> Name: '{}' {} (Links: {})", pin.name, pin.ty, pin.links.len());
    }

    tracing::debug!(">> Output Pins:");
    for pin in graph.pins_of(node.id).filter(|p| p.is_output()) {
        tracing::debug!(">>> Name: '{}' {} (Links: {})", pin.name, pin.ty, pin.links.len());
    }
}

/// Log the control-flow chains of a graph by following each root.
pub fn traverse_graph(graph: &BlueprintGraph) {
    for root in query::find_roots(graph) {
        tracing::debug!("====================");
        traverse_from(graph, Some(root), 0);
    }
}

fn traverse_from(graph: &BlueprintGraph, node: Option<NodeId>, depth: usize) {
    // The visit cap bounds the trace on cyclic graphs; the transform proper
    // uses its visited set instead.
    if depth > graph.node_count() {
        tracing::debug!("[GRAPH] Traversal exceeded node count, assuming a cycle");
        return;
    }

    let Some(id) = node else {
        return;
    };

    tracing::debug!("> {}{}", "  ".repeat(depth), graph.node(id).class);
    traverse_from(graph, query::find_next_exec_node(graph, id), depth + 1);
}
