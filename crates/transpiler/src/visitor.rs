//! # Double-Dispatch Graph Visitor
//!
//! Decouples "what kind of node is this" from "what do we do about it".
//! Node classes map to a closed [`NodeKind`] enumeration through an
//! immutable table built once; traversal elides reroute nodes transparently
//! and tracks recursion depth for trace output.
//!
//! A concrete transform implements [`GraphVisitor`] and overrides the kinds
//! it supports; every other kind degrades to a "not implemented" warning
//! instead of aborting the pass.

use std::collections::HashMap;
use std::sync::OnceLock;

use uscript_graph::{BlueprintGraph, NodeId, PinId};

use crate::diagnostics::DiagnosticSink;

/// Closed enumeration of the node kinds the transform knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Unknown,
    CallFunction,
    DynamicCast,
    Event,
    VariableGet,
    VariableSet,
    Branch,
    GetSubsystem,
    InputAction,
    MacroInstance,
    Reroute,
    Tunnel,
    FunctionEntry,
    FunctionResult,
    SelfRef,
}

/// Concrete editor class -> kind. Unregistered classes are [`NodeKind::Unknown`].
pub fn node_kind(class: &str) -> NodeKind {
    static KIND_TABLE: OnceLock<HashMap<&'static str, NodeKind>> = OnceLock::new();

    let table = KIND_TABLE.get_or_init(|| {
        HashMap::from([
            ("CallFunction", NodeKind::CallFunction),
            ("DynamicCast", NodeKind::DynamicCast),
            ("Event", NodeKind::Event),
            ("VariableGet", NodeKind::VariableGet),
            ("VariableSet", NodeKind::VariableSet),
            ("IfThenElse", NodeKind::Branch),
            ("GetSubsystem", NodeKind::GetSubsystem),
            ("InputAction", NodeKind::InputAction),
            ("MacroInstance", NodeKind::MacroInstance),
            ("Knot", NodeKind::Reroute),
            ("Tunnel", NodeKind::Tunnel),
            ("FunctionEntry", NodeKind::FunctionEntry),
            ("FunctionResult", NodeKind::FunctionResult),
            ("Self", NodeKind::SelfRef),
        ])
    });

    table.get(class).copied().unwrap_or(NodeKind::Unknown)
}

/// Depth marker for trace output: `|:|:` alternating per level.
pub fn depth_viz(depth: usize) -> String {
    (0..depth).map(|i| if i & 1 == 1 { ':' } else { '|' }).collect()
}

/// Generic walker over a control-flow-linked node graph.
///
/// `exec_pin` follows every link of a pin, skipping through reroute nodes;
/// `exec_node` dispatches on the node's kind. Both return normally on any
/// failure; diagnostics are the only error channel.
pub trait GraphVisitor {
    fn graph(&self) -> &BlueprintGraph;
    fn diagnostics(&mut self) -> &mut DiagnosticSink;
    fn depth(&mut self) -> &mut usize;

    /// Visit every node linked to `pin`. Reroute nodes are elided: traversal
    /// recurses into their own output pins instead of visiting them.
    fn exec_pin(&mut self, pin: PinId) {
        let links = self.graph().pin(pin).links.clone();
        for link in links {
            let owner = self.graph().owner(link).id;
            if self.graph().node(owner).is_reroute() {
                let outs: Vec<PinId> = self
                    .graph()
                    .pins_of(owner)
                    .filter(|p| p.is_output())
                    .map(|p| p.id)
                    .collect();
                for out in outs {
                    self.exec_pin(out);
                }
            } else {
                self.exec_node(owner);
            }
        }
    }

    /// Dispatch a node to its kind handler.
    fn exec_node(&mut self, node: NodeId) {
        *self.depth() += 1;

        let class = self.graph().node(node).class.clone();
        let kind = node_kind(&class);
        let depth = *self.depth();
        tracing::trace!("[VISITOR] {}-> {:?}", depth_viz(depth), kind);

        match kind {
            NodeKind::CallFunction => self.call_function(node),
            NodeKind::DynamicCast => self.dynamic_cast(node),
            NodeKind::Event => self.event(node),
            NodeKind::VariableGet => self.variable_get(node),
            NodeKind::VariableSet => self.variable_set(node),
            NodeKind::Branch => self.branch(node),
            NodeKind::GetSubsystem => self.get_subsystem(node),
            NodeKind::InputAction => self.input_action(node),
            NodeKind::MacroInstance => self.macro_instance(node),
            NodeKind::Reroute => self.reroute(node),
            NodeKind::Tunnel => self.tunnel(node),
            NodeKind::FunctionEntry => self.function_entry(node),
            NodeKind::FunctionResult => self.function_result(node),
            NodeKind::SelfRef => self.self_ref(node),
            NodeKind::Unknown => {
                let viz = depth_viz(depth);
                self.diagnostics()
                    .warning(Some(node), format!("{viz}-> Unknown node class {class}"));
            }
        }

        *self.depth() -= 1;
    }

    // Fallback handlers
    // -----------------
    //
    // A transform overrides the kinds it supports; the rest warn and no-op.

    fn call_function(&mut self, node: NodeId) {
        self.not_implemented(node, "CallFunction");
    }
    fn dynamic_cast(&mut self, node: NodeId) {
        self.not_implemented(node, "DynamicCast");
    }
    fn event(&mut self, node: NodeId) {
        self.not_implemented(node, "Event");
    }
    fn variable_get(&mut self, node: NodeId) {
        self.not_implemented(node, "VariableGet");
    }
    fn variable_set(&mut self, node: NodeId) {
        self.not_implemented(node, "VariableSet");
    }
    fn branch(&mut self, node: NodeId) {
        self.not_implemented(node, "Branch");
    }
    fn get_subsystem(&mut self, node: NodeId) {
        self.not_implemented(node, "GetSubsystem");
    }
    fn input_action(&mut self, node: NodeId) {
        self.not_implemented(node, "InputAction");
    }
    fn macro_instance(&mut self, node: NodeId) {
        self.not_implemented(node, "MacroInstance");
    }
    fn reroute(&mut self, node: NodeId) {
        self.not_implemented(node, "Reroute");
    }
    fn tunnel(&mut self, node: NodeId) {
        self.not_implemented(node, "Tunnel");
    }
    fn function_entry(&mut self, node: NodeId) {
        self.not_implemented(node, "FunctionEntry");
    }
    fn function_result(&mut self, node: NodeId) {
        self.not_implemented(node, "FunctionResult");
    }
    fn self_ref(&mut self, node: NodeId) {
        self.not_implemented(node, "SelfRef");
    }

    fn not_implemented(&mut self, node: NodeId, kind: &str) {
        self.diagnostics()
            .warning(Some(node), format!("{kind} was not implemented"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uscript_graph::{GraphKind, PinDirection, PinType};

    struct CountingVisitor<'a> {
        graph: &'a BlueprintGraph,
        sink: DiagnosticSink,
        depth: usize,
        visited_calls: Vec<NodeId>,
    }

    impl GraphVisitor for CountingVisitor<'_> {
        fn graph(&self) -> &BlueprintGraph {
            self.graph
        }
        fn diagnostics(&mut self) -> &mut DiagnosticSink {
            &mut self.sink
        }
        fn depth(&mut self) -> &mut usize {
            &mut self.depth
        }
        fn call_function(&mut self, node: NodeId) {
            self.visited_calls.push(node);
        }
    }

    #[test]
    fn test_kind_lookup() {
        assert_eq!(node_kind("CallFunction"), NodeKind::CallFunction);
        assert_eq!(node_kind("IfThenElse"), NodeKind::Branch);
        assert_eq!(node_kind("Knot"), NodeKind::Reroute);
        assert_eq!(node_kind("SomethingNew"), NodeKind::Unknown);
    }

    #[test]
    fn test_depth_viz_alternates() {
        assert_eq!(depth_viz(0), "");
        assert_eq!(depth_viz(4), "|:|:");
    }

    #[test]
    fn test_exec_pin_elides_reroute_nodes() {
        let mut graph = BlueprintGraph::new("test", GraphKind::Function);

        let entry = graph.add_node("FunctionEntry");
        let then = graph.add_pin(entry, "then", PinDirection::Output, PinType::exec());

        let knot = graph.add_node("Knot");
        let knot_in = graph.add_pin(knot, "InputPin", PinDirection::Input, PinType::exec());
        let knot_out = graph.add_pin(knot, "OutputPin", PinDirection::Output, PinType::exec());

        let call = graph.add_node("CallFunction");
        let call_exec = graph.add_pin(call, "exec", PinDirection::Input, PinType::exec());

        graph.connect(then, knot_in).unwrap();
        graph.connect(knot_out, call_exec).unwrap();

        let mut visitor = CountingVisitor {
            graph: &graph,
            sink: DiagnosticSink::new(),
            depth: 0,
            visited_calls: Vec::new(),
        };
        visitor.exec_pin(then);

        // The call was dispatched once, the knot never surfaced as a node.
        assert_eq!(visitor.visited_calls, vec![call]);
        assert_eq!(visitor.depth, 0);
    }

    #[test]
    fn test_default_handler_warns_without_aborting() {
        let mut graph = BlueprintGraph::new("test", GraphKind::Function);
        let event = graph.add_node("Event");

        let mut visitor = CountingVisitor {
            graph: &graph,
            sink: DiagnosticSink::new(),
            depth: 0,
            visited_calls: Vec::new(),
        };
        visitor.exec_node(event);

        assert_eq!(visitor.sink.warnings().count(), 1);
    }
}
