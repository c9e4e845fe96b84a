//! # Per-Kind Emission Rules
//!
//! One rule per node kind, each composing the pin resolver and the code
//! writer to produce one semantic unit of output before continuing the walk
//! into its control-flow successor(s).
//!
//! Rules that define a callable or emit a statement consult the visited set
//! first; a node reached twice is skipped with a warning, which is what
//! keeps diamond-shaped and cyclic control flow from recursing forever.

use uscript_graph::{query, BlueprintGraph, NodeId, PinId};

use crate::diagnostics::DiagnosticSink;
use crate::visitor::GraphVisitor;

use super::resolver::extract_name;
use super::ScriptTransform;

impl GraphVisitor for ScriptTransform<'_> {
    fn graph(&self) -> &BlueprintGraph {
        self.graph
    }

    fn diagnostics(&mut self) -> &mut DiagnosticSink {
        self.sink
    }

    fn depth(&mut self) -> &mut usize {
        &mut self.depth
    }

    // Callable definitions
    // --------------------

    fn function_entry(&mut self, node: NodeId) {
        if !self.enter_once(node, "FunctionEntry") {
            return;
        }
        let graph = self.graph;
        let entry = graph.node(node);
        let name = entry
            .custom_name
            .as_deref()
            .or(entry.member_name.as_deref())
            .map(query::make_legal_name)
            .unwrap_or_else(|| query::make_legal_name(&graph.name));

        self.write_marker("FunctionEntry");
        self.with_context(|t| {
            // Entry parameters are the node's data outputs; resolving them
            // here binds the names inside the new function scope.
            let (_, _, params) = t.inputs_and_outputs(node);
            t.writer.write_line(&format!("def {}({}):", name, query::join(", ", &params)));

            t.with_indent(|t| {
                t.docstring(&graph.node(node).description);
                match graph.then_pin(node) {
                    Some(then) => t.exec_pin(then),
                    None => t.writer.write_line("pass"),
                }
            });
        });
        self.writer.blank_line();
    }

    fn event(&mut self, node: NodeId) {
        if !self.enter_once(node, "Event") {
            return;
        }
        let graph = self.graph;
        let name = graph
            .node(node)
            .member_name
            .as_deref()
            .map(query::make_legal_name)
            .unwrap_or_else(|| query::make_legal_name(&graph.name));

        self.write_marker("Event");
        self.with_context(|t| {
            let (_, _, params) = t.inputs_and_outputs(node);
            let mut signature = vec!["self".to_string()];
            signature.extend(params);
            t.writer
                .write_line(&format!("def On_{}({}):", name, query::join(", ", &signature)));

            t.with_indent(|t| {
                t.docstring(&graph.node(node).description);
                if let Some(then) = graph.then_pin(node) {
                    t.exec_pin(then);
                }
            });
        });
        self.writer.blank_line();
    }

    fn input_action(&mut self, node: NodeId) {
        if !self.enter_once(node, "InputAction") {
            return;
        }
        let graph = self.graph;
        let name = graph
            .node(node)
            .member_name
            .as_deref()
            .map(query::make_legal_name)
            .unwrap_or_else(|| query::make_legal_name(&graph.name));
        let then = graph.then_pin(node);

        // Dispatch cases: one per exec output, the plain "then" pin excluded.
        let cases: Vec<(PinId, String, bool)> = graph
            .exec_outputs(node)
            .filter(|p| Some(p.id) != then)
            .map(|p| (p.id, query::make_legal_name(&p.name), p.links.is_empty()))
            .collect();

        self.write_marker("InputAction");
        self.with_context(|t| {
            let (_, _, params) = t.inputs_and_outputs(node);
            let mut signature = vec!["self".to_string(), "trigger_event".to_string()];
            signature.extend(params);
            t.writer
                .write_line(&format!("def OnAction_{}({}):", name, query::join(", ", &signature)));

            t.with_indent(|t| {
                t.docstring(&graph.node(node).description);

                if !cases.is_empty() {
                    t.writer.write_line("match trigger_event:");
                    t.with_indent(|t| {
                        for (pin, case_name, unlinked) in &cases {
                            t.writer.write_line(&format!("case {case_name}:"));
                            t.with_scope(|t| {
                                if *unlinked {
                                    t.writer.write_line("pass");
                                } else {
                                    t.exec_pin(*pin);
                                }
                            });
                        }
                    });
                }

                if let Some(then) = then {
                    t.exec_pin(then);
                }
            });
        });
        self.writer.blank_line();
    }

    // Statements
    // ----------

    fn call_function(&mut self, node: NodeId) {
        if !self.enter_once(node, "CallFunction") {
            return;
        }
        let graph = self.graph;
        // Resolving arguments may emit producer statements first.
        let (receiver, args, outs) = self.inputs_and_outputs(node);

        let callee = graph
            .node(node)
            .member_name
            .as_deref()
            .map(query::make_legal_name)
            .unwrap_or_else(|| "UnknownFunction".to_string());
        let target = match receiver {
            Some(receiver) => format!("{receiver}.{callee}"),
            None => callee,
        };
        let prefix = if outs.is_empty() {
            String::new()
        } else {
            format!("{} = ", query::join(", ", &outs))
        };

        self.write_marker("CallFunction");
        if args.is_empty() {
            self.writer.write_line(&format!("{prefix}{target}()"));
        } else {
            self.writer.write_line(&format!("{prefix}{target}("));
            self.with_indent(|t| {
                for arg in &args {
                    t.writer.write_line(&format!("{arg},"));
                }
            });
            self.writer.write_line(")");
        }

        self.continue_chain(node);
    }

    fn dynamic_cast(&mut self, node: NodeId) {
        if !self.enter_once(node, "DynamicCast") {
            return;
        }
        let graph = self.graph;
        let (_, args, outs) = self.inputs_and_outputs(node);
        let target = graph
            .node(node)
            .target_type
            .as_deref()
            .unwrap_or("Unknown");

        self.write_marker("DynamicCast");
        self.writer.write_line(&format!(
            "{} = Cast({}, {})",
            query::join(", ", &outs),
            target,
            query::join(", ", &args)
        ));

        // TODO: route the "Cast Failed" exec pin into an else-style branch;
        // only the success path is generated for now.
        self.continue_chain(node);
    }

    fn variable_set(&mut self, node: NodeId) {
        if !self.enter_once(node, "VariableSet") {
            return;
        }
        let graph = self.graph;
        let name = graph
            .node(node)
            .member_name
            .as_deref()
            .map(query::make_legal_name)
            .unwrap_or_else(|| "Unknown".to_string());
        let value = graph
            .pins_of(node)
            .find(|p| !p.is_exec() && p.is_input())
            .map(|p| p.id);
        let value = match value {
            Some(pin) => self.resolve_input_value(pin),
            None => "MissingLink()".to_string(),
        };

        self.write_marker("VariableSet");
        self.writer.write_line(&format!("self.{name} = {value}"));

        // Downstream reads of the set's output refer to the same slot.
        let outputs: Vec<PinId> = graph
            .pins_of(node)
            .filter(|p| !p.is_exec() && p.is_output())
            .map(|p| p.id)
            .collect();
        for pin in outputs {
            self.bindings.insert(pin, format!("self.{name}"));
        }

        self.continue_chain(node);
    }

    fn get_subsystem(&mut self, node: NodeId) {
        if !self.enter_once(node, "GetSubsystem") {
            return;
        }
        let graph = self.graph;
        let (_, _, outs) = self.inputs_and_outputs(node);
        let class_name = graph
            .node(node)
            .target_type
            .as_deref()
            .unwrap_or("Unknown");

        self.write_marker("GetSubsystem");
        if outs.is_empty() {
            self.writer.write_line(&format!("GetSubsystem({class_name})"));
        } else {
            self.writer.write_line(&format!(
                "{} = GetSubsystem({})",
                query::join(", ", &outs),
                class_name
            ));
        }

        self.continue_chain(node);
    }

    fn function_result(&mut self, node: NodeId) {
        if !self.enter_once(node, "FunctionResult") {
            return;
        }
        let graph = self.graph;

        // Resolve everything first so producer statements land before the
        // marker.
        let inputs: Vec<PinId> = graph
            .pins_of(node)
            .filter(|p| !p.is_exec() && p.is_input())
            .map(|p| p.id)
            .collect();
        let rendered: Vec<String> = inputs
            .iter()
            .map(|pin| {
                let name = query::make_legal_name(&graph.pin(*pin).name);
                let value = self.resolve_input_value(*pin);
                format!("{name} = {value}")
            })
            .collect();

        self.write_marker("FunctionResult");
        let mut names = Vec::new();
        for line in &rendered {
            self.writer.write_line(line);
            names.push(extract_name(line).to_string());
        }

        if names.is_empty() {
            self.writer.write_line("return");
        } else {
            self.writer.write_line(&format!("return {}", query::join(", ", &names)));
        }
    }

    // Control flow
    // ------------

    fn branch(&mut self, node: NodeId) {
        if !self.enter_once(node, "IfThenElse") {
            return;
        }
        let graph = self.graph;
        let condition = graph
            .pins_of(node)
            .find(|p| !p.is_exec() && p.is_input())
            .map(|p| p.id);
        let condition = match condition {
            Some(pin) => self.resolve_input_value(pin),
            None => "MissingLink()".to_string(),
        };

        let then_pin = graph
            .exec_outputs(node)
            .find(|p| p.name.eq_ignore_ascii_case("then"))
            .map(|p| (p.id, p.links.is_empty()));
        let else_pin = graph
            .exec_outputs(node)
            .find(|p| p.name.eq_ignore_ascii_case("else"))
            .map(|p| (p.id, p.links.is_empty()));

        self.write_marker("IfThenElse");
        self.writer.write_line(&format!("if {condition}:"));
        self.with_scope(|t| match then_pin {
            Some((pin, false)) => t.exec_pin(pin),
            _ => t.writer.write_line("pass"),
        });

        // No else block at all when the else branch is unlinked.
        if let Some((pin, false)) = else_pin {
            self.writer.write_line("else:");
            self.with_scope(|t| t.exec_pin(pin));
        }
    }

    fn macro_instance(&mut self, node: NodeId) {
        if !self.enter_once(node, "MacroInstance") {
            return;
        }
        let graph = self.graph;
        let (_, args, _) = self.inputs_and_outputs(node);
        let name = graph
            .node(node)
            .macro_graph
            .as_deref()
            .or(graph.node(node).member_name.as_deref())
            .map(query::make_legal_name)
            .unwrap_or_else(|| "UnknownMacro".to_string());
        let call = format!("{}({})", name, query::join(", ", &args));

        let exits: Vec<(PinId, String, bool)> = graph
            .exec_outputs(node)
            .map(|p| (p.id, query::make_legal_name(&p.name), p.links.is_empty()))
            .collect();

        self.write_marker("MacroInstance");
        match exits.len() {
            0 => self.writer.write_line(&call),
            1 => {
                self.writer.write_line(&call);
                self.exec_pin(exits[0].0);
            }
            _ => {
                self.writer.write_line(&format!("match {call}:"));
                self.with_indent(|t| {
                    for (pin, case_name, unlinked) in &exits {
                        t.writer.write_line(&format!("case {case_name}:"));
                        t.with_scope(|t| {
                            if *unlinked {
                                t.writer.write_line("pass");
                            } else {
                                t.exec_pin(*pin);
                            }
                        });
                    }
                });
            }
        }
    }

    fn tunnel(&mut self, node: NodeId) {
        if !self.enter_once(node, "Tunnel") {
            return;
        }
        // Transparent: bookkeeping only, no emitted statement.
        let _ = self.inputs_and_outputs(node);
        self.continue_chain(node);
    }

    fn reroute(&mut self, node: NodeId) {
        // Normally elided by the traversal; a direct dispatch still forwards
        // control flow, after validating the single-source invariant.
        if !self.enter_once(node, "Reroute") {
            return;
        }
        let graph = self.graph;
        let connected_inputs = graph
            .pins_of(node)
            .filter(|p| p.is_input() && !p.links.is_empty())
            .count();
        if connected_inputs != 1 {
            self.sink.warning(
                Some(node),
                format!("Reroute node has {connected_inputs} connected input sides"),
            );
        }
        self.continue_chain(node);
    }

    // Pure expression nodes
    // ---------------------
    //
    // These never emit statements; they only bind names for whoever
    // resolves them.

    fn variable_get(&mut self, node: NodeId) {
        let graph = self.graph;
        let name = graph
            .node(node)
            .member_name
            .as_deref()
            .map(query::make_legal_name)
            .unwrap_or_else(|| "Unknown".to_string());
        let outputs: Vec<PinId> = graph
            .pins_of(node)
            .filter(|p| !p.is_exec() && p.is_output())
            .map(|p| p.id)
            .collect();
        for pin in outputs {
            self.bindings.insert(pin, name.clone());
        }
    }

    fn self_ref(&mut self, node: NodeId) {
        let graph = self.graph;
        let outputs: Vec<PinId> = graph
            .pins_of(node)
            .filter(|p| p.is_output())
            .map(|p| p.id)
            .collect();
        for pin in outputs {
            self.bindings.insert(pin, "self".to_string());
        }
    }
}
