//! # Pin Resolution
//!
//! Data-flow resolution for the transform: finding the producer behind a
//! pin (through any number of reroute nodes), choosing a stable
//! human-readable name for each produced value, and rendering call
//! arguments and return variables.
//!
//! Resolving an input may trigger emission of its producer node before the
//! current statement is finished — that forced out-of-order, depth-first
//! emission is the scheduling rule the whole engine hangs on.

use std::collections::HashSet;

use itertools::Itertools;
use uscript_graph::{query, NodeId, PinId};

use crate::visitor::{node_kind, GraphVisitor, NodeKind};

use super::ScriptTransform;

/// Generic placeholder pin names that make poor variable names.
const RESERVED_NAMES: &[&str] = &["ReturnValue", "Input", "Output", "self"];

/// Rendered when an input has neither a link nor a default.
const MISSING_LINK: &str = "MissingLink()";

/// Rendered when a producer was emitted but never bound its output.
const MISSING_OBJECT: &str = "MissingObject()";

impl ScriptTransform<'_> {
    // Output naming
    // -------------

    /// Name the value produced by an output pin, reusing the binding when
    /// one exists. The chosen name is recorded in the current scope and in
    /// the pass-wide binding table, so a value computed once is referenced
    /// everywhere it is used.
    pub(crate) fn resolve_output(&mut self, pin: PinId) -> String {
        if let Some(existing) = self.bindings.get(&pin) {
            let existing = existing.clone();
            return self.render_output(&existing, pin);
        }

        let candidates = self.find_all_names(pin);
        let chosen = self.choose_name(&candidates, pin);

        self.current_scope_mut().names.insert(chosen.clone());
        self.bindings.insert(pin, chosen.clone());
        self.render_output(&chosen, pin)
    }

    fn render_output(&self, name: &str, pin: PinId) -> String {
        if self.options.typed_outputs {
            format!("{}: {}", name, self.graph.pin(pin).ty.type_name())
        } else {
            name.to_string()
        }
    }

    /// Candidate names for a produced value: the pin's own declared name
    /// plus the declared name of every linked pin, collected transparently
    /// through reroute nodes. Reserved placeholder names are excluded.
    fn find_all_names(&self, pin: PinId) -> Vec<String> {
        let graph = self.graph;
        let mut raw = vec![graph.pin(pin).name.clone()];
        let mut seen = HashSet::from([pin]);
        self.collect_linked_names(pin, &mut seen, &mut raw);

        raw.into_iter()
            .map(|name| query::make_legal_name(&name))
            .filter(|name| !name.is_empty() && !RESERVED_NAMES.contains(&name.as_str()))
            .unique()
            .collect()
    }

    fn collect_linked_names(&self, pin: PinId, seen: &mut HashSet<PinId>, raw: &mut Vec<String>) {
        let graph = self.graph;
        for link in &graph.pin(pin).links {
            if !seen.insert(*link) {
                continue;
            }
            let owner = graph.owner(*link);
            if owner.is_reroute() {
                for reroute_pin in owner.pins.clone() {
                    if seen.insert(reroute_pin) {
                        self.collect_linked_names(reroute_pin, seen, raw);
                    }
                }
            } else {
                raw.push(graph.pin(*link).name.clone());
            }
        }
    }

    /// Selection policy: a single surviving candidate is used verbatim; no
    /// candidate synthesizes `<TypeName>_<count>`; several prefer the first
    /// not yet used in the current scope. A final collision check appends a
    /// strictly increasing counter, so disambiguation always terminates.
    fn choose_name(&mut self, candidates: &[String], pin: PinId) -> String {
        let scope_count = self.current_scope().names.len();

        let mut chosen = match candidates.len() {
            0 => format!("{}_{}", self.graph.pin(pin).ty.type_name(), scope_count),
            1 => candidates[0].clone(),
            _ => candidates
                .iter()
                .find(|c| !self.scope_contains(c))
                .unwrap_or(&candidates[0])
                .clone(),
        };

        if self.scope_contains(&chosen) {
            let mut counter = scope_count;
            loop {
                let candidate = format!("{chosen}_{counter}");
                if !self.scope_contains(&candidate) {
                    chosen = candidate;
                    break;
                }
                counter += 1;
            }
        }

        chosen
    }

    fn scope_contains(&self, name: &str) -> bool {
        self.current_scope().names.contains(name)
    }

    // Input resolution
    // ----------------

    /// The expression an input pin evaluates to: a bound producer name, a
    /// rendered literal default, or an explicit sentinel. Never fails.
    pub(crate) fn resolve_input_value(&mut self, pin: PinId) -> String {
        let graph = self.graph;
        debug_assert!(graph.pin(pin).is_input(), "resolve_input expects an input pin");
        if !graph.pin(pin).is_input() {
            self.sink.error(
                Some(graph.pin(pin).node),
                format!("resolve_input called on output pin '{}'", graph.pin(pin).name),
            );
            return MISSING_LINK.to_string();
        }

        if graph.pin(pin).links.is_empty() {
            return self.render_default(pin);
        }

        let sources = self.trace_sources(pin);
        let Some(source) = sources.first().copied() else {
            return MISSING_LINK.to_string();
        };

        let producer = graph.owner(source).id;
        match node_kind(&graph.node(producer).class) {
            NodeKind::SelfRef => {
                self.bindings.insert(source, "self".to_string());
                "self".to_string()
            }
            NodeKind::VariableGet => {
                let name = graph
                    .node(producer)
                    .member_name
                    .as_deref()
                    .map(query::make_legal_name)
                    .unwrap_or_else(|| MISSING_OBJECT.to_string());
                self.bindings.insert(source, name.clone());
                name
            }
            _ => {
                if !self.visited.contains(&producer) {
                    // Data dependency on a node not yet reached by control
                    // flow: emit it now, before our own statement.
                    self.exec_node(producer);
                }
                match self.bindings.get(&source) {
                    Some(name) => name.clone(),
                    None => {
                        self.sink.verbose(format!(
                            "Producer '{}' left pin '{}' unbound",
                            graph.node(producer).class,
                            graph.pin(source).name
                        ));
                        MISSING_OBJECT.to_string()
                    }
                }
            }
        }
    }

    /// Producing output pins behind an input pin, walking through reroute
    /// nodes. A reroute with more than one connected input side is a
    /// modeling defect: flagged, first source taken.
    fn trace_sources(&mut self, pin: PinId) -> Vec<PinId> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([pin]);
        self.collect_sources(pin, &mut seen, &mut out);

        if out.len() > 1 {
            self.sink.warning(
                Some(self.graph.pin(pin).node),
                format!(
                    "Input '{}' resolves to {} sources, taking the first",
                    self.graph.pin(pin).name,
                    out.len()
                ),
            );
        }
        out
    }

    fn collect_sources(&mut self, pin: PinId, seen: &mut HashSet<PinId>, out: &mut Vec<PinId>) {
        let graph = self.graph;
        for link in graph.pin(pin).links.clone() {
            if !seen.insert(link) {
                continue;
            }
            let owner = graph.owner(link);
            if owner.is_reroute() {
                let inputs: Vec<PinId> = graph
                    .pins_of(owner.id)
                    .filter(|p| p.is_input() && !p.links.is_empty())
                    .map(|p| p.id)
                    .collect();
                if inputs.len() != 1 {
                    self.sink.warning(
                        Some(owner.id),
                        format!("Reroute node has {} connected input sides", inputs.len()),
                    );
                }
                for input in inputs {
                    if seen.insert(input) {
                        self.collect_sources(input, seen, out);
                    }
                }
            } else if graph.pin(link).is_output() {
                out.push(link);
            }
        }
    }

    /// Literal rendering for an unlinked input.
    fn render_default(&mut self, pin: PinId) -> String {
        let graph = self.graph;
        let p = graph.pin(pin);

        if let Some(object) = &p.default_object {
            // Library singletons read as a bare type reference; everything
            // else is reconstructed from its persistent path.
            if let Some(singleton) = object.strip_prefix("Default__") {
                return singleton.to_string();
            }
            return format!("FindObject(\"{object}\")");
        }

        // The hidden world-context pin has a well-known accessor.
        if p.name == "__WorldContext" {
            return "GetWorld()".to_string();
        }

        let Some(value) = &p.default_value else {
            return MISSING_LINK.to_string();
        };

        use uscript_graph::PinCategory::*;
        match p.ty.category {
            Boolean => {
                if value.eq_ignore_ascii_case("true") {
                    "True".to_string()
                } else {
                    "False".to_string()
                }
            }
            String | Text => format!("\"{}\"", value.escape_default()),
            _ if value.contains(',') && !value.starts_with('(') => format!("({value})"),
            _ => value.clone(),
        }
    }

    /// One rendered call argument: `name = value`, or the bare value in
    /// compact mode.
    pub(crate) fn make_argument(&mut self, pin: PinId) -> String {
        let name = query::make_legal_name(&self.graph.pin(pin).name);
        let value = self.resolve_input_value(pin);
        if self.options.named_arguments && !name.is_empty() {
            format!("{name} = {value}")
        } else {
            value
        }
    }

    /// Walk a node's pins in declaration order: the literal `self` pin
    /// becomes the receiver, remaining inputs become rendered arguments,
    /// outputs become bound return variables.
    pub(crate) fn inputs_and_outputs(
        &mut self,
        node: NodeId,
    ) -> (Option<String>, Vec<String>, Vec<String>) {
        let graph = self.graph;
        let mut receiver = None;
        let mut args = Vec::new();
        let mut outs = Vec::new();

        for id in graph.node(node).pins.clone() {
            let pin = graph.pin(id);
            if pin.is_exec() {
                continue;
            }
            if pin.is_input() && pin.name == "self" {
                let value = self.resolve_input_value(id);
                if value != MISSING_LINK {
                    receiver = Some(value);
                }
            } else if pin.is_input() {
                args.push(self.make_argument(id));
            } else {
                outs.push(self.resolve_output(id));
            }
        }

        (receiver, args, outs)
    }
}

/// A bound name out of a rendered argument or return variable, truncated at
/// the first space or type-annotation marker.
pub(crate) fn extract_name(rendered: &str) -> &str {
    rendered.split([' ', ':']).next().unwrap_or(rendered)
}
