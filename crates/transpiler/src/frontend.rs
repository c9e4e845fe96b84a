//! # Text-to-Graph Frontend (sketch)
//!
//! The reverse direction of the transpiler. Only the interface contract
//! with the shared node/pin model is implemented: class and function
//! headers become a [`Blueprint`] with one function graph per `def`, whose
//! entry node carries one argument pin per parameter, registered in a
//! name -> pin map for later statement lowering.
//!
//! Statement lowering itself is not implemented and says so through a
//! diagnostic per skipped line.

use std::collections::HashMap;

use uscript_graph::{
    Blueprint, BlueprintGraph, GraphError, GraphKind, PinDirection, PinId, PinType,
};

/// Per-function lowering context: argument names mapped to the entry pins
/// that will feed them into the graph.
#[derive(Debug, Default)]
pub struct FrontendContext {
    pub arg_pins: HashMap<String, PinId>,
}

/// A parsed compilation unit: the Blueprint plus one context per function,
/// in declaration order.
#[derive(Debug)]
pub struct ParsedUnit {
    pub blueprint: Blueprint,
    pub contexts: Vec<FrontendContext>,
}

/// Parse script source into graph skeletons.
pub fn parse_source(text: &str) -> Result<ParsedUnit, GraphError> {
    let mut blueprint: Option<Blueprint> = None;
    let mut contexts: Vec<FrontendContext> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with("\"\"\"")
            || line.starts_with("from ")
            || line.starts_with("import ")
        {
            continue;
        }

        if let Some(rest) = line.strip_prefix("class ") {
            // Nested classes are not supported: one class, one Blueprint.
            if blueprint.is_some() {
                return Err(GraphError::MalformedSource(
                    "nested classes are not supported".to_string(),
                ));
            }
            let (name, parent) = parse_class_header(rest, index)?;
            blueprint = Some(Blueprint::new(name, parent));
        } else if let Some(rest) = line.strip_prefix("def ") {
            let Some(bp) = blueprint.as_mut() else {
                return Err(GraphError::MalformedSource(format!(
                    "line {}: def outside a class",
                    index + 1
                )));
            };
            let (name, args) = parse_signature(rest, index)?;

            let mut graph = BlueprintGraph::new(name, GraphKind::Function);
            let entry = graph.add_node("FunctionEntry");
            graph.node_mut(entry).member_name = Some(name.to_string());
            graph.add_pin(entry, "then", PinDirection::Output, PinType::exec());

            let mut context = FrontendContext::default();
            for arg in args {
                let pin = graph.add_pin(entry, arg, PinDirection::Output, PinType::wildcard());
                context.arg_pins.insert(arg.to_string(), pin);
            }

            bp.add_graph(graph);
            contexts.push(context);
        } else {
            tracing::warn!(
                "[FRONTEND] Statement lowering is not implemented, skipping line {}",
                index + 1
            );
        }
    }

    let blueprint = blueprint
        .ok_or_else(|| GraphError::MalformedSource("no class header found".to_string()))?;
    Ok(ParsedUnit { blueprint, contexts })
}

/// `Name(Parent):`
fn parse_class_header(rest: &str, index: usize) -> Result<(&str, &str), GraphError> {
    rest.strip_suffix(':')
        .and_then(|header| header.split_once('('))
        .and_then(|(name, parent)| {
            parent
                .strip_suffix(')')
                .map(|parent| (name.trim(), parent.trim()))
        })
        .ok_or_else(|| {
            GraphError::MalformedSource(format!("line {}: malformed class header", index + 1))
        })
}

/// `name(a, b):`
fn parse_signature(rest: &str, index: usize) -> Result<(&str, Vec<&str>), GraphError> {
    let signature = rest.strip_suffix(':').and_then(|sig| sig.split_once('('));
    let Some((name, args)) = signature else {
        return Err(GraphError::MalformedSource(format!(
            "line {}: malformed function signature",
            index + 1
        )));
    };
    let Some(args) = args.strip_suffix(')') else {
        return Err(GraphError::MalformedSource(format!(
            "line {}: unterminated argument list",
            index + 1
        )));
    };

    let args = args
        .split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty() && *arg != "self")
        .collect();
    Ok((name.trim(), args))
}
