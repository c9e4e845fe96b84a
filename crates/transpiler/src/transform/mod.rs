//! # Script Transform
//!
//! The graph-to-text engine. One [`ScriptTransform`] instance walks a single
//! graph region depth-first, composing the pin resolver and the code writer;
//! the free functions at the bottom drive whole Blueprints (class header,
//! variables, then every region).
//!
//! State owned by a pass: the pin -> name binding table, the stack of scope
//! contexts, and the visited-node set. Nothing here is shared between
//! passes or threads.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use uscript_graph::{query, Blueprint, BlueprintGraph, NodeId, PinId};

use crate::diagnostics::DiagnosticSink;
use crate::options::TranspileOptions;
use crate::visitor::GraphVisitor;
use crate::writer::CodeWriter;

mod resolver;
mod rules;

/// One open lexical scope (function/event body, branch body, case body):
/// the variable names already allocated in it.
#[derive(Debug, Default)]
pub(crate) struct ScopeContext {
    pub names: HashSet<String>,
}

/// Depth-first emitter for one graph region.
pub struct ScriptTransform<'a> {
    graph: &'a BlueprintGraph,
    writer: &'a mut CodeWriter,
    options: &'a TranspileOptions,
    sink: &'a mut DiagnosticSink,
    scopes: Vec<ScopeContext>,
    bindings: HashMap<PinId, String>,
    visited: HashSet<NodeId>,
    depth: usize,
}

impl<'a> ScriptTransform<'a> {
    pub fn new(
        graph: &'a BlueprintGraph,
        writer: &'a mut CodeWriter,
        options: &'a TranspileOptions,
        sink: &'a mut DiagnosticSink,
    ) -> Self {
        Self {
            graph,
            writer,
            options,
            sink,
            // The base scope backs anything resolved outside a callable.
            scopes: vec![ScopeContext::default()],
            bindings: HashMap::new(),
            visited: HashSet::new(),
            depth: 0,
        }
    }

    /// Emit every root of the region.
    pub fn run(&mut self) {
        let roots = query::find_roots(self.graph);
        if roots.is_empty() {
            self.sink
                .verbose(format!("Region '{}' has no roots, nothing to emit", self.graph.name));
            return;
        }

        for root in roots {
            self.exec_node(root);
        }
    }

    // Scope and indentation helpers
    // -----------------------------
    //
    // Every indentation or scope change goes through these so entry and exit
    // stay paired on all return paths.

    pub(crate) fn with_indent(&mut self, f: impl FnOnce(&mut Self)) {
        self.writer.indent();
        f(self);
        self.writer.dedent();
    }

    /// New name-allocation context without an indentation change (parameter
    /// resolution happens before the `def` line is written).
    pub(crate) fn with_context(&mut self, f: impl FnOnce(&mut Self)) {
        self.scopes.push(ScopeContext::default());
        f(self);
        self.scopes.pop();
    }

    /// New lexical scope: name context plus one indentation level.
    pub(crate) fn with_scope(&mut self, f: impl FnOnce(&mut Self)) {
        self.scopes.push(ScopeContext::default());
        self.with_indent(f);
        self.scopes.pop();
    }

    pub(crate) fn current_scope(&self) -> &ScopeContext {
        self.scopes.last().expect("the base scope is never popped")
    }

    pub(crate) fn current_scope_mut(&mut self) -> &mut ScopeContext {
        self.scopes.last_mut().expect("the base scope is never popped")
    }

    /// Re-entrancy guard shared by every emitting rule. Returns false (and
    /// records a warning) when the node was already emitted in this pass —
    /// this is what breaks cycles and diamond-shaped control flow.
    pub(crate) fn enter_once(&mut self, node: NodeId, what: &str) -> bool {
        if !self.visited.insert(node) {
            self.sink.warning(
                Some(node),
                format!("{what} node was already emitted, skipping re-entry"),
            );
            return false;
        }
        true
    }

    /// `# KindName` marker line preceding each emitted construct.
    pub(crate) fn write_marker(&mut self, kind: &str) {
        self.writer.write_line(&format!("# {kind}"));
    }

    pub(crate) fn docstring(&mut self, text: &str) {
        let doc = self.writer.format_docstring(text);
        self.writer.write_line(&doc);
    }

    /// Continue into the unique control-flow successor, if any.
    pub(crate) fn continue_chain(&mut self, node: NodeId) {
        if let Some(next) = query::find_next_exec_node(self.graph, node) {
            self.exec_node(next);
        }
    }
}

/// Transpile a whole Blueprint into `writer`: boilerplate import, class
/// header, docstring, variable declarations, then one callable per root per
/// region (function graphs before event pages).
///
/// Always returns; everything that went wrong is in the returned sink.
pub fn transpile_blueprint(
    blueprint: &Blueprint,
    options: &TranspileOptions,
    writer: &mut CodeWriter,
) -> DiagnosticSink {
    let mut sink = DiagnosticSink::new();

    tracing::info!(
        "[TRANSPILER] Transpiling {} ({} graphs, {} variables)",
        blueprint.name,
        blueprint.graphs.len(),
        blueprint.variables.len()
    );

    writer.write_line("from unreal import *");
    writer.blank_line();
    writer.write_line(&format!("class {}({}):", blueprint.name, blueprint.parent_class));

    writer.indent();
    let doc = writer.format_docstring(&blueprint.description);
    writer.write_line(&doc);
    writer.blank_line();

    for variable in &blueprint.variables {
        let default = variable
            .default_value
            .clone()
            .unwrap_or_else(|| "DefaultSubObject()".to_string());
        writer.write_line(&format!("{}: {} = {}", variable.name, variable.var_type, default));
    }
    if !blueprint.variables.is_empty() {
        writer.blank_line();
    }

    for region in blueprint.regions() {
        ScriptTransform::new(region, writer, options, &mut sink).run();
    }
    writer.dedent();

    writer.finish();
    sink
}

/// Transpile into an in-memory string. Used by tests and by callers that
/// want to place the text themselves.
pub fn transpile_to_string(
    blueprint: &Blueprint,
    options: &TranspileOptions,
) -> (String, DiagnosticSink) {
    let mut writer = CodeWriter::buffer();
    let sink = transpile_blueprint(blueprint, options, &mut writer);
    (writer.into_string(), sink)
}

/// Transpile to `<content_root>/<folder>/<name>.us`.
pub fn transpile_to_file(
    blueprint: &Blueprint,
    content_root: &Path,
    options: &TranspileOptions,
) -> DiagnosticSink {
    let mut writer = CodeWriter::open(content_root, &options.folder, &blueprint.name);
    transpile_blueprint(blueprint, options, &mut writer)
}
