//! # Transform Diagnostics
//!
//! Everything the transform has to say about a pass goes through here:
//! messages are forwarded to `tracing` and warnings/errors are additionally
//! recorded so callers (and tests) can inspect what happened. No diagnostic
//! ever aborts a pass.

use uscript_graph::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Verbose,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub node: Option<NodeId>,
    pub message: String,
}

/// Per-pass diagnostic collector.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace-level note; logged but not recorded.
    pub fn verbose(&mut self, message: impl AsRef<str>) {
        tracing::trace!("[TRANSPILER] {}", message.as_ref());
    }

    pub fn warning(&mut self, node: Option<NodeId>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("[TRANSPILER] {}", message);
        self.entries.push(Diagnostic { severity: Severity::Warning, node, message });
    }

    pub fn error(&mut self, node: Option<NodeId>, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("[TRANSPILER] {}", message);
        self.entries.push(Diagnostic { severity: Severity::Error, node, message });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
