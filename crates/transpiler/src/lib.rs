//! # uscript
//!
//! A transpiler turning Blueprint visual node graphs into readable,
//! block-structured script source.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use uscript::{transpile_to_string, TranspileOptions};
//! use uscript_graph::asset;
//!
//! let blueprint = asset::load_blueprint(Path::new("BP_TopDownController.bp.json"))?;
//! let (text, diagnostics) = transpile_to_string(&blueprint, &TranspileOptions::default());
//! println!("{text}");
//! eprintln!("{} diagnostics", diagnostics.len());
//! # Ok::<(), uscript_graph::GraphError>(())
//! ```
//!
//! ## Architecture
//!
//! A single depth-first emission pass per graph region:
//!
//! 1. **Root discovery** — nodes with outgoing but no incoming control flow
//!    start each region (`uscript_graph::query`)
//! 2. **Double dispatch** — a closed node-kind enumeration routes every node
//!    to its emission rule; unknown kinds degrade to diagnostics
//!    ([`visitor`])
//! 3. **Pin resolution** — data dependencies are chased through reroute
//!    nodes to their producer, which is emitted out of order when control
//!    flow has not reached it yet; every produced value gets one stable
//!    name ([`transform`])
//! 4. **Emission** — indented, scoped script text through a buffered writer
//!    with deterministic file placement ([`writer`])
//!
//! Failures never cross the public boundary: a pass always runs to
//! completion, reporting through [`diagnostics`] and greppable sentinel
//! expressions in the emitted text.

pub mod diagnostics;
pub mod frontend;
pub mod options;
pub mod transform;
pub mod visitor;
pub mod writer;

pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use options::TranspileOptions;
pub use transform::{transpile_blueprint, transpile_to_file, transpile_to_string, ScriptTransform};
pub use visitor::{node_kind, GraphVisitor, NodeKind};
pub use writer::CodeWriter;
