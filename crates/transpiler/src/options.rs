//! # Transpile Options
//!
//! Knobs for the emitted text. Defaults match what the editor menu action
//! produces; the CLI maps its flags onto these.

#[derive(Debug, Clone)]
pub struct TranspileOptions {
    /// Render call arguments as `name = value` rather than bare values.
    pub named_arguments: bool,

    /// Annotate resolved output names with their pin type (`name: Type`).
    /// Mostly useful when eyeballing what the resolver decided.
    pub typed_outputs: bool,

    /// Destination folder below the content root.
    pub folder: String,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            named_arguments: true,
            typed_outputs: false,
            folder: "Scripts".to_string(),
        }
    }
}

impl TranspileOptions {
    /// Options for inspecting resolver decisions: typed output names.
    pub fn typed() -> Self {
        Self { typed_outputs: true, ..Default::default() }
    }

    /// Compact output with positional arguments only.
    pub fn compact() -> Self {
        Self { named_arguments: false, ..Default::default() }
    }
}
