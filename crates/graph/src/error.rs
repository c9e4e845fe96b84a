//! Graph-layer error type.
//!
//! Only the fallible edges of the model (asset loading, link construction)
//! surface errors; the transpiler itself reports through diagnostics and
//! never fails across its public boundary.

#[derive(Debug)]
pub enum GraphError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Both endpoints of an attempted link share the same direction.
    LinkDirection { from: String, to: String },
    /// The source text handed to the frontend could not be read as a unit.
    MalformedSource(String),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::Io(err) => write!(f, "i/o error: {err}"),
            GraphError::Json(err) => write!(f, "malformed graph asset: {err}"),
            GraphError::LinkDirection { from, to } => {
                write!(f, "link {from} -> {to} must connect an output to an input")
            }
            GraphError::MalformedSource(msg) => write!(f, "malformed source: {msg}"),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Io(err) => Some(err),
            GraphError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GraphError {
    fn from(err: std::io::Error) -> Self {
        GraphError::Io(err)
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Json(err)
    }
}
