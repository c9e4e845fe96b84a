//! # Graph Asset I/O
//!
//! Blueprints travel as JSON documents; this module is the only place the
//! model touches the filesystem.

use std::fs;
use std::path::Path;

use crate::{Blueprint, GraphError};

/// Load one Blueprint asset. A failed unit is reported to the caller; a
/// batch driver logs it and moves on to the next unit.
pub fn load_blueprint(path: &Path) -> Result<Blueprint, GraphError> {
    let text = fs::read_to_string(path)?;
    let blueprint = serde_json::from_str(&text)?;
    Ok(blueprint)
}

pub fn save_blueprint(path: &Path, blueprint: &Blueprint) -> Result<(), GraphError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(blueprint)?;
    fs::write(path, text)?;
    Ok(())
}
