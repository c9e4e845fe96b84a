//! # Pin Type Descriptors
//!
//! A pin's declared value type is a category tag plus an optional backing
//! type-object name. The reserved `Exec` category marks control-flow pins
//! rather than data pins.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinCategory {
    Exec,
    Boolean,
    Byte,
    Int,
    Real,
    String,
    Name,
    Text,
    Struct,
    Object,
    Class,
    Enum,
    Wildcard,
}

impl PinCategory {
    /// Category tag as the editor spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            PinCategory::Exec => "exec",
            PinCategory::Boolean => "bool",
            PinCategory::Byte => "byte",
            PinCategory::Int => "int",
            PinCategory::Real => "real",
            PinCategory::String => "string",
            PinCategory::Name => "name",
            PinCategory::Text => "text",
            PinCategory::Struct => "struct",
            PinCategory::Object => "object",
            PinCategory::Class => "class",
            PinCategory::Enum => "enum",
            PinCategory::Wildcard => "wildcard",
        }
    }
}

impl std::fmt::Display for PinCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinType {
    pub category: PinCategory,
    /// Backing type object, e.g. the struct or class behind an
    /// `Object`/`Struct` category pin.
    #[serde(default)]
    pub sub_object: Option<String>,
}

impl PinType {
    pub fn exec() -> Self {
        Self { category: PinCategory::Exec, sub_object: None }
    }

    pub fn boolean() -> Self {
        Self { category: PinCategory::Boolean, sub_object: None }
    }

    pub fn int() -> Self {
        Self { category: PinCategory::Int, sub_object: None }
    }

    pub fn real() -> Self {
        Self { category: PinCategory::Real, sub_object: None }
    }

    pub fn string() -> Self {
        Self { category: PinCategory::String, sub_object: None }
    }

    pub fn name() -> Self {
        Self { category: PinCategory::Name, sub_object: None }
    }

    pub fn object(sub_object: &str) -> Self {
        Self {
            category: PinCategory::Object,
            sub_object: Some(sub_object.to_string()),
        }
    }

    pub fn strukt(sub_object: &str) -> Self {
        Self {
            category: PinCategory::Struct,
            sub_object: Some(sub_object.to_string()),
        }
    }

    pub fn enumeration(sub_object: &str) -> Self {
        Self {
            category: PinCategory::Enum,
            sub_object: Some(sub_object.to_string()),
        }
    }

    pub fn wildcard() -> Self {
        Self { category: PinCategory::Wildcard, sub_object: None }
    }

    pub fn is_exec(&self) -> bool {
        self.category == PinCategory::Exec
    }

    /// Name used when synthesizing a variable from this type: the backing
    /// type object when one exists, the category tag otherwise.
    pub fn type_name(&self) -> &str {
        self.sub_object.as_deref().unwrap_or(self.category.as_str())
    }
}

impl std::fmt::Display for PinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sub_object {
            Some(obj) => write!(f, "{} ({})", self.category, obj),
            None => write!(f, "{}", self.category),
        }
    }
}
