//! Typed field declarations from KML `<Schema>` blocks.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Declared type of a `<SimpleField>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    Uint,
    Short,
    Ushort,
    Float,
    Double,
    Bool,
    String,
}

impl FieldType {
    /// Integer-valued types, parsed as base-10 integers.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Short | Self::Ushort)
    }

    /// Floating point types.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }
}

impl FromStr for FieldType {
    type Err = String;

    /// Matches the `type` attribute exactly; KML type names are lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Int),
            "uint" => Ok(Self::Uint),
            "short" => Ok(Self::Short),
            "ushort" => Ok(Self::Ushort),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "bool" => Ok(Self::Bool),
            "string" => Ok(Self::String),
            other => Err(format!("unsupported field type: {other}")),
        }
    }
}

/// A field declared by `<SimpleField name=... type=...>`.
///
/// `field_type` is `None` when the declaration had no type or an unsupported
/// one; values for such fields are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub field_type: Option<FieldType>,
    pub display_name: Option<String>,
}

impl SchemaField {
    /// Builds a field from the raw `type` attribute.
    pub fn from_type_attr(type_attr: Option<&str>) -> Self {
        Self {
            field_type: type_attr.and_then(|t| t.parse().ok()),
            display_name: None,
        }
    }
}
