//! GeoJSON features and their ordered property maps.

use crate::geometry::Geometry;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Largest magnitude at which an `f64` still holds every integer exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Integral values below this magnitude print in plain decimal notation.
const PLAIN_INTEGER_LIMIT: f64 = 1e21;

/// A property value: text, number, boolean, or a nested mapping (`folder`).
///
/// Numbers that failed to parse are kept as NaN and serialize as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Number(f64),
    Bool(bool),
    Object(Properties),
}

impl PropertyValue {
    /// Returns the string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested mapping if this is an `Object` value.
    pub fn as_object(&self) -> Option<&Properties> {
        match self {
            Self::Object(p) => Some(p),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Properties> for PropertyValue {
    fn from(p: Properties) -> Self {
        Self::Object(p)
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            // Integral values print without a fractional part
            Self::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            // Shortest round-trip digits, zero padded, instead of an exponent
            Self::Number(n) if n.fract() == 0.0 && n.abs() < PLAIN_INTEGER_LIMIT => {
                match n.to_string().parse::<i128>() {
                    Ok(i) => serializer.serialize_i128(i),
                    Err(_) => serializer.serialize_f64(*n),
                }
            }
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Object(p) => p.serialize(serializer),
        }
    }
}

/// Insertion-ordered string-keyed property map.
///
/// Re-inserting an existing key replaces its value in place, so the key keeps
/// its original position in serialized output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PropertyValue> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, PropertyValue)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A GeoJSON Feature: one per KML placemark.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub properties: Properties,
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(properties: Properties, geometry: Option<Geometry>) -> Self {
        Self {
            properties,
            geometry,
        }
    }
}
