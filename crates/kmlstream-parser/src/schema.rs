//! Schema registry: typed field declarations keyed by schema reference.
//!
//! `<Schema id="x">` registers a field set under `#x`; `<SchemaData schemaUrl="#x">`
//! activates it again so `<SimpleData>` values can be coerced. Schemas live for
//! the whole document.

use crate::coerce::coerce_value;
use kmlstream_core::{PropertyValue, SchemaField};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

type FieldSet = HashMap<String, SchemaField>;

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemata: HashMap<String, FieldSet>,
    /// Key of the active header set, if any
    active: Option<String>,
    /// Field awaiting a `<displayName>`
    current_field: Option<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<Schema id=...>` open: starts a fresh field set and activates it.
    pub fn begin_schema(&mut self, id: Option<&str>) {
        let key = format!("#{}", id.unwrap_or_default());
        debug!(schema = %key, "registering schema");
        self.schemata.insert(key.clone(), FieldSet::new());
        self.active = Some(key);
    }

    /// `<SchemaData schemaUrl=...>` open: activates a registered field set.
    pub fn begin_schema_data(&mut self, schema_url: Option<&str>) {
        self.active = match schema_url {
            Some(url) if self.schemata.contains_key(url) => Some(url.to_string()),
            Some(url) => {
                warn!(schema_url = %url, "reference to unknown schema");
                None
            }
            None => None,
        };
    }

    /// `<Schema>` or `<SchemaData>` close. The field set itself is kept.
    pub fn end_schema(&mut self) {
        self.active = None;
    }

    /// `<SimpleField name=... type=...>` open.
    pub fn begin_field(&mut self, name: Option<&str>, type_attr: Option<&str>) {
        let (Some(name), Some(fields)) = (name, self.active_fields_mut()) else {
            return;
        };
        fields.insert(name.to_string(), SchemaField::from_type_attr(type_attr));
        self.current_field = Some(name.to_string());
    }

    /// `<SimpleField>` close.
    pub fn end_field(&mut self) {
        self.current_field = None;
    }

    pub fn has_current_field(&self) -> bool {
        self.current_field.is_some()
    }

    /// Attaches a display name to the field currently being declared.
    pub fn set_display_name(&mut self, display_name: &str) {
        let Some(name) = self.current_field.clone() else {
            return;
        };
        if let Some(field) = self.active_fields_mut().and_then(|fields| fields.get_mut(&name)) {
            field.display_name = Some(display_name.to_string());
        }
    }

    /// Looks up a field in the active header set.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.active
            .as_ref()
            .and_then(|key| self.schemata.get(key))
            .and_then(|fields| fields.get(name))
    }

    /// Coerces a `<SimpleData name=...>` value against the active header set.
    ///
    /// Returns the property key (display name, else field name) and the value,
    /// or `None` when the value is dropped.
    pub fn coerce(&self, name: &str, raw: &str) -> Option<(String, PropertyValue)> {
        let Some(field) = self.field(name) else {
            trace!(field = %name, "no declared field, dropping value");
            return None;
        };
        let Some(field_type) = field.field_type else {
            trace!(field = %name, "field has no usable type, dropping value");
            return None;
        };
        let Some(value) = coerce_value(field_type, raw) else {
            trace!(field = %name, ?field_type, "value rejected by coercion");
            return None;
        };
        let key = field.display_name.clone().unwrap_or_else(|| name.to_string());
        Some((key, value))
    }

    fn active_fields_mut(&mut self) -> Option<&mut FieldSet> {
        let key = self.active.as_ref()?;
        self.schemata.get_mut(key)
    }
}
