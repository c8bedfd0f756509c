//! The KML conversion state machine.
//!
//! A tokenizer adapter drives [`KmlMachine`] through three entry points,
//! [`on_open`](KmlMachine::on_open), [`on_text`](KmlMachine::on_text) and
//! [`on_close`](KmlMachine::on_close). Tag and attribute names must already be
//! lower-cased. Each `</placemark>` yields exactly one [`Feature`].
//!
//! Nothing here returns an error: unknown tags are ignored, bad values are
//! dropped and missing geometry becomes `null`.

use crate::geometry::{Boundary, GeometryBuilder};
use crate::schema::SchemaRegistry;
use kmlstream_core::{Feature, Properties, PropertyValue};
use tracing::{debug, trace};

/// Key under which the enclosing folder's properties are attached.
pub const FOLDER_KEY: &str = "folder";

/// Looks up an attribute by (lower-cased) name.
pub fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Elements whose text is handled by dedicated rules, or which only carry
/// structure, and so never become catch-all properties.
fn is_claimed(tag: &str) -> bool {
    matches!(
        tag,
        "placemark"
            | "folder"
            | "point"
            | "linestring"
            | "linearring"
            | "polygon"
            | "outerboundaryis"
            | "innerboundaryis"
            | "multigeometry"
            | "coordinates"
            | "extendeddata"
            | "data"
            | "value"
            | "displayname"
            | "schema"
            | "schemadata"
            | "simplefield"
            | "simpledata"
    )
}

/// Transient `<Data name=...>` entry.
#[derive(Debug, Default)]
struct ExtendedDataEntry {
    name: Option<String>,
    display_name: Option<String>,
    value: Option<String>,
}

impl ExtendedDataEntry {
    /// Property key and value, if the entry captured a value and has a key.
    fn into_property(self) -> Option<(String, String)> {
        let value = self.value?;
        let key = self.display_name.or(self.name)?;
        Some((key, value))
    }
}

/// Per-document conversion state.
#[derive(Debug, Default)]
pub struct KmlMachine {
    /// Names of the currently open elements, outermost first
    open_elements: Vec<String>,
    schemas: SchemaRegistry,
    geometry: GeometryBuilder,
    /// Properties of the open placemark
    properties: Option<Properties>,
    /// Properties of the open folder
    folder: Option<Properties>,
    extended: Option<ExtendedDataEntry>,
    /// `name` attribute of the open `<SimpleData>`
    simple_data_name: Option<String>,
    /// Depth of the element whose text is being captured
    capturing: Option<usize>,
    emitted: usize,
}

impl KmlMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of features emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Whether a placemark is currently open.
    pub fn in_placemark(&self) -> bool {
        self.properties.is_some()
    }

    /// Handles an open tag.
    pub fn on_open(&mut self, name: &str, attributes: &[(String, String)]) {
        self.open_elements.push(name.to_string());
        if self.capturing.is_some_and(|depth| self.open_elements.len() <= depth) {
            self.capturing = None;
        }

        match name {
            "simplefield" => self
                .schemas
                .begin_field(attribute(attributes, "name"), attribute(attributes, "type")),
            "schemadata" => self
                .schemas
                .begin_schema_data(attribute(attributes, "schemaurl")),
            "schema" => self.schemas.begin_schema(attribute(attributes, "id")),
            "placemark" => {
                self.properties = Some(Properties::new());
                self.geometry.reset();
            }
            "folder" => {
                let mut folder = Properties::new();
                if let Some(name) = attribute(attributes, "name") {
                    folder.insert("name", PropertyValue::from(name));
                }
                self.folder = Some(folder);
            }
            "data" => {
                self.extended = Some(ExtendedDataEntry {
                    name: attribute(attributes, "name").map(str::to_string),
                    ..Default::default()
                })
            }
            "simpledata" => {
                self.simple_data_name = attribute(attributes, "name").map(str::to_string)
            }
            "point" => self.geometry.open_point(),
            "linestring" => self.geometry.open_line_string(),
            "polygon" => self.geometry.open_polygon(),
            "outerboundaryis" => self.geometry.open_boundary(Boundary::Outer),
            "innerboundaryis" => self.geometry.open_boundary(Boundary::Inner),
            "multigeometry" => self.geometry.open_multi(),
            _ => {}
        }
    }

    /// Handles a text node belonging to the innermost open element.
    pub fn on_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let Some(tag) = self.open_elements.last() else {
            return;
        };

        match tag.as_str() {
            "simpledata" => self.handle_simple_data(text),
            "value" => {
                if let Some(entry) = self.extended.as_mut() {
                    entry.value = Some(text.to_string());
                }
            }
            "displayname" => {
                if let Some(entry) = self.extended.as_mut() {
                    entry.display_name = Some(text.to_string());
                } else if self.schemas.has_current_field() {
                    self.schemas.set_display_name(text);
                }
            }
            "coordinates" => self.geometry.coordinates(text),
            _ => self.capture(text),
        }
    }

    /// Handles a close tag. Returns the finished feature on `</placemark>`.
    pub fn on_close(&mut self, name: &str) -> Option<Feature> {
        if let Some(index) = self.open_elements.iter().rposition(|open| open == name) {
            self.open_elements.truncate(index);
        }
        if self.capturing.is_some_and(|depth| depth > self.open_elements.len()) {
            self.capturing = None;
        }

        match name {
            "placemark" => return Some(self.emit()),
            "schemadata" | "schema" => self.schemas.end_schema(),
            "simplefield" => self.schemas.end_field(),
            "data" => self.finish_extended(),
            "simpledata" => self.simple_data_name = None,
            "folder" => self.folder = None,
            "point" | "linestring" | "polygon" => self.geometry.close_shape(),
            "outerboundaryis" | "innerboundaryis" => self.geometry.close_boundary(),
            "multigeometry" => self.geometry.close_multi(),
            _ => {}
        }
        None
    }

    /// End of input. Unterminated structures are abandoned.
    pub fn finish(&mut self) {
        if self.properties.is_some() {
            debug!("input ended inside a placemark, discarding it");
        }
        self.open_elements.clear();
        self.properties = None;
        self.folder = None;
        self.extended = None;
        self.simple_data_name = None;
        self.capturing = None;
        self.geometry.reset();
    }

    fn handle_simple_data(&mut self, text: &str) {
        let (Some(properties), Some(name)) = (self.properties.as_mut(), self.simple_data_name.as_deref()) else {
            return;
        };
        if let Some((key, value)) = self.schemas.coerce(name, text) {
            properties.insert(key, value);
        }
    }

    fn finish_extended(&mut self) {
        let Some(entry) = self.extended.take() else {
            return;
        };
        let (Some(properties), Some((key, value))) = (self.properties.as_mut(), entry.into_property()) else {
            return;
        };
        properties.insert(key, PropertyValue::String(value));
    }

    /// Stores text of a direct child of the open placemark (or of the open
    /// folder when no placemark is open) under the child's tag name.
    ///
    /// Text split across several nodes of the same element is concatenated;
    /// a later element with the same name replaces the value.
    fn capture(&mut self, text: &str) {
        let depth = self.open_elements.len();
        if depth < 2 {
            return;
        }
        let tag = &self.open_elements[depth - 1];
        if is_claimed(tag) {
            return;
        }

        let target = match (self.open_elements[depth - 2].as_str(), self.properties.as_mut()) {
            ("placemark", Some(properties)) => properties,
            ("folder", None) => match self.folder.as_mut() {
                Some(folder) => folder,
                None => return,
            },
            _ => return,
        };
        if self.capturing == Some(depth) {
            if let Some(PropertyValue::String(existing)) = target.get_mut(tag) {
                existing.push_str(text);
                return;
            }
        }
        trace!(key = %tag, "captured property");
        target.insert(tag.clone(), PropertyValue::String(text.to_string()));
        self.capturing = Some(depth);
    }

    fn emit(&mut self) -> Feature {
        let own = self.properties.take().unwrap_or_default();
        let properties = match &self.folder {
            Some(folder) => {
                let mut merged = Properties::new();
                merged.insert(FOLDER_KEY, PropertyValue::Object(folder.clone()));
                for (key, value) in own.iter() {
                    merged.insert(key, value.clone());
                }
                merged
            }
            None => own,
        };
        let geometry = self.geometry.take();

        self.emitted += 1;
        debug!(
            feature = self.emitted,
            properties = properties.len(),
            geometry = geometry.as_ref().map(|g| g.geometry_type().as_str()).unwrap_or("null"),
            "emitting feature"
        );
        Feature::new(properties, geometry)
    }
}
