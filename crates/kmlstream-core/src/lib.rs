//! # kmlstream core
//!
//! Shared building blocks for the kmlstream KML to GeoJSON converter.
//!
//! - **Geometry**: the GeoJSON geometry sum type produced by the converter
//!   (`Point`, `LineString`, `Polygon`, their `Multi*` forms and `GeometryCollection`).
//! - **Features**: `Feature` records with ordered `Properties`.
//! - **Schema**: typed field declarations read from KML `<Schema>` blocks.
//! - **Errors**: `KmlError` and friends, built with `thiserror`.
//! - **Configuration**: converter options, logging and output settings loadable from YAML.
//!
//! ## Example
//!
//! ```
//! use kmlstream_core::{Feature, Geometry, Properties, PropertyValue};
//!
//! let mut properties = Properties::new();
//! properties.insert("name", PropertyValue::from("Fiore Fine Foods"));
//!
//! let feature = Feature::new(
//!     properties,
//!     Some(Geometry::Point { coordinates: vec![-75.1444634, 39.9383731] }),
//! );
//!
//! let json = serde_json::to_string(&feature).unwrap();
//! assert!(json.starts_with(r#"{"type":"Feature""#));
//! ```

pub mod config;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod schema;

// Re-export commonly used types for convenience
pub use config::{AppConfig, ConverterOptions, LogFormat, LoggingConfig, OutputConfig};
pub use error::{ConfigError, KmlError, Result};
pub use feature::{Feature, Properties, PropertyValue};
pub use geometry::{Geometry, GeometryType, Position};
pub use schema::{FieldType, SchemaField};
