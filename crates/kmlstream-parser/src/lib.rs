//! Streaming KML to GeoJSON conversion.
//!
//! KML is tokenized with quick-xml and fed, one event at a time, into a state
//! machine that tracks schemas, placemark and folder properties, extended data
//! and (nested) multigeometries. Every closed `<Placemark>` becomes one GeoJSON
//! [`Feature`](kmlstream_core::Feature), produced lazily in document order.
//!
//! # Features
//!
//! - Constant memory per placemark; the document is never buffered whole
//! - Typed `<SimpleData>` coercion from `<Schema>` declarations
//! - `<MultiGeometry>` unification into `Multi*` or `GeometryCollection`
//! - Legacy-compatible `FeatureCollection` envelope writer
//!
//! # Example
//!
//! ```rust
//! use kmlstream_parser::{convert_str, write_collection, features_from_str};
//!
//! let kml = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <kml xmlns="http://www.opengis.net/kml/2.2">
//!   <Document>
//!     <Placemark>
//!       <name>Trailhead</name>
//!       <Point><coordinates>-112.2550785,36.0799335,0</coordinates></Point>
//!     </Placemark>
//!   </Document>
//! </kml>"#;
//!
//! let features = convert_str(kml).expect("Failed to convert KML");
//! assert_eq!(features.len(), 1);
//!
//! let mut out = Vec::new();
//! write_collection(features_from_str(kml), &mut out, false).unwrap();
//! assert!(out.starts_with(b"{\"type\": \"FeatureCollection\""));
//! ```

pub mod coerce;
pub mod coords;
pub mod geometry;
pub mod machine;
pub mod reader;
pub mod schema;
pub mod validate;
pub mod writer;

pub use geometry::{merge_geometries, GeometryBuilder};
pub use machine::KmlMachine;
pub use reader::{convert_str, features_from_reader, features_from_str, KmlReader};
pub use schema::SchemaRegistry;
pub use validate::{validate_feature, ValidationError};
pub use writer::{write_collection, FeatureCollectionWriter};
