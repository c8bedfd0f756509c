//! GeoJSON geometry model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single position: `[x, y]` or `[x, y, z]`.
pub type Position = Vec<f64>;

/// GeoJSON geometry, serialized with its `type` tag.
///
/// Polygon rings are ordered with the outer ring at index 0 and inner rings
/// following in encounter order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPoint { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

/// Discriminant of a [`Geometry`], used when unifying multigeometry children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    /// The GeoJSON `type` string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::MultiPoint => "MultiPoint",
            Self::MultiLineString => "MultiLineString",
            Self::MultiPolygon => "MultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Geometry {
    /// Returns the variant of this geometry.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::Point { .. } => GeometryType::Point,
            Self::LineString { .. } => GeometryType::LineString,
            Self::Polygon { .. } => GeometryType::Polygon,
            Self::MultiPoint { .. } => GeometryType::MultiPoint,
            Self::MultiLineString { .. } => GeometryType::MultiLineString,
            Self::MultiPolygon { .. } => GeometryType::MultiPolygon,
            Self::GeometryCollection { .. } => GeometryType::GeometryCollection,
        }
    }

    /// An empty point, filled in once `<coordinates>` text arrives.
    ///
    /// A `<Point>` without `<coordinates>` is emitted as is, with
    /// `"coordinates": []`, even though that does not pass
    /// `validate_feature`.
    pub fn empty_point() -> Self {
        Self::Point {
            coordinates: Vec::new(),
        }
    }

    /// An empty line string.
    pub fn empty_line_string() -> Self {
        Self::LineString {
            coordinates: Vec::new(),
        }
    }

    /// A polygon with no rings yet.
    pub fn empty_polygon() -> Self {
        Self::Polygon {
            coordinates: Vec::new(),
        }
    }
}
