//! Geometry builder: accumulates coordinates for the geometry being parsed and
//! unifies nested `<MultiGeometry>` containers on close.

use crate::coords::{parse_coordinate, parse_coordinates};
use kmlstream_core::{Geometry, GeometryType, Position};
use tracing::debug;

/// Which `<coordinates>` interpretation applies right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeoMode {
    #[default]
    None,
    Point,
    LineString,
    Poly,
    OuterBounds,
    InnerBounds,
}

/// Polygon boundary kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Outer,
    Inner,
}

#[derive(Debug, Default)]
pub struct GeometryBuilder {
    mode: GeoMode,
    current: Option<Geometry>,
    /// One frame per open `<MultiGeometry>`; the last frame is the innermost.
    frames: Vec<Vec<Geometry>>,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GeoMode {
        self.mode
    }

    /// Current `<MultiGeometry>` nesting depth.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn open_point(&mut self) {
        self.current = Some(Geometry::empty_point());
        self.mode = GeoMode::Point;
    }

    pub fn open_line_string(&mut self) {
        self.current = Some(Geometry::empty_line_string());
        self.mode = GeoMode::LineString;
    }

    pub fn open_polygon(&mut self) {
        self.current = Some(Geometry::empty_polygon());
        self.mode = GeoMode::Poly;
    }

    pub fn open_boundary(&mut self, boundary: Boundary) {
        self.mode = match boundary {
            Boundary::Outer => GeoMode::OuterBounds,
            Boundary::Inner => GeoMode::InnerBounds,
        };
    }

    pub fn close_boundary(&mut self) {
        self.mode = GeoMode::Poly;
    }

    /// `<Point>`, `<LineString>` or `<Polygon>` close.
    pub fn close_shape(&mut self) {
        self.mode = GeoMode::None;
        if let Some(frame) = self.frames.last_mut() {
            if let Some(geometry) = self.current.take() {
                frame.push(geometry);
            }
        }
    }

    /// Applies `<coordinates>` text according to the current mode.
    pub fn coordinates(&mut self, text: &str) {
        match (self.mode, self.current.as_mut()) {
            (GeoMode::Point, Some(Geometry::Point { coordinates })) => {
                *coordinates = parse_coordinate(text);
            }
            (GeoMode::LineString, Some(Geometry::LineString { coordinates })) => {
                *coordinates = parse_coordinates(text).unwrap_or_default();
            }
            (GeoMode::OuterBounds, Some(Geometry::Polygon { coordinates })) => {
                // Outer ring always ends up first, whatever order bounds arrive in
                if let Some(ring) = parse_coordinates(text) {
                    coordinates.insert(0, ring);
                }
            }
            (GeoMode::InnerBounds, Some(Geometry::Polygon { coordinates })) => {
                if let Some(ring) = parse_coordinates(text) {
                    coordinates.push(ring);
                }
            }
            _ => {}
        }
    }

    /// `<MultiGeometry>` open: starts a fresh frame.
    pub fn open_multi(&mut self) {
        self.frames.push(Vec::new());
    }

    /// `<MultiGeometry>` close: merges the frame's children and hands the
    /// result to the enclosing frame, or makes it the current geometry.
    pub fn close_multi(&mut self) {
        let Some(children) = self.frames.pop() else {
            return;
        };
        let count = children.len();
        let Some(merged) = merge_geometries(children) else {
            return;
        };
        debug!(
            children = count,
            geometry_type = %merged.geometry_type(),
            depth = self.frames.len(),
            "merged multigeometry"
        );
        match self.frames.last_mut() {
            Some(parent) => {
                parent.push(merged);
                self.current = None;
            }
            None => self.current = Some(merged),
        }
    }

    /// Takes the finished geometry, leaving the slot empty.
    pub fn take(&mut self) -> Option<Geometry> {
        self.current.take()
    }

    /// Forgets all in-flight geometry state.
    pub fn reset(&mut self) {
        self.mode = GeoMode::None;
        self.current = None;
        self.frames.clear();
    }
}

/// Unifies the children of one `<MultiGeometry>` into a single geometry.
///
/// - no children: `None`
/// - one child: that child, unwrapped
/// - children of differing types: `GeometryCollection` of the children
/// - all `Point`/`LineString`/`Polygon`: the matching `Multi*` type
/// - all `GeometryCollection`: one collection with the children's geometries concatenated
/// - all the same `Multi*` type: that type with the children's coordinates concatenated
pub fn merge_geometries(mut children: Vec<Geometry>) -> Option<Geometry> {
    if children.len() <= 1 {
        return children.pop();
    }

    let unified = children[0].geometry_type();
    if children.iter().any(|g| g.geometry_type() != unified) {
        return Some(Geometry::GeometryCollection {
            geometries: children,
        });
    }

    let merged = match unified {
        GeometryType::Point => Geometry::MultiPoint {
            coordinates: children.into_iter().filter_map(point_coords).collect(),
        },
        GeometryType::LineString | GeometryType::MultiPoint => {
            let coordinates = children.into_iter().filter_map(path_coords);
            if unified == GeometryType::LineString {
                Geometry::MultiLineString {
                    coordinates: coordinates.collect(),
                }
            } else {
                Geometry::MultiPoint {
                    coordinates: coordinates.flatten().collect(),
                }
            }
        }
        GeometryType::Polygon | GeometryType::MultiLineString => {
            let coordinates = children.into_iter().filter_map(ring_coords);
            if unified == GeometryType::Polygon {
                Geometry::MultiPolygon {
                    coordinates: coordinates.collect(),
                }
            } else {
                Geometry::MultiLineString {
                    coordinates: coordinates.flatten().collect(),
                }
            }
        }
        GeometryType::MultiPolygon => Geometry::MultiPolygon {
            coordinates: children
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::MultiPolygon { coordinates } => Some(coordinates),
                    _ => None,
                })
                .flatten()
                .collect(),
        },
        GeometryType::GeometryCollection => Geometry::GeometryCollection {
            geometries: children
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::GeometryCollection { geometries } => Some(geometries),
                    _ => None,
                })
                .flatten()
                .collect(),
        },
    };
    Some(merged)
}

fn point_coords(geometry: Geometry) -> Option<Position> {
    match geometry {
        Geometry::Point { coordinates } => Some(coordinates),
        _ => None,
    }
}

fn path_coords(geometry: Geometry) -> Option<Vec<Position>> {
    match geometry {
        Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
            Some(coordinates)
        }
        _ => None,
    }
}

fn ring_coords(geometry: Geometry) -> Option<Vec<Vec<Position>>> {
    match geometry {
        Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
            Some(coordinates)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64) -> Geometry {
        Geometry::Point {
            coordinates: vec![x, y],
        }
    }

    fn line(coords: &[[f64; 2]]) -> Geometry {
        Geometry::LineString {
            coordinates: coords.iter().map(|c| c.to_vec()).collect(),
        }
    }

    #[test]
    fn test_merge_empty_and_single() {
        assert_eq!(merge_geometries(Vec::new()), None);
        assert_eq!(merge_geometries(vec![point(1.0, 2.0)]), Some(point(1.0, 2.0)));
    }

    #[test]
    fn test_merge_points() {
        let merged = merge_geometries(vec![point(1.0, 2.0), point(3.0, 4.0)]);
        assert_eq!(
            merged,
            Some(Geometry::MultiPoint {
                coordinates: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            })
        );
    }

    #[test]
    fn test_merge_mixed() {
        let l = line(&[[0.0, 0.0], [1.0, 1.0]]);
        let merged = merge_geometries(vec![point(1.0, 2.0), l.clone()]);
        assert_eq!(
            merged,
            Some(Geometry::GeometryCollection {
                geometries: vec![point(1.0, 2.0), l],
            })
        );
    }

    #[test]
    fn test_merge_polygons() {
        let ring = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]];
        let polygon = Geometry::Polygon {
            coordinates: vec![ring.clone()],
        };
        let merged = merge_geometries(vec![polygon.clone(), polygon]).unwrap();
        assert_eq!(
            merged,
            Geometry::MultiPolygon {
                coordinates: vec![vec![ring.clone()], vec![ring]],
            }
        );
    }

    #[test]
    fn test_merge_multi_flattens_one_level() {
        let a = Geometry::MultiLineString {
            coordinates: vec![vec![vec![0.0, 0.0], vec![1.0, 1.0]]],
        };
        let b = Geometry::MultiLineString {
            coordinates: vec![vec![vec![2.0, 2.0], vec![3.0, 3.0]]],
        };
        let merged = merge_geometries(vec![a, b]).unwrap();
        assert_eq!(
            merged,
            Geometry::MultiLineString {
                coordinates: vec![
                    vec![vec![0.0, 0.0], vec![1.0, 1.0]],
                    vec![vec![2.0, 2.0], vec![3.0, 3.0]],
                ],
            }
        );
    }

    #[test]
    fn test_merge_collections_flattens() {
        let a = Geometry::GeometryCollection {
            geometries: vec![point(0.0, 0.0)],
        };
        let b = Geometry::GeometryCollection {
            geometries: vec![point(1.0, 1.0), line(&[[0.0, 0.0], [1.0, 0.0]])],
        };
        match merge_geometries(vec![a, b]) {
            Some(Geometry::GeometryCollection { geometries }) => assert_eq!(geometries.len(), 3),
            other => panic!("expected collection, got {:?}", other),
        }
    }

    #[test]
    fn test_polygon_rings_outer_first() {
        let mut builder = GeometryBuilder::new();
        builder.open_polygon();
        builder.open_boundary(Boundary::Inner);
        builder.coordinates("1,1 2,1 2,2 1,1");
        builder.close_boundary();
        builder.open_boundary(Boundary::Outer);
        builder.coordinates("0,0 9,0 9,9 0,0");
        builder.close_boundary();
        builder.open_boundary(Boundary::Inner);
        builder.coordinates("3,3 4,3 4,4 3,3");
        builder.close_boundary();
        builder.close_shape();

        match builder.take() {
            Some(Geometry::Polygon { coordinates }) => {
                assert_eq!(coordinates.len(), 3);
                assert_eq!(coordinates[0][1], vec![9.0, 0.0]);
                assert_eq!(coordinates[1][0], vec![1.0, 1.0]);
                assert_eq!(coordinates[2][0], vec![3.0, 3.0]);
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_multigeometry() {
        let mut builder = GeometryBuilder::new();
        builder.open_multi();
        builder.open_point();
        builder.coordinates("1,1");
        builder.close_shape();
        builder.open_multi();
        builder.open_point();
        builder.coordinates("2,2");
        builder.close_shape();
        builder.open_point();
        builder.coordinates("3,3");
        builder.close_shape();
        builder.close_multi();
        assert_eq!(builder.depth(), 1);
        assert!(builder.take().is_none());
        builder.close_multi();

        assert_eq!(builder.depth(), 0);
        match builder.take() {
            Some(Geometry::GeometryCollection { geometries }) => {
                assert_eq!(geometries[0].geometry_type(), GeometryType::Point);
                assert_eq!(geometries[1].geometry_type(), GeometryType::MultiPoint);
            }
            other => panic!("expected collection, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_multigeometry_yields_nothing() {
        let mut builder = GeometryBuilder::new();
        builder.open_multi();
        builder.close_multi();
        assert!(builder.take().is_none());
    }

    #[test]
    fn test_coordinates_ignored_outside_geometry() {
        let mut builder = GeometryBuilder::new();
        builder.coordinates("1,2");
        assert_eq!(builder.mode(), GeoMode::None);
        assert!(builder.take().is_none());
    }
}
