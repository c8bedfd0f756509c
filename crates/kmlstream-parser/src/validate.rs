//! GeoJSON shape validation for emitted features.

use kmlstream_core::{Feature, Geometry, Position};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid position: expected 2 or 3 values, got {0}")]
    InvalidPosition(usize),

    #[error("Non-finite coordinate value in position {0:?}")]
    NonFiniteCoordinate(Position),

    #[error("LineString needs at least 2 positions, got {0}")]
    LineStringTooShort(usize),

    #[error("Polygon ring needs at least 4 positions, got {0}")]
    RingTooShort(usize),

    #[error("Polygon ring is not closed")]
    RingNotClosed,
}

/// Validates a feature's geometry against the GeoJSON shape rules.
///
/// Features without geometry are valid.
pub fn validate_feature(feature: &Feature) -> Result<(), ValidationError> {
    match &feature.geometry {
        Some(geometry) => validate_geometry(geometry),
        None => Ok(()),
    }
}

pub fn validate_geometry(geometry: &Geometry) -> Result<(), ValidationError> {
    match geometry {
        Geometry::Point { coordinates } => validate_position(coordinates),
        Geometry::MultiPoint { coordinates } => coordinates.iter().try_for_each(validate_position),
        Geometry::LineString { coordinates } => validate_line(coordinates),
        Geometry::MultiLineString { coordinates } => coordinates.iter().try_for_each(|l| validate_line(l)),
        Geometry::Polygon { coordinates } => coordinates.iter().try_for_each(|r| validate_ring(r)),
        Geometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .flatten()
            .try_for_each(|r| validate_ring(r)),
        Geometry::GeometryCollection { geometries } => {
            geometries.iter().try_for_each(validate_geometry)
        }
    }
}

fn validate_position(position: &Position) -> Result<(), ValidationError> {
    if !(2..=3).contains(&position.len()) {
        return Err(ValidationError::InvalidPosition(position.len()));
    }
    if position.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::NonFiniteCoordinate(position.clone()));
    }
    Ok(())
}

fn validate_line(line: &[Position]) -> Result<(), ValidationError> {
    if line.len() < 2 {
        return Err(ValidationError::LineStringTooShort(line.len()));
    }
    line.iter().try_for_each(validate_position)
}

fn validate_ring(ring: &[Position]) -> Result<(), ValidationError> {
    if ring.len() < 4 {
        return Err(ValidationError::RingTooShort(ring.len()));
    }
    ring.iter().try_for_each(validate_position)?;
    if ring.first() != ring.last() {
        return Err(ValidationError::RingNotClosed);
    }
    Ok(())
}
