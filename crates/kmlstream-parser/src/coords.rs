//! `<coordinates>` text parsing.

use crate::coerce::parse_float_lenient;
use kmlstream_core::Position;

/// Parses a single `x,y[,z]` tuple. A third value of exactly zero is dropped.
pub fn parse_coordinate(text: &str) -> Position {
    let mut position: Position = text.split(',').map(parse_float_lenient).collect();
    if position.len() == 3 && position[2] == 0.0 {
        position.truncate(2);
    }
    position
}

/// Parses a whitespace-separated run of tuples.
///
/// Tuples are split on any run of characters other than digits, `-`, `.` and
/// `,`. Returns `None` for blank text.
pub fn parse_coordinates(text: &str) -> Option<Vec<Position>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(
        text.split(|c: char| !is_coordinate_char(c))
            .filter(|tuple| !tuple.is_empty())
            .map(parse_coordinate)
            .collect(),
    )
}

fn is_coordinate_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '.' | ',')
}
