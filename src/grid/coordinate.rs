// src/grid/coordinate.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ganzzahlige Gitterposition. Identität über den Wert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Verhalten eines Elements, das eine feste Gitterposition besitzt.
///
/// Container sprechen ihre Elemente ausschließlich über diese Position an;
/// ein Element behält seine Koordinate über die gesamte Lebensdauer.
pub trait Positioned {
    fn coordinate(&self) -> Coordinate;
}

impl Positioned for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}
