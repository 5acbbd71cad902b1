// src/grid/area.rs

use crate::error::{CoverError, CoverResult};
use crate::grid::coordinate::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ganzzahliger Koordinatenbereich eines Gitter-Containers (beide Grenzen inklusiv).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Area {
    /// Erstellt einen neuen Bereich. Invariante: min ≤ max auf beiden Achsen.
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> CoverResult<Self> {
        if min_x > max_x || min_y > max_y {
            return Err(CoverError::InvalidArea {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }

        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Erstellt einen Bereich aus zwei beliebigen Eckpunkten.
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Kleinster Bereich, der alle Koordinaten umschließt.
    pub fn bounding<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coordinates.into_iter();
        let first = iter.next()?;

        let mut area = Self::from_corners(first, first);
        for c in iter {
            area.min_x = area.min_x.min(c.x);
            area.min_y = area.min_y.min(c.y);
            area.max_x = area.max_x.max(c.x);
            area.max_y = area.max_y.max(c.y);
        }

        Some(area)
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Anzahl Spalten.
    pub fn size_x(&self) -> i64 {
        self.max_x as i64 - self.min_x as i64 + 1
    }

    /// Anzahl Zeilen.
    pub fn size_y(&self) -> i64 {
        self.max_y as i64 - self.min_y as i64 + 1
    }

    /// Anzahl Koordinaten im Bereich.
    pub fn count(&self) -> usize {
        (self.size_x() * self.size_y()) as usize
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.x >= self.min_x && c.x <= self.max_x && c.y >= self.min_y && c.y <= self.max_y
    }

    pub fn contains_area(&self, other: &Area) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_y <= other.min_y
            && self.max_y >= other.max_y
    }

    /// Alle Koordinaten des Bereichs, zeilenweise (y außen, x innen).
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..=self.max_y)
            .flat_map(move |y| (min_x..=max_x).map(move |x| Coordinate::new(x, y)))
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Area[({}, {}) to ({}, {})]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_bounds() {
        assert!(Area::new(0, 0, 4, 4).is_ok());
        assert!(Area::new(5, 0, 4, 4).is_err(), "min_x > max_x must fail");
        assert!(Area::new(0, 5, 4, 4).is_err(), "min_y > max_y must fail");
    }

    #[test]
    fn test_sizes_and_count() {
        let a = Area::new(-2, -1, 2, 1).unwrap();
        assert_eq!(a.size_x(), 5);
        assert_eq!(a.size_y(), 3);
        assert_eq!(a.count(), 15);
    }

    #[test]
    fn test_contains() {
        let a = Area::new(-1, -1, 1, 1).unwrap();
        assert!(a.contains(Coordinate::new(0, 0)));
        assert!(a.contains(Coordinate::new(-1, 1)));
        assert!(!a.contains(Coordinate::new(2, 0)));
    }

    #[test]
    fn test_coordinates_row_major() {
        let a = Area::new(0, 0, 1, 1).unwrap();
        let all: Vec<Coordinate> = a.coordinates().collect();
        assert_eq!(
            all,
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(1, 0),
                Coordinate::new(0, 1),
                Coordinate::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_bounding() {
        let coords = [
            Coordinate::new(3, -1),
            Coordinate::new(-2, 4),
            Coordinate::new(0, 0),
        ];
        let a = Area::bounding(coords).unwrap();
        assert_eq!((a.min_x(), a.min_y(), a.max_x(), a.max_y()), (-2, -1, 3, 4));

        assert!(Area::bounding(std::iter::empty()).is_none());
    }
}
