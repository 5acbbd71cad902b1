// src/quantified/tile.rs

use crate::error::{CoverError, CoverResult};
use crate::grid::{Area, Coordinate, Positioned, Tile};
use nalgebra::Point2;

/// Nachkommastellen, auf die `scale_factor` gerundet wird, damit abgeleitete
/// Skalierungen reproduzierbar bleiben.
pub const SCALE_FACTOR_DIGITS: u32 = 4;

/// Gitter-Container mit physischen Metadaten: Zellgröße, Zellabstand ("Step",
/// darf die Größe übersteigen, um Lücken zu modellieren) und physischer
/// Position des Referenzelements.
///
/// Die Abbildung ins Kontinuierliche ist
/// `physical(c).x = (c.x - reference.x) * step_x + offset_x` (analog für y).
/// Instanzen sind nach der Konstruktion unveränderlich; `scale` liefert eine
/// neue Instanz.
#[derive(Clone, Debug)]
pub struct QuantifiedTile<T: Positioned> {
    tile: Tile<T>,
    size_x: f64,
    size_y: f64,
    step_x: f64,
    step_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl<T: Positioned> QuantifiedTile<T> {
    /// Standard-Quantifizierung: Größe und Abstand 1, Versatz 0.
    pub fn new(tile: Tile<T>) -> Self {
        Self {
            tile,
            size_x: 1.0,
            size_y: 1.0,
            step_x: 1.0,
            step_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Quantifizierung mit expliziter Zellgröße; der Abstand entspricht der Größe.
    pub fn with_size(tile: Tile<T>, size_x: f64, size_y: f64) -> CoverResult<Self> {
        Self::with_offsets(tile, size_x, size_y, size_x, size_y, 0.0, 0.0)
    }

    /// Quantifizierung mit expliziter Größe und eigenem Zellabstand.
    pub fn with_steps(
        tile: Tile<T>,
        size_x: f64,
        size_y: f64,
        step_x: f64,
        step_y: f64,
    ) -> CoverResult<Self> {
        Self::with_offsets(tile, size_x, size_y, step_x, step_y, 0.0, 0.0)
    }

    /// Vollständige Quantifizierung einschließlich des physischen Versatzes der
    /// Referenzzelle.
    pub fn with_offsets(
        tile: Tile<T>,
        size_x: f64,
        size_y: f64,
        step_x: f64,
        step_y: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> CoverResult<Self> {
        for (name, value) in [("size_x", size_x), ("size_y", size_y)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoverError::InvalidConfiguration {
                    message: format!("{} must be finite and positive, got {}", name, value),
                });
            }
        }

        // Steps dienen als Divisor der Skalenberechnung und dürfen nie 0 sein
        for (name, value) in [("step_x", step_x), ("step_y", step_y)] {
            if !value.is_finite() || value == 0.0 {
                return Err(CoverError::InvalidConfiguration {
                    message: format!("{} must be finite and non-zero, got {}", name, value),
                });
            }
        }

        for (name, value) in [("offset_x", offset_x), ("offset_y", offset_y)] {
            if !value.is_finite() {
                return Err(CoverError::InvalidConfiguration {
                    message: format!("{} must be finite, got {}", name, value),
                });
            }
        }

        Ok(Self {
            tile,
            size_x,
            size_y,
            step_x,
            step_y,
            offset_x,
            offset_y,
        })
    }

    pub fn tile(&self) -> &Tile<T> {
        &self.tile
    }

    pub fn area(&self) -> Area {
        self.tile.area()
    }

    pub fn len(&self) -> usize {
        self.tile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_empty()
    }

    pub fn items(&self) -> &[T] {
        self.tile.items()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.tile.iter()
    }

    pub fn reference(&self) -> Option<&T> {
        self.tile.reference()
    }

    pub fn size_x(&self) -> f64 {
        self.size_x
    }

    pub fn size_y(&self) -> f64 {
        self.size_y
    }

    pub fn step_x(&self) -> f64 {
        self.step_x
    }

    pub fn step_y(&self) -> f64 {
        self.step_y
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Physische Position des Zellzentrums von `c`, sofern eine Referenz existiert.
    pub fn center_of(&self, c: Coordinate) -> Option<Point2<f64>> {
        let origin = self.tile.reference_coordinate()?;
        Some(Point2::new(
            (c.x as f64 - origin.x as f64) * self.step_x + self.offset_x,
            (c.y as f64 - origin.y as f64) * self.step_y + self.offset_y,
        ))
    }

    /// Liefert eine neue Instanz, deren sechs Parameter mit `factor`
    /// multipliziert sind. Die Quelle bleibt unverändert.
    pub fn scale(&self, factor: f64) -> CoverResult<Self>
    where
        T: Clone,
    {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CoverError::InvalidConfiguration {
                message: format!("scale factor must be finite and positive, got {}", factor),
            });
        }

        Self::with_offsets(
            self.tile.clone(),
            self.size_x * factor,
            self.size_y * factor,
            self.step_x * factor,
            self.step_y * factor,
            self.offset_x * factor,
            self.offset_y * factor,
        )
    }

    /// Faktor, der die physische Ausdehnung des Containers in die Zielfläche
    /// einpasst und dabei das Seitenverhältnis erhält. Gerundet auf
    /// [`SCALE_FACTOR_DIGITS`] Nachkommastellen.
    pub fn scale_factor(&self, target_x: f64, target_y: f64) -> CoverResult<f64> {
        let area = self.tile.area();
        let ratio_x = target_x / (area.size_x() as f64 * self.step_x);
        let ratio_y = target_y / (area.size_y() as f64 * self.step_y);

        let factor = ratio_x.min(ratio_y);
        if !factor.is_finite() {
            return Err(CoverError::NumericFailure {
                operation: format!("scale factor for target {} x {}", target_x, target_y),
            });
        }

        let precision = 10f64.powi(SCALE_FACTOR_DIGITS as i32);
        Ok((factor * precision).round() / precision)
    }

    /// Kopiert die physischen Metadaten auf einen anderen Container.
    pub(crate) fn with_tile(&self, tile: Tile<T>) -> Self {
        Self {
            tile,
            size_x: self.size_x,
            size_y: self.size_y,
            step_x: self.step_x,
            step_y: self.step_y,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(span: i32) -> Tile<Coordinate> {
        let area = Area::new(-span, -span, span, span).unwrap();
        Tile::filled(area, Coordinate::new(0, 0), |c| c).unwrap()
    }

    #[test]
    fn test_defaults() {
        let q = QuantifiedTile::new(grid(1));
        assert_eq!(q.size_x(), 1.0);
        assert_eq!(q.step_y(), 1.0);
        assert_eq!(q.offset_x(), 0.0);
    }

    #[test]
    fn test_zero_step_rejected() {
        let err = QuantifiedTile::with_steps(grid(1), 1.0, 1.0, 0.0, 1.0);
        assert!(matches!(err, Err(CoverError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_negative_size_rejected() {
        let err = QuantifiedTile::with_size(grid(1), -1.0, 1.0);
        assert!(matches!(err, Err(CoverError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_center_mapping() {
        let q = QuantifiedTile::with_offsets(grid(2), 1.0, 1.0, 2.0, 3.0, 10.0, -5.0).unwrap();
        let p = q.center_of(Coordinate::new(1, -1)).unwrap();
        assert_relative_eq!(p.x, 12.0);
        assert_relative_eq!(p.y, -8.0);
    }

    #[test]
    fn test_scale_is_linear() {
        let q = QuantifiedTile::with_offsets(grid(2), 2.0, 3.0, 4.0, 5.0, 6.0, 7.0).unwrap();
        let twice = q.scale(1.5).unwrap().scale(2.0).unwrap();
        let once = q.scale(3.0).unwrap();

        assert_relative_eq!(twice.size_x(), once.size_x());
        assert_relative_eq!(twice.size_y(), once.size_y());
        assert_relative_eq!(twice.step_x(), once.step_x());
        assert_relative_eq!(twice.step_y(), once.step_y());
        assert_relative_eq!(twice.offset_x(), once.offset_x());
        assert_relative_eq!(twice.offset_y(), once.offset_y());
    }

    #[test]
    fn test_scale_does_not_mutate_source() {
        let q = QuantifiedTile::with_size(grid(1), 2.0, 2.0).unwrap();
        let _scaled = q.scale(10.0).unwrap();
        assert_relative_eq!(q.size_x(), 2.0);
    }

    #[test]
    fn test_scale_factor_fits_target() {
        // 5x5 Zellen mit Abstand 2: physische Ausdehnung 10 x 10
        let q = QuantifiedTile::with_steps(grid(2), 1.0, 1.0, 2.0, 2.0).unwrap();

        let factor = q.scale_factor(100.0, 50.0).unwrap();
        let scaled = q.scale(factor).unwrap();

        let extent_x = scaled.area().size_x() as f64 * scaled.step_x();
        let extent_y = scaled.area().size_y() as f64 * scaled.step_y();

        // Eine Achse passt exakt, keine überschreitet das Ziel (Rundungstoleranz)
        assert!(extent_x <= 100.0 + 1e-6 && extent_y <= 50.0 + 1e-6);
        assert_relative_eq!(extent_y, 50.0, epsilon = 1e-2);
    }

    #[test]
    fn test_scale_factor_rounding() {
        let q = QuantifiedTile::with_steps(grid(1), 1.0, 1.0, 3.0, 3.0).unwrap();
        // 3 Zellen * Abstand 3 = 9; Ziel 1 -> 1/9 gerundet auf 4 Stellen
        let factor = q.scale_factor(1.0, 1.0).unwrap();
        assert_relative_eq!(factor, 0.1111, epsilon = 1e-12);
    }
}
