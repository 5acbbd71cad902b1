// src/quantified/sampling.rs
//
// Eck- und Subsample-Primitive der quantifizierten Container sowie die darauf
// aufbauenden Punkt- und Bereichsabfragen. Alle Abfragen reduzieren sich auf
// dieselbe Grundoperation: ein Raster normierter Stützpunkte pro Zelle, das
// durch die physische Abbildung transformiert und gegen ein Prädikat gezählt
// wird.

use crate::error::CoverResult;
use crate::grid::{Area, Coordinate, Positioned, Tile};
use crate::quantified::tile::QuantifiedTile;
use nalgebra::Point2;

/// Obergrenze für abgeleitete Stützpunktraster pro Achse. Entartete (sehr
/// kleine) Abfragerechtecke dürfen das Raster nicht beliebig verfeinern.
pub(crate) const MAX_LOOKUP_STEPS: usize = 64;

impl<T: Positioned> QuantifiedTile<T> {
    /// Zählt die Stützpunkte der Zelle `c`, die `predicate(x, y)` erfüllen.
    ///
    /// Das Raster umfasst `steps` Punkte pro Achse an den normierten Offsets
    /// `-0.5 + i * resolution`; bei `steps == 2`, `resolution == 1` sind das
    /// genau die vier geometrischen Ecken. Die y-Werte der ersten Spalte
    /// werden für die übrigen Spalten wiederverwendet.
    pub(crate) fn sample_cell<F>(
        &self,
        origin: Coordinate,
        c: Coordinate,
        steps: usize,
        resolution: f64,
        mut predicate: F,
    ) -> usize
    where
        F: FnMut(f64, f64) -> bool,
    {
        let dx = c.x as f64 - origin.x as f64;
        let dy = c.y as f64 - origin.y as f64;

        let mut test_y = vec![0.0f64; steps];
        let mut count = 0;

        for i in 0..steps {
            let test_x = (dx - 0.5 + i as f64 * resolution) * self.step_x() + self.offset_x();

            if i == 0 {
                for j in 0..steps {
                    test_y[j] =
                        (dy - 0.5 + j as f64 * resolution) * self.step_y() + self.offset_y();
                    if predicate(test_x, test_y[j]) {
                        count += 1;
                    }
                }
            } else {
                for j in 0..steps {
                    if predicate(test_x, test_y[j]) {
                        count += 1;
                    }
                }
            }
        }

        count
    }

    /// Polare Variante von [`sample_cell`]: liefert dem Prädikat zusätzlich das
    /// Radiusquadrat und arbeitet mit negierter y-Achse, damit die Abtastung
    /// unabhängig von der y-Richtung des Containers in einem festen Quadranten
    /// stattfindet.
    pub(crate) fn sample_cell_polar<F>(
        &self,
        origin: Coordinate,
        c: Coordinate,
        steps: usize,
        resolution: f64,
        mut predicate: F,
    ) -> usize
    where
        F: FnMut(f64, f64, f64) -> bool,
    {
        let dx = c.x as f64 - origin.x as f64;
        let dy = c.y as f64 - origin.y as f64;

        let mut test_y = vec![0.0f64; steps];
        let mut test_y2 = vec![0.0f64; steps];
        let mut count = 0;

        for i in 0..steps {
            let test_x = (dx - 0.5 + i as f64 * resolution) * self.step_x() + self.offset_x();
            let test_x2 = test_x * test_x;

            if i == 0 {
                for j in 0..steps {
                    test_y[j] =
                        -((dy - 0.5 + j as f64 * resolution) * self.step_y() + self.offset_y());
                    test_y2[j] = test_y[j] * test_y[j];
                    if predicate(test_x, test_y[j], test_x2 + test_y2[j]) {
                        count += 1;
                    }
                }
            } else {
                for j in 0..steps {
                    if predicate(test_x, test_y[j], test_x2 + test_y2[j]) {
                        count += 1;
                    }
                }
            }
        }

        count
    }

    /// Das Element, in dessen Zellfläche der physische Punkt `(x, y)` fällt:
    /// alle vier Ecken liegen höchstens einen Zellabstand vom Punkt entfernt.
    pub fn find_at(&self, x: f64, y: f64) -> Option<&T> {
        let origin = self.tile().reference_coordinate()?;
        let (step_x, step_y) = (self.step_x().abs(), self.step_y().abs());

        self.iter().find(|e| {
            self.sample_cell(origin, e.coordinate(), 2, 1.0, |px, py| {
                (px - x).abs() < step_x && (py - y).abs() < step_y
            }) == 4
        })
    }

    /// Alle Elemente, deren Zelle das Rechteck `[min, max]` trifft.
    ///
    /// `strict` verlangt, dass alle vier Ecken im Rechteck liegen (die Zelle
    /// ist vollständig enthalten). Andernfalls genügt ein einziger Stützpunkt;
    /// die Rasterauflösung wird aus dem Verhältnis von Rechteck- zu Zellgröße
    /// abgeleitet und bei 1 gekappt, so dass mindestens die vier echten Ecken
    /// abgetastet werden.
    pub fn coordinates_in(
        &self,
        min: Point2<f64>,
        max: Point2<f64>,
        strict: bool,
    ) -> impl Iterator<Item = &T> {
        let origin = self.tile().reference_coordinate();

        let (steps, resolution, required) = if strict {
            (2usize, 1.0, 4usize)
        } else {
            let ratio_x = (max.x - min.x) / self.step_x().abs();
            let ratio_y = (max.y - min.y) / self.step_y().abs();
            let resolution = ratio_x.min(ratio_y).min(1.0);
            let resolution = if resolution.is_finite() && resolution > 0.0 {
                resolution
            } else {
                1.0
            };
            let steps = ((1.0 / resolution).round() as usize + 1).min(MAX_LOOKUP_STEPS);
            (steps, resolution, 1usize)
        };

        self.iter().filter(move |e| {
            let Some(origin) = origin else {
                return false;
            };
            self.sample_cell(origin, e.coordinate(), steps, resolution, |px, py| {
                px >= min.x && px <= max.x && py >= min.y && py <= max.y
            }) >= required
        })
    }

    /// Neuer Container, beschränkt auf die vollständig im Rechteck liegenden
    /// Zellen. Der Bereich wird auf deren umschließende Box verkleinert; eine
    /// überlebende Referenz bleibt erhalten, andernfalls rückt das erste
    /// verbleibende Element nach. Ein leerer Zuschnitt liefert einen geleerten
    /// Container mit unverändertem Bereich.
    pub fn crop(&self, min: Point2<f64>, max: Point2<f64>) -> CoverResult<Self>
    where
        T: Clone,
    {
        let kept: Vec<T> = self.coordinates_in(min, max, true).cloned().collect();

        if kept.is_empty() {
            let tile = Tile::from_parts(self.area(), Vec::new(), None)?;
            return Ok(self.with_tile(tile));
        }

        let bounds = Area::bounding(kept.iter().map(|e| e.coordinate()))
            .expect("non-empty crop has bounding area");

        let reference = self
            .tile()
            .reference_coordinate()
            .filter(|rc| kept.iter().any(|e| e.coordinate() == *rc))
            .or_else(|| Some(kept[0].coordinate()));

        let tile = Tile::from_parts(bounds, kept, reference)?;
        Ok(self.with_tile(tile))
    }
}
