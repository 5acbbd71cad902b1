// src/circular/coverage.rs

use crate::circular::config::CoverageConfig;
use crate::circular::profile::{CircularProfile, SectorTable, radius_squared};
use crate::grid::{Coordinate, Positioned};
use crate::quantified::QuantifiedTile;
use log::warn;

pub(crate) fn always<T>(_: &T) -> bool {
    true
}

/// Lazy ausgewerteter Abdeckungslauf über einen quantifizierten Container.
///
/// Liefert pro zugelassenem Element die Anzahl Stützpunkte innerhalb der
/// Profilgrenze. Jede Traversierung rechnet von vorn; es wird nichts
/// zwischengespeichert. Elemente, die das Prädikat ablehnt, werden komplett
/// übersprungen, nicht als Abdeckung 0 gezählt.
pub struct Coverage<'a, T: Positioned, P = fn(&T) -> bool>
where
    P: FnMut(&T) -> bool,
{
    tile: &'a QuantifiedTile<T>,
    items: std::slice::Iter<'a, T>,
    origin: Option<Coordinate>,
    table: SectorTable,
    min_radius2: f64,
    max_radius2: f64,
    config: CoverageConfig,
    predicate: P,
}

impl<'a, T: Positioned, P: FnMut(&T) -> bool> Coverage<'a, T, P> {
    pub(crate) fn new(
        tile: &'a QuantifiedTile<T>,
        profile: &CircularProfile,
        config: CoverageConfig,
        predicate: P,
    ) -> Self {
        let origin = tile.tile().reference_coordinate();
        if origin.is_none() && !tile.is_empty() {
            warn!("coverage query on a container without reference element yields nothing");
        }

        Self {
            tile,
            items: tile.items().iter(),
            origin,
            table: SectorTable::new(profile),
            min_radius2: radius_squared(profile.min_radius()),
            max_radius2: radius_squared(profile.max_radius()),
            config,
            predicate,
        }
    }

    /// Grobprüfung über die vier geometrischen Ecken der Zelle.
    ///
    /// Akzeptiert nur eindeutige Fälle: alle Ecken jenseits des Maximalradius,
    /// alle innerhalb des Minimalradius, oder alle im Mittelband desselben
    /// Profilsektors mit einstimmigem Ergebnis. Zellen, die eine physische
    /// Achse schneiden, werden immer fein abgetastet, weil ihre Winkel- und
    /// Abstandsextrema nicht an den Ecken liegen.
    fn quick_check(&self, origin: Coordinate, c: Coordinate) -> Option<u32> {
        let dx = c.x as f64 - origin.x as f64;
        let dy = c.y as f64 - origin.y as f64;

        let xs = [
            (dx - 0.5) * self.tile.step_x() + self.tile.offset_x(),
            (dx + 0.5) * self.tile.step_x() + self.tile.offset_x(),
        ];
        let ys = [
            -((dy - 0.5) * self.tile.step_y() + self.tile.offset_y()),
            -((dy + 0.5) * self.tile.step_y() + self.tile.offset_y()),
        ];

        let straddles_axis = (xs[0].min(xs[1]) <= 0.0 && xs[0].max(xs[1]) >= 0.0)
            || (ys[0].min(ys[1]) <= 0.0 && ys[0].max(ys[1]) >= 0.0);

        let mut far = 0;
        let mut near = 0;
        let mut mid = 0;
        let mut inside_mid = 0;
        let mut sector: Option<usize> = None;
        let mut sector_stable = true;

        for &x in &xs {
            for &y in &ys {
                let r2 = x * x + y * y;

                if r2 > self.max_radius2 {
                    far += 1;
                } else if r2 < self.min_radius2 {
                    near += 1;
                } else {
                    mid += 1;
                    let s = self.table.sector(y.atan2(x));
                    match sector {
                        None => sector = Some(s),
                        Some(prev) if prev != s => sector_stable = false,
                        _ => {}
                    }
                    if r2 < self.table.radius2(s) {
                        inside_mid += 1;
                    }
                }
            }
        }

        // Alle Ecken innerhalb des Minimalradius: das Maximum des
        // Abstandsquadrats liegt auf einer Ecke, die Zelle ist sicher drin.
        if near == 4 {
            return Some(self.config.max_surface());
        }

        if straddles_axis {
            return None;
        }

        if far == 4 {
            return Some(0);
        }

        if mid == 4 && sector_stable {
            if inside_mid == 4 {
                return Some(self.config.max_surface());
            }
            if inside_mid == 0 {
                return Some(0);
            }
        }

        None
    }

    /// Feinabtastung: volles Raster gemäß Konfiguration.
    fn full_sample(&self, origin: Coordinate, c: Coordinate) -> u32 {
        let table = &self.table;
        let (min2, max2) = (self.min_radius2, self.max_radius2);

        self.tile.sample_cell_polar(
            origin,
            c,
            self.config.steps() as usize,
            self.config.resolution(),
            |x, y, r2| {
                if r2 > max2 {
                    return false;
                }
                if r2 < min2 {
                    return true;
                }
                r2 < table.radius2(table.sector(y.atan2(x)))
            },
        ) as u32
    }
}

impl<'a, T: Positioned, P: FnMut(&T) -> bool> Iterator for Coverage<'a, T, P> {
    type Item = (&'a T, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let origin = self.origin?;

        loop {
            let item = self.items.next()?;
            if !(self.predicate)(item) {
                continue;
            }

            let c = item.coordinate();
            let count = match self.quick_check(origin, c) {
                Some(count) => count,
                None => self.full_sample(origin, c),
            };

            return Some((item, count));
        }
    }
}

impl<T: Positioned> QuantifiedTile<T> {
    /// Abdeckung pro Element: Anzahl Stützpunkte innerhalb der Profilgrenze.
    pub fn points<'a>(
        &'a self,
        profile: &CircularProfile,
        config: CoverageConfig,
    ) -> Coverage<'a, T> {
        Coverage::new(self, profile, config, always as fn(&T) -> bool)
    }

    /// Wie [`points`](Self::points), beschränkt auf Elemente, die das Prädikat
    /// zulässt.
    pub fn points_where<'a, P>(
        &'a self,
        profile: &CircularProfile,
        config: CoverageConfig,
        predicate: P,
    ) -> Coverage<'a, T, P>
    where
        P: FnMut(&T) -> bool,
    {
        Coverage::new(self, profile, config, predicate)
    }

    /// Abdeckung als Anteil an der Gesamtstützpunktzahl.
    pub fn percent<'a>(
        &'a self,
        profile: &CircularProfile,
        config: CoverageConfig,
    ) -> impl Iterator<Item = (&'a T, f64)> {
        let max_surface = config.max_surface() as f64;
        self.points(profile, config)
            .map(move |(e, n)| (e, n as f64 / max_surface))
    }

    /// Wie [`percent`](Self::percent), mit Element-Prädikat.
    pub fn percent_where<'a, P>(
        &'a self,
        profile: &CircularProfile,
        config: CoverageConfig,
        predicate: P,
    ) -> impl Iterator<Item = (&'a T, f64)>
    where
        P: FnMut(&T) -> bool,
    {
        let max_surface = config.max_surface() as f64;
        self.points_where(profile, config, predicate)
            .map(move |(e, n)| (e, n as f64 / max_surface))
    }
}
