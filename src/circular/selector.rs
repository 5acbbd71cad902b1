// src/circular/selector.rs

use crate::circular::config::CoverageConfig;
use crate::circular::coverage::always;
use crate::circular::profile::CircularProfile;
use crate::error::CoverResult;
use crate::grid::{Coordinate, Positioned, Tile};
use crate::quantified::QuantifiedTile;
use log::debug;
use std::collections::HashSet;

impl<T: Positioned> QuantifiedTile<T> {
    /// Selektiert Elemente nach ihrer Abdeckung gemäß der konfigurierten
    /// Auswahlklassen. Die Bits wirken unabhängig: INSIDE | UNDER liefert jede
    /// positive Abdeckung, OUTSIDE allein nur die unberührten Zellen.
    pub fn take<'a>(
        &'a self,
        profile: &CircularProfile,
        config: CoverageConfig,
    ) -> impl Iterator<Item = &'a T> {
        self.take_where(profile, config, always as fn(&T) -> bool)
    }

    /// Wie [`take`](Self::take), beschränkt auf Elemente, die das Prädikat
    /// zulässt.
    pub fn take_where<'a, P>(
        &'a self,
        profile: &CircularProfile,
        config: CoverageConfig,
        predicate: P,
    ) -> impl Iterator<Item = &'a T>
    where
        P: FnMut(&T) -> bool,
    {
        self.points_where(profile, config, predicate)
            .filter(move |(_, count)| config.matches(*count))
            .map(|(e, _)| e)
    }

    /// Selektiert und baut einen neuen Container, der auf die Auswahl
    /// beschränkt ist.
    ///
    /// `reference_changed` ist Ein- und Ausgang: nur wenn es bei `true` steht
    /// und die aktuelle Referenz nicht selbst selektiert wurde, wird das erste
    /// selektierte Element zur neuen Referenz (und damit zum neuen physischen
    /// Ursprung). Eine leere Auswahl liefert einen geleerten Container und
    /// erzwingt `false`.
    pub fn take_into(
        &self,
        profile: &CircularProfile,
        config: CoverageConfig,
        reference_changed: &mut bool,
    ) -> CoverResult<Self>
    where
        T: Clone,
    {
        self.take_into_where(profile, config, reference_changed, always::<T>)
    }

    /// Wie [`take_into`](Self::take_into), mit Element-Prädikat.
    pub fn take_into_where<P>(
        &self,
        profile: &CircularProfile,
        config: CoverageConfig,
        reference_changed: &mut bool,
        predicate: P,
    ) -> CoverResult<Self>
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        let selected: Vec<Coordinate> = self
            .take_where(profile, config, predicate)
            .map(|e| e.coordinate())
            .collect();

        debug!(
            "take_into: {} of {} elements selected",
            selected.len(),
            self.len()
        );

        if selected.is_empty() {
            *reference_changed = false;
            let tile = Tile::from_parts(self.area(), Vec::new(), None)?;
            return Ok(self.with_tile(tile));
        }

        let keep: HashSet<Coordinate> = selected.iter().copied().collect();
        let current = self.tile().reference_coordinate();

        *reference_changed =
            *reference_changed && current.is_none_or(|rc| !keep.contains(&rc));

        let reference = if *reference_changed {
            debug!("take_into: reference moves to {}", selected[0]);
            Some(selected[0])
        } else {
            // Eine nicht selektierte Referenz fällt mit den übrigen Elementen weg
            current.filter(|rc| keep.contains(rc))
        };

        let items: Vec<T> = self
            .iter()
            .filter(|e| keep.contains(&e.coordinate()))
            .cloned()
            .collect();

        let tile = Tile::from_parts(self.area(), items, reference)?;
        Ok(self.with_tile(tile))
    }

    /// Euklidischer Abstand jedes Elements (Zellzentrum) vom physischen
    /// Ursprung des Containers, profilunabhängig.
    pub fn distances<'a>(&'a self) -> impl Iterator<Item = (&'a T, f64)> {
        self.distances_where(always as fn(&T) -> bool)
    }

    /// Wie [`distances`](Self::distances), mit Element-Prädikat.
    pub fn distances_where<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = (&'a T, f64)>
    where
        P: FnMut(&T) -> bool,
    {
        let origin = self.tile().reference_coordinate();

        self.iter().filter_map(move |e| {
            let origin = origin?;
            if !predicate(e) {
                return None;
            }

            let c = e.coordinate();
            let x = (c.x as f64 - origin.x as f64) * self.step_x() + self.offset_x();
            let y = (c.y as f64 - origin.y as f64) * self.step_y() + self.offset_y();
            Some((e, (x * x + y * y).sqrt()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circular::config::SelectionFlag;
    use crate::grid::Area;
    use approx::assert_relative_eq;
    use rust_decimal::Decimal;
    use std::f64::consts::PI;

    fn unit_grid(span: i32) -> QuantifiedTile<Coordinate> {
        let area = Area::new(-span, -span, span, span).unwrap();
        let tile = Tile::filled(area, Coordinate::new(0, 0), |c| c).unwrap();
        QuantifiedTile::new(tile)
    }

    fn circle(radius: i64) -> CircularProfile {
        CircularProfile::new(Decimal::from(radius))
    }

    fn config(flags: SelectionFlag) -> CoverageConfig {
        CoverageConfig::new(1.0, 1.0, flags).unwrap()
    }

    /// Das Begrenzungsprofil der Referenz-Testreihe: Radius 1400 mit fünf
    /// Abflachungen, jeweils über Sehnenradius (Basis minus Tiefe) und
    /// Sehnenlänge angegeben.
    fn reference_profile() -> CircularProfile {
        let mut p = circle(1400);
        p.add_flat(-PI / 2.0, Decimal::from(1300), Decimal::from(100))
            .unwrap();
        p.add_flat(7.0 * PI / 4.0, Decimal::from(1200), Decimal::from(100))
            .unwrap();
        p.add_flat(0.0, Decimal::from(1100), Decimal::from(100))
            .unwrap();
        p.add_flat(PI / 3.0, Decimal::from(1000), Decimal::from(200))
            .unwrap();
        p.add_flat(2.0 * PI / 3.0, Decimal::from(900), Decimal::from(400))
            .unwrap();
        p
    }

    fn reference_grid(span: i32, size: f64, step: f64) -> QuantifiedTile<Coordinate> {
        let area = Area::new(-span, -span, span, span).unwrap();
        let tile = Tile::filled(area, Coordinate::new(0, 0), |c| c).unwrap();
        QuantifiedTile::with_steps(tile, size, size, step, step).unwrap()
    }

    #[test]
    fn test_selection_classes_partition_the_grid() {
        let grid = unit_grid(2);
        let profile = circle(2);

        let inside = grid.take(&profile, config(SelectionFlag::INSIDE)).count();
        let under = grid.take(&profile, config(SelectionFlag::UNDER)).count();
        let outside = grid.take(&profile, config(SelectionFlag::OUTSIDE)).count();

        assert_eq!(inside + under + outside, grid.len());

        // Alle drei Klassen zusammen liefern exakt die Gesamtmenge
        let all = grid.take(&profile, config(SelectionFlag::all())).count();
        assert_eq!(all, grid.len());
    }

    #[test]
    fn test_flag_combinations() {
        let grid = unit_grid(2);
        let profile = circle(2);

        let inside = grid.take(&profile, config(SelectionFlag::INSIDE)).count();
        let under = grid.take(&profile, config(SelectionFlag::UNDER)).count();
        let both = grid
            .take(&profile, config(SelectionFlag::INSIDE | SelectionFlag::UNDER))
            .count();
        assert_eq!(both, inside + under);

        // OUTSIDE allein: nur Zellen ohne jede Abdeckung
        for e in grid.take(&profile, config(SelectionFlag::OUTSIDE)) {
            let d = (e.x as f64).hypot(e.y as f64);
            assert!(d > 2.0, "cell {} with distance {} is not outside", e, d);
        }
    }

    #[test]
    fn test_take_into_keeps_reference_when_selected() {
        let grid = unit_grid(2);
        let profile = circle(2);

        let mut changed = true;
        let result = grid
            .take_into(&profile, config(SelectionFlag::INSIDE), &mut changed)
            .unwrap();

        // Die Mittelzelle ist sicher selektiert, die Referenz bleibt
        assert!(!changed, "reference must not move");
        assert_eq!(
            result.tile().reference_coordinate(),
            Some(Coordinate::new(0, 0))
        );
        assert!(result.len() > 0);
        assert!(result.len() < grid.len());
    }

    #[test]
    fn test_take_into_moves_reference() {
        let grid = unit_grid(2);
        let profile = circle(10);

        // Prädikat schließt die Referenzzelle aus; die Referenz muss auf das
        // erste selektierte Element wandern
        let mut changed = true;
        let result = grid
            .take_into_where(
                &profile,
                config(SelectionFlag::INSIDE),
                &mut changed,
                |e| *e != Coordinate::new(0, 0),
            )
            .unwrap();

        assert!(changed, "reference must move");
        let rc = result.tile().reference_coordinate().unwrap();
        assert!(result.tile().contains(rc));
        assert_eq!(rc, Coordinate::new(-2, -2), "first selected in row order");
        assert_eq!(result.len(), grid.len() - 1);
    }

    #[test]
    fn test_take_into_respects_inbound_false() {
        let grid = unit_grid(2);
        let profile = circle(10);

        // Der Aufrufer verbietet den Umzug; die nicht selektierte Referenz
        // fällt ersatzlos weg
        let mut changed = false;
        let result = grid
            .take_into_where(
                &profile,
                config(SelectionFlag::INSIDE),
                &mut changed,
                |e| *e != Coordinate::new(0, 0),
            )
            .unwrap();

        assert!(!changed);
        assert!(result.tile().reference_coordinate().is_none());
        assert_eq!(result.len(), grid.len() - 1);
    }

    #[test]
    fn test_take_into_empty_selection_clears() {
        let grid = unit_grid(2);
        // Winziger Kreis, der keine einzige Ecke erreicht
        let profile = CircularProfile::new(Decimal::new(1, 1));

        let mut changed = true;
        let result = grid
            .take_into(&profile, config(SelectionFlag::INSIDE), &mut changed)
            .unwrap();

        assert!(!changed, "empty selection forces false");
        assert!(result.is_empty());
        assert_eq!(result.area(), grid.area(), "area survives the clear");
    }

    #[test]
    fn test_take_into_does_not_mutate_source() {
        let grid = unit_grid(2);
        let profile = circle(2);

        let mut changed = true;
        let _ = grid
            .take_into(&profile, config(SelectionFlag::INSIDE), &mut changed)
            .unwrap();

        assert_eq!(grid.len(), 25, "source container must stay intact");
    }

    #[test]
    fn test_distances() {
        let area = Area::new(-1, -1, 1, 1).unwrap();
        let tile = Tile::filled(area, Coordinate::new(0, 0), |c| c).unwrap();
        let grid = QuantifiedTile::with_steps(tile, 1.0, 1.0, 2.0, 3.0).unwrap();

        for (e, d) in grid.distances() {
            let expected = ((e.x as f64 * 2.0).powi(2) + (e.y as f64 * 3.0).powi(2)).sqrt();
            assert_relative_eq!(d, expected);
        }

        let at_origin: Vec<f64> = grid
            .distances_where(|e| *e == Coordinate::new(0, 0))
            .map(|(_, d)| d)
            .collect();
        assert_eq!(at_origin, vec![0.0]);
    }

    #[test]
    fn test_distances_ranking() {
        let grid = unit_grid(2);
        let mut by_distance: Vec<(Coordinate, f64)> =
            grid.distances().map(|(e, d)| (*e, d)).collect();
        by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

        assert_eq!(by_distance[0].0, Coordinate::new(0, 0));
        assert_relative_eq!(by_distance.last().unwrap().1, (8.0f64).sqrt());
    }

    /// Referenzszenario: 55x55 Zellen (3025 Elemente) mit Abstand 55, Profil
    /// mit Radius 1400 und fünf Abflachungen, Auswahl INSIDE bei Auflösung 1.
    #[test]
    fn test_selection_small_grid() {
        let grid = reference_grid(27, 50.0, 55.0);
        assert_eq!(grid.len(), 3025, "initial item count");

        let profile = reference_profile();

        let mut changed = true;
        let result = grid
            .take_into(&profile, config(SelectionFlag::INSIDE), &mut changed)
            .unwrap();

        assert!(!changed, "reference stays inside the selection");
        assert_eq!(result.len(), 1800, "selected item count");
    }

    /// Dasselbe Profil bei fünffach feinerem Raster: 255x255 Zellen (65025
    /// Elemente) mit Abstand 11.
    #[test]
    fn test_selection_medium_grid() {
        let grid = reference_grid(127, 10.0, 11.0);
        assert_eq!(grid.len(), 65025, "initial item count");

        let profile = reference_profile();

        let selected = grid
            .take(&profile, config(SelectionFlag::INSIDE))
            .count();
        assert_eq!(selected, 47860, "selected item count");
    }
}
