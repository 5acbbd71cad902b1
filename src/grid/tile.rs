// src/grid/tile.rs

use crate::error::{CoverError, CoverResult};
use crate::grid::area::Area;
use crate::grid::coordinate::{Coordinate, Positioned};
use std::collections::HashSet;

/// Geordneter Gitter-Container: Elemente mit eindeutigen Koordinaten innerhalb
/// eines Bereichs, dazu ein ausgezeichnetes Referenzelement als Ursprung des
/// physischen Koordinatensystems.
///
/// Die Elemente behalten ihre Einfügereihenfolge; Zugriff über Koordinate ist
/// linear. Nach `clear` (oder dem Entfernen des Referenzelements) besitzt der
/// Container keine Referenz mehr.
#[derive(Clone, Debug)]
pub struct Tile<T: Positioned> {
    area: Area,
    items: Vec<T>,
    reference: Option<usize>,
}

impl<T: Positioned> Tile<T> {
    /// Erstellt einen Container mit genau einem Element, das zugleich Referenz ist.
    pub fn new(area: Area, reference: T) -> CoverResult<Self> {
        let c = reference.coordinate();
        if !area.contains(c) {
            return Err(CoverError::OutsideArea { x: c.x, y: c.y });
        }

        Ok(Self {
            area,
            items: vec![reference],
            reference: Some(0),
        })
    }

    /// Erstellt einen vollständig befüllten Container: für jede Koordinate des
    /// Bereichs liefert `build` ein Element, `reference` benennt das Referenzelement.
    pub fn filled<F>(area: Area, reference: Coordinate, mut build: F) -> CoverResult<Self>
    where
        F: FnMut(Coordinate) -> T,
    {
        if !area.contains(reference) {
            return Err(CoverError::OutsideArea {
                x: reference.x,
                y: reference.y,
            });
        }

        let items: Vec<T> = area.coordinates().map(&mut build).collect();
        let index = items
            .iter()
            .position(|e| e.coordinate() == reference)
            .ok_or(CoverError::MissingCoordinate {
                x: reference.x,
                y: reference.y,
            })?;

        Ok(Self {
            area,
            items,
            reference: Some(index),
        })
    }

    /// Erstellt einen Container aus fertigen Teilen. Alle Koordinaten müssen im
    /// Bereich liegen und eindeutig sein; die Referenz muss, falls angegeben,
    /// unter den Elementen sein.
    pub fn from_parts(
        area: Area,
        items: Vec<T>,
        reference: Option<Coordinate>,
    ) -> CoverResult<Self> {
        let mut seen: HashSet<Coordinate> = HashSet::with_capacity(items.len());
        for item in &items {
            let c = item.coordinate();
            if !area.contains(c) {
                return Err(CoverError::OutsideArea { x: c.x, y: c.y });
            }
            if !seen.insert(c) {
                return Err(CoverError::InvalidConfiguration {
                    message: format!("duplicate coordinate ({}, {})", c.x, c.y),
                });
            }
        }

        let reference = match reference {
            None => None,
            Some(rc) => Some(
                items
                    .iter()
                    .position(|e| e.coordinate() == rc)
                    .ok_or(CoverError::MissingCoordinate { x: rc.x, y: rc.y })?,
            ),
        };

        Ok(Self {
            area,
            items,
            reference,
        })
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn get(&self, coordinate: Coordinate) -> Option<&T> {
        self.position(coordinate).map(|i| &self.items[i])
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.position(coordinate).is_some()
    }

    /// Das Referenzelement, sofern vorhanden.
    pub fn reference(&self) -> Option<&T> {
        self.reference.map(|i| &self.items[i])
    }

    pub fn reference_coordinate(&self) -> Option<Coordinate> {
        self.reference().map(|e| e.coordinate())
    }

    /// Macht das Element an `coordinate` zum neuen Referenzelement.
    pub fn set_reference(&mut self, coordinate: Coordinate) -> CoverResult<()> {
        let index = self
            .position(coordinate)
            .ok_or(CoverError::MissingCoordinate {
                x: coordinate.x,
                y: coordinate.y,
            })?;
        self.reference = Some(index);
        Ok(())
    }

    /// Befüllt alle noch unbesetzten Koordinaten des Bereichs, zeilenweise.
    pub fn fill_with<F>(&mut self, mut build: F)
    where
        F: FnMut(Coordinate) -> T,
    {
        let existing: HashSet<Coordinate> = self.items.iter().map(|e| e.coordinate()).collect();
        for c in self.area.coordinates() {
            if !existing.contains(&c) {
                self.items.push(build(c));
            }
        }
    }

    /// Entfernt das Element an `coordinate`. Trifft es die Referenz, hat der
    /// Container anschließend keine.
    pub fn remove(&mut self, coordinate: Coordinate) -> Option<T> {
        let index = self.position(coordinate)?;

        match self.reference {
            Some(r) if r == index => self.reference = None,
            Some(r) if r > index => self.reference = Some(r - 1),
            _ => {}
        }

        Some(self.items.remove(index))
    }

    /// Entfernt alle Elemente einschließlich der Referenz. Der Bereich bleibt.
    pub fn clear(&mut self) {
        self.items.clear();
        self.reference = None;
    }

    fn position(&self, coordinate: Coordinate) -> Option<usize> {
        self.items.iter().position(|e| e.coordinate() == coordinate)
    }
}

impl<'a, T: Positioned> IntoIterator for &'a Tile<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
