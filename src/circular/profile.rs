// src/circular/profile.rs

use crate::error::{CoverError, CoverResult};
use crate::utils::angles;
use log::warn;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::fmt;

/// Ein Knickpunkt des Profils: ab `angle` gilt `radius`, bis der nächste
/// Knickpunkt beginnt (rechtsoffene Sektoren).
///
/// Winkel sind Gleitkomma, weil sie durch die Trigonometrie laufen; Radien
/// bleiben Festkomma, damit wiederholte Flat- und Zonenkonstruktion nicht
/// driftet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileStep {
    angle: f64,
    radius: Decimal,
}

impl ProfileStep {
    /// Erstellt einen Knickpunkt; der Winkel wird in (-π, π] normalisiert.
    pub fn new(angle: f64, radius: Decimal) -> Self {
        Self {
            angle: angles::normalize(angle),
            radius,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn radius(&self) -> Decimal {
        self.radius
    }

    /// Derselbe Knickpunkt, eine volle Umdrehung früher. Dient als
    /// Umlauf-Sentinel der Profilsuche.
    pub(crate) fn shifted_back(&self) -> ProfileStep {
        ProfileStep {
            angle: angles::previous_turn(self.angle),
            radius: self.radius,
        }
    }
}

impl fmt::Display for ProfileStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ; {}]", self.angle, self.radius)
    }
}

/// Stückweise konstantes Polarprofil: ein Basisradius plus Knickpunkte.
///
/// Ohne Knickpunkte wirkt das Profil als perfekter Kreis des Basisradius.
/// Die Knickpunkte werden nach jeder Builder-Operation einmal sortiert, nie
/// pro Abfrage.
#[derive(Debug, Clone)]
pub struct CircularProfile {
    radius: Decimal,
    steps: Vec<ProfileStep>,
}

impl CircularProfile {
    pub fn new(radius: Decimal) -> Self {
        Self {
            radius,
            steps: Vec::new(),
        }
    }

    /// Entfernt alle Knickpunkte; übrig bleibt der reine Kreis.
    pub fn reset(&mut self) {
        self.steps.clear();
    }

    pub fn base_radius(&self) -> Decimal {
        self.radius
    }

    /// Die Knickpunkte, aufsteigend nach Winkel. Leer für den reinen Kreis.
    pub fn steps(&self) -> &[ProfileStep] {
        &self.steps
    }

    /// Fügt einen einzelnen Knickpunkt hinzu.
    pub fn add_step(&mut self, angle: f64, radius: Decimal) -> CoverResult<()> {
        Self::check_angle(angle)?;
        self.steps.push(ProfileStep::new(angle, radius));
        self.resort();
        Ok(())
    }

    /// Fügt eine Zone hinzu: über einen Bogen der Sehnenlänge `length`,
    /// zentriert auf `angle`, sinkt der Radius um `thickness` und springt am
    /// Zonenende auf den Basisradius zurück.
    pub fn add_zone(&mut self, angle: f64, thickness: Decimal, length: Decimal) -> CoverResult<()> {
        Self::check_angle(angle)?;
        let base = to_f64(self.radius, "zone base radius")?;
        let delta = (to_f64(length, "zone length")? / 2.0).atan2(base);

        self.steps
            .push(ProfileStep::new(angle - delta, self.radius - thickness));
        self.steps.push(ProfileStep::new(angle + delta, self.radius));
        self.resort();
        Ok(())
    }

    /// Fügt eine Abflachung über ihre radiale Tiefe hinzu: die Sehne liegt im
    /// Abstand `base - thickness` und reicht, bis sie den Kreis wieder trifft.
    pub fn add_flat_by_thickness(&mut self, angle: f64, thickness: Decimal) -> CoverResult<()> {
        self.add_flat_by_thickness_with(angle, thickness, 1.0, 1.0)
    }

    pub fn add_flat_by_thickness_with(
        &mut self,
        angle: f64,
        thickness: Decimal,
        step: f64,
        resolution: f64,
    ) -> CoverResult<()> {
        let r0 = self.radius - thickness;
        let ratio = to_f64(r0, "flat radius")? / to_f64(self.radius, "flat base radius")?;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(CoverError::InvalidConfiguration {
                message: format!(
                    "flat thickness {} is not within the base radius {}",
                    thickness, self.radius
                ),
            });
        }

        let delta_flat = ratio.acos();
        let length = Decimal::from(2)
            * self.radius
            * from_f64(delta_flat.sin(), "sine of flat half-angle")?;

        self.add_flat_with(angle, r0, length, step, resolution)
    }

    /// Fügt eine Abflachung über ihre Sehnenlänge hinzu; die radiale Lage
    /// ergibt sich aus dem halben Öffnungswinkel.
    pub fn add_flat_by_length(&mut self, angle: f64, length: Decimal) -> CoverResult<()> {
        self.add_flat_by_length_with(angle, length, 1.0, 1.0)
    }

    pub fn add_flat_by_length_with(
        &mut self,
        angle: f64,
        length: Decimal,
        step: f64,
        resolution: f64,
    ) -> CoverResult<()> {
        let base = to_f64(self.radius, "flat base radius")?;
        let delta_flat = (to_f64(length, "flat length")? / 2.0).atan2(base);
        let r0 = from_f64(delta_flat.cos(), "cosine of flat half-angle")? * self.radius;

        self.add_flat_with(angle, r0, length, step, resolution)
    }

    /// Fügt eine Abflachung mit explizitem Sehnenradius und Sehnenlänge hinzu.
    pub fn add_flat(&mut self, angle: f64, radius: Decimal, length: Decimal) -> CoverResult<()> {
        self.add_flat_with(angle, radius, length, 1.0, 1.0)
    }

    /// Diskrete polygonale Annäherung einer geraden Sehne in Polarform.
    ///
    /// Der halbe Öffnungswinkel ist `atan2(length / 2, base)`, die
    /// Winkelschrittweite `atan2(step, base) * resolution`. Einlaufend zählt
    /// der Sehnenradius des Sektor-Startwinkels, auslaufend der des
    /// Folgewinkels; so bleibt jeder Bogen innerhalb der Sehne. Ein nicht
    /// positiver Schrittumfang entartet zu den beiden Endknickpunkten.
    pub fn add_flat_with(
        &mut self,
        angle: f64,
        radius: Decimal,
        length: Decimal,
        step: f64,
        resolution: f64,
    ) -> CoverResult<()> {
        Self::check_angle(angle)?;
        let base = to_f64(self.radius, "flat base radius")?;
        let delta_flat = (to_f64(length, "flat length")? / 2.0).atan2(base);
        let delta = step.atan2(base) * resolution;

        let count = if delta.is_finite() && delta > 0.0 {
            (delta_flat / delta).round() as i64
        } else {
            0
        };

        if count <= 0 {
            warn!(
                "flat at angle {} degenerates to its end breakpoints (step {}, resolution {})",
                angle, step, resolution
            );
            self.steps.push(ProfileStep::new(angle - delta_flat, radius));
            self.steps
                .push(ProfileStep::new(angle + delta_flat, self.radius));
            self.resort();
            return Ok(());
        }

        // Einlaufende Seite der Sehne
        for s in -count..0 {
            let a0 = angle + s as f64 * delta;
            let r0 = chord_radius(radius, a0 - angle)?;
            self.steps.push(ProfileStep::new(a0, r0));
        }

        // Auslaufende Seite: Radius des Folgewinkels
        for s in 0..count {
            let a0 = angle + s as f64 * delta;
            let r0 = chord_radius(radius, a0 - angle + delta)?;
            self.steps.push(ProfileStep::new(a0, r0));
        }

        // Abschluss: zurück auf den Basisradius
        self.steps
            .push(ProfileStep::new(angle + delta_flat, self.radius));
        self.resort();
        Ok(())
    }

    /// Kleinster Knickpunktradius, ohne Knickpunkte der Basisradius.
    pub fn min_radius(&self) -> Decimal {
        self.steps
            .iter()
            .map(|s| s.radius)
            .min()
            .unwrap_or(self.radius)
    }

    /// Größter Knickpunktradius, ohne Knickpunkte der Basisradius.
    pub fn max_radius(&self) -> Decimal {
        self.steps
            .iter()
            .map(|s| s.radius)
            .max()
            .unwrap_or(self.radius)
    }

    /// Mittlerer Knickpunktradius.
    pub fn mean_radius(&self) -> Decimal {
        if self.steps.is_empty() {
            return self.radius;
        }
        let sum = self
            .steps
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc + s.radius);
        sum / Decimal::from(self.steps.len() as u64)
    }

    /// Der Umlauf-Sentinel: der Knickpunkt mit dem größten Winkel, eine volle
    /// Umdrehung zurückversetzt. Er trägt den Sektor, in den Winkel unterhalb
    /// aller Knickpunkte fallen.
    pub fn first_step(&self) -> ProfileStep {
        let last = self.steps.last().copied().unwrap_or(ProfileStep {
            angle: 0.0,
            radius: self.radius,
        });
        last.shifted_back()
    }

    /// Der Knickpunkt, dessen Sektor den Winkel `angle` enthält: der mit dem
    /// größten Winkel strikt unterhalb von `angle`, mit Umlauf auf den
    /// Sentinel. Invariant unter `angle ± 2πk`.
    pub fn step_at(&self, angle: f64) -> ProfileStep {
        let angle = angles::normalize(angle);
        if self.steps.is_empty() {
            return if angle > 0.0 {
                ProfileStep {
                    angle: 0.0,
                    radius: self.radius,
                }
            } else {
                self.first_step()
            };
        }

        let idx = self.steps.partition_point(|s| s.angle < angle);
        if idx == 0 {
            self.first_step()
        } else {
            self.steps[idx - 1]
        }
    }

    fn check_angle(angle: f64) -> CoverResult<()> {
        if !angle.is_finite() {
            return Err(CoverError::InvalidConfiguration {
                message: format!("profile angle must be finite, got {}", angle),
            });
        }
        Ok(())
    }

    fn resort(&mut self) {
        self.steps.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    }
}

/// Radius der Sehne im Winkelabstand `delta` von ihrem Mittelpunkt.
fn chord_radius(radius: Decimal, delta: f64) -> CoverResult<Decimal> {
    let cos = from_f64(delta.cos(), "cosine of flat sub-angle")?;
    radius
        .checked_div(cos)
        .ok_or_else(|| CoverError::NumericFailure {
            operation: format!("chord radius at sub-angle {}", delta),
        })
}

fn to_f64(value: Decimal, operation: &str) -> CoverResult<f64> {
    value.to_f64().ok_or_else(|| CoverError::NumericFailure {
        operation: operation.to_string(),
    })
}

fn from_f64(value: f64, operation: &str) -> CoverResult<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| CoverError::NumericFailure {
        operation: operation.to_string(),
    })
}

/// Festkomma-Radius als f64-Quadrat, für die Abtastung vorberechnet.
pub(crate) fn radius_squared(radius: Decimal) -> f64 {
    let r = radius.to_f64().unwrap_or(f64::MAX);
    r * r
}

/// Sortierte Sektortabelle eines Profils, einmal pro Traversierung aufgebaut:
/// Winkel und Radiusquadrate in f64 für die heiße Schleife der Abtastung.
pub(crate) struct SectorTable {
    angles: Vec<f64>,
    radii2: Vec<f64>,
}

impl SectorTable {
    pub(crate) fn new(profile: &CircularProfile) -> Self {
        if profile.steps.is_empty() {
            return Self {
                angles: vec![0.0],
                radii2: vec![radius_squared(profile.radius)],
            };
        }

        Self {
            angles: profile.steps.iter().map(|s| s.angle).collect(),
            radii2: profile.steps.iter().map(|s| radius_squared(s.radius)).collect(),
        }
    }

    /// Index des Sektors, der `angle` enthält; Winkel unterhalb aller
    /// Knickpunkte laufen auf den letzten Sektor um.
    pub(crate) fn sector(&self, angle: f64) -> usize {
        let idx = self.angles.partition_point(|a| *a < angle);
        if idx == 0 { self.angles.len() - 1 } else { idx - 1 }
    }

    pub(crate) fn radius2(&self, sector: usize) -> f64 {
        self.radii2[sector]
    }
}
