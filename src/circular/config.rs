// src/circular/config.rs

use crate::error::{CoverError, CoverResult};
use bitflags::bitflags;

bitflags! {
    /// Auswahlklassen der Selektion nach Abdeckung. Die Bits sind unabhängig
    /// und beliebig kombinierbar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SelectionFlag: u8 {
        /// Abdeckung erreicht die Mindestfläche.
        const INSIDE = 1 << 0;
        /// Abdeckung ist positiv, bleibt aber unter der Mindestfläche.
        const UNDER = 1 << 1;
        /// Abdeckung ist null.
        const OUTSIDE = 1 << 2;
    }
}

/// Obergrenze der Rasterauflösung pro Achse. Schützt vor entarteten
/// Auflösungswerten, die das Stützpunktraster explodieren ließen.
pub const MAX_STEPS: u32 = 4096;

/// Unveränderliche Abtast- und Auswahlkonfiguration.
///
/// `steps` ist die Rasterauflösung pro Achse, `max_surface = steps²` die
/// Gesamtzahl Stützpunkte pro Zelle. `min_surface` trennt INSIDE von UNDER.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageConfig {
    steps: u32,
    resolution: f64,
    min_surface: u32,
    selection: SelectionFlag,
}

impl CoverageConfig {
    /// Konfiguration über Mindestflächen-Anteil und Stützpunktabstand.
    ///
    /// Die Rasterauflösung ergibt sich aus dem Abstand: `resolution == 1`
    /// tastet genau die vier geometrischen Ecken ab (Offsets ±0.5),
    /// `resolution == 0.5` ein 3x3-Raster und so weiter.
    pub fn new(
        min_surface_ratio: f64,
        resolution: f64,
        selection: SelectionFlag,
    ) -> CoverResult<Self> {
        if !resolution.is_finite() || resolution <= 0.0 || resolution > 1.0 {
            return Err(CoverError::InvalidConfiguration {
                message: format!("resolution must lie in (0, 1], got {}", resolution),
            });
        }
        if !min_surface_ratio.is_finite() || min_surface_ratio <= 0.0 || min_surface_ratio > 1.0 {
            return Err(CoverError::InvalidConfiguration {
                message: format!(
                    "min_surface_ratio must lie in (0, 1], got {}",
                    min_surface_ratio
                ),
            });
        }

        let steps = (1.0 / resolution).round() as u32 + 1;
        let max_surface = steps * steps;
        let min_surface = ((min_surface_ratio * max_surface as f64).round() as u32).max(1);

        Self::validated(steps, resolution, min_surface, selection)
    }

    /// Konfiguration über die Rasterauflösung pro Achse; der Stützpunktabstand
    /// wird so gewählt, dass das Raster die Zelle vollständig überspannt. Die
    /// Mindestfläche ist die Gesamtfläche.
    pub fn from_steps(steps: u32, selection: SelectionFlag) -> CoverResult<Self> {
        let resolution = if steps > 1 {
            1.0 / (steps - 1) as f64
        } else {
            1.0
        };
        Self::validated(steps, resolution, steps * steps, selection)
    }

    /// Setzt eine abweichende Mindestfläche (in Stützpunkten).
    pub fn with_min_surface(mut self, min_surface: u32) -> CoverResult<Self> {
        if min_surface == 0 || min_surface > self.max_surface() {
            return Err(CoverError::InvalidConfiguration {
                message: format!(
                    "min_surface must lie in [1, {}], got {}",
                    self.max_surface(),
                    min_surface
                ),
            });
        }
        self.min_surface = min_surface;
        Ok(self)
    }

    /// Setzt abweichende Auswahlklassen.
    pub fn with_selection(mut self, selection: SelectionFlag) -> CoverResult<Self> {
        if selection.is_empty() {
            return Err(CoverError::InvalidConfiguration {
                message: "selection flags must not be empty".to_string(),
            });
        }
        self.selection = selection;
        Ok(self)
    }

    fn validated(
        steps: u32,
        resolution: f64,
        min_surface: u32,
        selection: SelectionFlag,
    ) -> CoverResult<Self> {
        if steps == 0 || steps > MAX_STEPS {
            return Err(CoverError::InvalidConfiguration {
                message: format!("steps must lie in [1, {}], got {}", MAX_STEPS, steps),
            });
        }
        if selection.is_empty() {
            return Err(CoverError::InvalidConfiguration {
                message: "selection flags must not be empty".to_string(),
            });
        }

        Ok(Self {
            steps,
            resolution,
            min_surface,
            selection,
        })
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn min_surface(&self) -> u32 {
        self.min_surface
    }

    /// Gesamtzahl Stützpunkte pro Zelle.
    pub fn max_surface(&self) -> u32 {
        self.steps * self.steps
    }

    pub fn selection(&self) -> SelectionFlag {
        self.selection
    }

    /// Ordnet eine Abdeckung genau einer Auswahlklasse zu.
    pub fn classify(&self, count: u32) -> SelectionFlag {
        if count == 0 {
            SelectionFlag::OUTSIDE
        } else if count < self.min_surface {
            SelectionFlag::UNDER
        } else {
            SelectionFlag::INSIDE
        }
    }

    /// Ob eine Abdeckung von der konfigurierten Auswahl erfasst wird.
    pub fn matches(&self, count: u32) -> bool {
        self.selection.intersects(self.classify(count))
    }
}
