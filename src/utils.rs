// src/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f64 = 1e-10;
    pub const PI: f64 = std::f64::consts::PI;
    pub const TAU: f64 = std::f64::consts::TAU;
}

/// Winkel-Hilfsfunktionen
pub mod angles {
    use super::constants::{PI, TAU};

    /// Normalisiert einen Winkel in das Intervall (-π, π].
    pub fn normalize(angle: f64) -> f64 {
        let mut a = angle % TAU;
        if a <= -PI {
            a += TAU;
        } else if a > PI {
            a -= TAU;
        }
        a
    }

    /// Verschiebt einen Winkel um ganze Umdrehungen zurück, bis er nicht mehr
    /// über -π liegt. Liefert den Umlauf-Sentinel eines Profils.
    pub fn previous_turn(angle: f64) -> f64 {
        if !angle.is_finite() {
            return angle;
        }
        let mut a = angle;
        while a > -PI {
            a -= TAU;
        }
        a
    }
}

#[cfg(test)]
mod tests {
    use super::angles;
    use super::constants::{EPSILON, PI, TAU};

    #[test]
    fn test_normalize_range() {
        // Ergebnis liegt immer in (-π, π], auch für mehrfache Umdrehungen
        for raw in [-13.0 * PI / 12.0, 3.0 * PI, -3.0 * PI, 0.0, PI, -PI, 7.0 * PI / 4.0] {
            let a = angles::normalize(raw);
            assert!(
                -PI < a && a <= PI,
                "normalize({}) = {} outside (-pi, pi]",
                raw,
                a
            );
        }
    }

    #[test]
    fn test_normalize_identity_modulo_tau() {
        let a = angles::normalize(-13.0 * PI / 12.0);
        assert!((a - 11.0 * PI / 12.0).abs() < EPSILON, "got {}", a);

        let b = angles::normalize(7.0 * PI / 4.0);
        assert!((b + PI / 4.0).abs() < EPSILON, "got {}", b);
    }

    #[test]
    fn test_normalize_negative_pi_maps_to_positive() {
        // -π ist kein Element des Intervalls, es wird auf +π abgebildet
        assert!((angles::normalize(-PI) - PI).abs() < EPSILON);
    }

    #[test]
    fn test_previous_turn() {
        let s = angles::previous_turn(PI);
        assert!(s <= -PI, "sentinel {} not below -pi", s);
        assert!((s + PI).abs() < EPSILON);

        let s = angles::previous_turn(0.0);
        assert!((s + TAU).abs() < EPSILON);
    }
}
