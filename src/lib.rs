// src/lib.rs

//! Abdeckungs- und Auswahlabfragen für regelmäßige Gitter gegen kreisnahe
//! Begrenzungen.
//!
//! Die Begrenzung ist kein reiner Kreis, sondern ein stückweise konstantes
//! Polarprofil ([`circular::CircularProfile`]): der Radius variiert je
//! Winkelsektor, so dass Abflachungen, Kerben und Pufferzonen auf einem
//! Basiskreis liegen können. Ein quantifizierter Container
//! ([`quantified::QuantifiedTile`]) bildet ganzzahlige Gitterkoordinaten in
//! den kontinuierlichen Raum ab; die Abdeckung pro Zelle wird durch diskrete
//! Unterabtastung geschätzt, mit einer Eckenvorprüfung für die eindeutigen
//! Fälle. Darauf setzen Selektion, Distanzranking sowie Punkt- und
//! Bereichssuche auf.
//!
//! Alle Abfragen sind synchron, rein rechnend und liefern lazy ausgewertete,
//! neu startbare Sequenzen.

pub mod circular;
pub mod error;
pub mod grid;
pub mod quantified;
pub mod utils;

pub use error::{CoverError, CoverResult};

// Öffentliche API
pub mod prelude {
    pub use super::{
        circular::{
            CircularProfile, Coverage, CoverageConfig, ProfileStep, SelectionFlag,
        },
        error::{CoverError, CoverResult},
        grid::{Area, Coordinate, Positioned, Tile},
        quantified::{QuantifiedTile, SCALE_FACTOR_DIGITS},
    };
}
