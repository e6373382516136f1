use std::fmt;

use crate::constants::SMALL_NUMBER;

/// Conic family of an orbit, derived from its eccentricity.
///
/// The tag is computed once when the elements are built and every anomaly or velocity
/// formula dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrbitShape {
    /// `e < SMALL_NUMBER`
    Circular,
    /// `SMALL_NUMBER ≤ e < 1 − SMALL_NUMBER`
    Elliptical,
    /// `|e − 1| < SMALL_NUMBER`
    Parabolic,
    /// `e ≥ 1 + SMALL_NUMBER`
    Hyperbolic,
}

impl OrbitShape {
    /// Classify an eccentricity. Negative or NaN input is treated as circular.
    pub fn from_eccentricity(e: f64) -> Self {
        if !(e >= SMALL_NUMBER) {
            OrbitShape::Circular
        } else if (e - 1.).abs() < SMALL_NUMBER {
            OrbitShape::Parabolic
        } else if e > 1. {
            OrbitShape::Hyperbolic
        } else {
            OrbitShape::Elliptical
        }
    }

    /// True for the circular and elliptical shapes.
    pub fn is_closed(&self) -> bool {
        matches!(self, OrbitShape::Circular | OrbitShape::Elliptical)
    }
}

impl fmt::Display for OrbitShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrbitShape::Circular => "circular",
            OrbitShape::Elliptical => "elliptical",
            OrbitShape::Parabolic => "parabolic",
            OrbitShape::Hyperbolic => "hyperbolic",
        };
        f.write_str(name)
    }
}
