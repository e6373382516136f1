//! # Trajectory propagation
//!
//! A vehicle is advanced either analytically along its Keplerian orbit or numerically
//! with a leapfrog integrator when perturbing forces act on it. The choice is made at
//! every tick from the current altitude, atmosphere density and thrust command, see
//! [`select_mode`].
//!
//! Submodules
//! -----------------
//! * [`params`] – Tunables of the propagator ([`params::PropagatorParams`]).
//! * [`forces`] – Gravity, drag and thrust accelerations.
//! * [`leapfrog`] – Drift-kick-drift integrator used in [`PropagationMode::Numerical`].

pub mod forces;
pub mod leapfrog;
pub mod params;

use log::trace;
use std::fmt;

use crate::constants::{KilogramPerCubicMeter, Meter};

/// How a vehicle is advanced during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropagationMode {
    /// Pure two-body motion, the mean anomaly is advanced in closed form.
    Analytic,
    /// Drag or thrust present, leapfrog integration then recomputation of the elements.
    Numerical,
    /// The vehicle reached the surface of its primary.
    Terminal,
}

impl fmt::Display for PropagationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropagationMode::Analytic => "analytic",
            PropagationMode::Numerical => "numerical",
            PropagationMode::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// Choose the propagation mode of a tick.
///
/// Arguments
/// -----------------
/// * `altitude`: height above the primary surface, in meters.
/// * `density`: atmosphere density at that altitude, in kg/m³.
/// * `thrust`: thrust command applied to the vehicle this tick.
///
/// Return
/// ----------
/// * [`PropagationMode::Terminal`] when `altitude ≤ 0`,
///   [`PropagationMode::Numerical`] when `density > 0` or `thrust ≠ 0`,
///   [`PropagationMode::Analytic`] otherwise.
pub fn select_mode(altitude: Meter, density: KilogramPerCubicMeter, thrust: f64) -> PropagationMode {
    let mode = if altitude <= 0.0 {
        PropagationMode::Terminal
    } else if density > 0.0 || thrust != 0.0 {
        PropagationMode::Numerical
    } else {
        PropagationMode::Analytic
    };
    trace!("altitude = {altitude:.1} m, density = {density:.3e}, thrust = {thrust} -> {mode}");
    mode
}
