//! Accelerations acting on a vehicle during a numerical tick.
//!
//! Every model maps the current position and velocity to an acceleration. The density and
//! thrust command are sampled once at the start of a tick and held constant across its
//! substeps.

use nalgebra::Vector3;

use crate::constants::{KilogramPerCubicMeter, MeterPerSecondSquared};

/// Source of acceleration.
pub trait ForceModel: Send + Sync {
    fn acceleration(&self, position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64>;
}

/// Point-mass gravity `−μ·r̂/|r|²` of a primary located at `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralGravity {
    pub mu: f64,
    pub center: Vector3<f64>,
}

impl ForceModel for CentralGravity {
    fn acceleration(&self, position: &Vector3<f64>, _velocity: &Vector3<f64>) -> Vector3<f64> {
        let r = position - self.center;
        let distance = r.norm();
        -r * (self.mu / distance.powi(3))
    }
}

/// Quadratic drag opposing the velocity, `−v·min(max_fraction, ρ·k·|v|)`.
///
/// The cap bounds the fraction of velocity removed per second, which keeps the explicit
/// update stable in dense layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphericDrag {
    pub density: KilogramPerCubicMeter,
    pub coefficient: f64,
    pub max_fraction: f64,
}

impl ForceModel for AtmosphericDrag {
    fn acceleration(&self, _position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
        let fraction = (self.density * self.coefficient * velocity.norm()).min(self.max_fraction);
        -velocity * fraction
    }
}

/// Constant acceleration along the direction of motion (negative values brake).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thrust {
    pub acceleration: MeterPerSecondSquared,
}

impl ForceModel for Thrust {
    fn acceleration(&self, _position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
        velocity
            .try_normalize(0.0)
            .map_or_else(Vector3::zeros, |direction| direction * self.acceleration)
    }
}

/// Gravity of the primary plus the perturbations of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbedTwoBody {
    pub gravity: CentralGravity,
    pub drag: AtmosphericDrag,
    pub thrust: Thrust,
}

impl ForceModel for PerturbedTwoBody {
    fn acceleration(&self, position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
        self.gravity.acceleration(position, velocity)
            + self.drag.acceleration(position, velocity)
            + self.thrust.acceleration(position, velocity)
    }
}
