//! # Leapfrog integration
//!
//! Drift-kick-drift leapfrog used when a vehicle is perturbed (drag or thrust). One tick
//! of length `dt` is split into `substeps` substeps of length `θ = dt/substeps`:
//!
//! 1. Drift: `r += v_prev·θ/2`
//! 2. Kick: `v += a(r, v)·θ`, with the acceleration evaluated at the midpoint position
//! 3. Drift: `r += v·θ/2`, then `v_prev = v`
//!
//! The DKD form keeps velocity-dependent forces (drag, thrust) at a consistent point of
//! the substep. For pure gravity the scheme is symplectic and keeps closed orbits closed.

use nalgebra::Vector3;

use super::forces::ForceModel;
use super::params::PropagatorParams;

/// Kinematic state carried between ticks by the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeapfrogState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    /// Velocity at the end of the previous substep, used by the first half drift.
    pub velocity_prev: Vector3<f64>,
}

impl LeapfrogState {
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|x| x.is_finite())
            && self.velocity.iter().all(|x| x.is_finite())
            && self.velocity_prev.iter().all(|x| x.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leapfrog {
    pub substeps: usize,
}

impl Leapfrog {
    pub fn new(substeps: usize) -> Self {
        Self {
            substeps: substeps.max(1),
        }
    }

    pub fn from_params(params: &PropagatorParams) -> Self {
        Self::new(params.substeps)
    }

    /// Advance `state` by `dt` seconds under `force`.
    pub fn advance(&self, state: &mut LeapfrogState, dt: f64, force: &dyn ForceModel) {
        self.advance_until(state, dt, force, |_| false);
    }

    /// Advance `state` by at most `dt` seconds under `force`, checking `stop` after every
    /// substep.
    ///
    /// Return
    /// ----------
    /// * `true` if `stop` fired. `state` is then the end of the first substep that
    ///   satisfied it and the remaining substeps are skipped.
    /// * `false` once the whole tick has been integrated.
    pub fn advance_until<F>(&self, state: &mut LeapfrogState, dt: f64, force: &dyn ForceModel, stop: F) -> bool
    where
        F: Fn(&LeapfrogState) -> bool,
    {
        let theta = dt / self.substeps as f64;
        let half = theta * 0.5;

        for _ in 0..self.substeps {
            state.position += state.velocity_prev * half;
            let acceleration = force.acceleration(&state.position, &state.velocity);
            state.velocity += acceleration * theta;
            state.position += state.velocity * half;
            state.velocity_prev = state.velocity;
            if stop(state) {
                return true;
            }
        }
        false
    }
}

impl Default for Leapfrog {
    fn default() -> Self {
        Self::from_params(&PropagatorParams::default())
    }
}
