//! # Vehicles
//!
//! A [`Vehicle`] is a massless body moving around a single [`Primary`]. It keeps its
//! inertial state vectors, the velocity of the previous tick (first half drift of the
//! leapfrog) and the osculating [`OrbitalElements`] relative to its primary.
//!
//! Every call to [`Vehicle::simulate`] picks a propagation mode from the current
//! conditions (see [`crate::propagator::select_mode`]):
//!
//! * **Analytic** – the mean anomaly is advanced by `n·dt`, the true anomaly is solved
//!   from Kepler's equation and the state vectors are rebuilt from the elements.
//! * **Numerical** – drag and/or thrust act on the vehicle, the state is integrated with
//!   the leapfrog scheme then the elements are recomputed from it.
//! * **Terminal** – the vehicle is at or below the surface. It is stopped and disposed.
//!
//! Surface contact is also detected inside a tick: an analytic step checks whether the
//! swept mean anomaly passes the inbound surface crossing of the conic, a numerical step
//! checks the altitude after every leapfrog substep. A vehicle that dips below the surface
//! is removed in the tick where it happens, at the crossing point, even when the rest of
//! the tick would have carried it back out.
//!
//! A step is computed on copies of the state and committed only once it is known to be
//! valid, so a failed step leaves the vehicle exactly as it was.

use log::info;
use nalgebra::Vector3;

use crate::constants::{Meter, Radian, Second};
use crate::kepler::principal_angle;
use crate::orbital_elements::{OrbitalElements, StateVectors};
use crate::orrery_errors::OrreryError;
use crate::primary::Primary;
use crate::propagator::forces::{AtmosphericDrag, CentralGravity, PerturbedTwoBody, Thrust};
use crate::propagator::leapfrog::{Leapfrog, LeapfrogState};
use crate::propagator::params::PropagatorParams;
use crate::propagator::{select_mode, PropagationMode};
use crate::simulator::PrimaryId;

/// Result of a successful [`Vehicle::simulate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The vehicle moved using the given mode.
    Propagated(PropagationMode),
    /// The vehicle hit its primary and must be removed from the scene.
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub name: String,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub velocity_prev: Vector3<f64>,
    pub primary: Option<PrimaryId>,
    pub elements: Option<OrbitalElements>,
    pub disposed: bool,
}

impl Vehicle {
    /// A free vehicle, not yet attached to a primary.
    pub fn new(name: impl Into<String>, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Vehicle {
            name: name.into(),
            position,
            velocity,
            velocity_prev: velocity,
            primary: None,
            elements: None,
            disposed: false,
        }
    }

    /// Inertial position and velocity.
    pub fn state(&self) -> StateVectors {
        StateVectors {
            position: self.position,
            velocity: self.velocity,
        }
    }

    /// Recompute the osculating elements relative to `primary`.
    pub fn calc_orbit(&mut self, primary: &Primary) -> Result<(), OrreryError> {
        self.elements = Some(self.elements_around(primary)?);
        Ok(())
    }

    fn elements_around(&self, primary: &Primary) -> Result<OrbitalElements, OrreryError> {
        let mu = primary.gravitational_parameter();
        let mut elements = match &self.elements {
            Some(elements) => {
                let mut elements = elements.clone();
                elements.set_mu(mu)?;
                elements
            }
            None => OrbitalElements::new(mu)?,
        };
        elements.from_state_vector(&(self.position - primary.position), &self.velocity);
        Ok(elements)
    }

    /// Instantaneous velocity change, the elements are recomputed afterwards.
    ///
    /// A disposed vehicle is refused with `Err(OrreryError::DisposedVehicle)`.
    pub fn apply_impulse(&mut self, delta_v: &Vector3<f64>, primary: &Primary) -> Result<(), OrreryError> {
        if self.disposed {
            return Err(OrreryError::DisposedVehicle(self.name.clone()));
        }
        self.velocity += delta_v;
        self.velocity_prev = self.velocity;
        self.calc_orbit(primary)
    }

    /// Advance the vehicle by `dt` seconds around `primary`.
    ///
    /// Arguments
    /// -----------------
    /// * `primary`: the body the vehicle orbits, its position is held fixed during the tick.
    /// * `dt`: simulated time step in seconds.
    /// * `thrust`: thrust command, turned into an acceleration along the velocity by
    ///   `params.thrust_scale`. Any non-zero value forces the numerical mode.
    /// * `params`: propagator tunables.
    ///
    /// Return
    /// ----------
    /// * `Ok(StepOutcome::Propagated(mode))` after a normal step.
    /// * `Ok(StepOutcome::Removed)` when the vehicle reached the surface, at the start of
    ///   the tick or at any point during it. It is left at the crossing point with a zero
    ///   velocity and marked disposed.
    /// * `Err(OrreryError::DisposedVehicle)` for a vehicle already removed,
    ///   `Err(OrreryError::NoPrimary)` when no orbit was ever computed, a convergence
    ///   failure from the Kepler solver, `Err(OrreryError::InvalidTrueAnomaly)` or
    ///   `Err(OrreryError::NonFiniteState)`. The vehicle is left untouched on error.
    pub fn simulate(
        &mut self,
        primary: &Primary,
        dt: f64,
        thrust: f64,
        params: &PropagatorParams,
    ) -> Result<StepOutcome, OrreryError> {
        if self.disposed {
            return Err(OrreryError::DisposedVehicle(self.name.clone()));
        }
        let elements = self
            .elements
            .as_ref()
            .ok_or_else(|| OrreryError::NoPrimary(self.name.clone()))?;

        let altitude = primary.altitude_of(&self.position);
        let density = primary.atmosphere_density(altitude);

        let mode = select_mode(altitude, density, thrust);
        match mode {
            PropagationMode::Terminal => return Ok(self.remove(primary)),
            PropagationMode::Analytic => {
                let mut elements = elements.clone();
                if let Some((mean_anomaly, true_anomaly)) = surface_impact(&elements, primary.radius, dt) {
                    let impact = elements
                        .to_inertial(Some(true_anomaly))
                        .ok_or(OrreryError::InvalidTrueAnomaly(true_anomaly))?;
                    elements.mean_anomaly = mean_anomaly;
                    elements.true_anomaly = principal_angle(true_anomaly);
                    self.position = impact.position + primary.position;
                    self.elements = Some(elements);
                    return Ok(self.remove(primary));
                }

                let mut mean_anomaly = elements.mean_anomaly + elements.mean_motion() * dt;
                if elements.shape.is_closed() {
                    mean_anomaly = principal_angle(mean_anomaly);
                }
                let true_anomaly = elements.true_from_mean(mean_anomaly, params.kepler_tolerance)?;
                let relative = elements
                    .to_inertial(Some(true_anomaly))
                    .ok_or(OrreryError::InvalidTrueAnomaly(true_anomaly))?;

                let position = relative.position + primary.position;
                if !is_finite(&position) || !is_finite(&relative.velocity) {
                    return Err(OrreryError::NonFiniteState);
                }

                elements.mean_anomaly = mean_anomaly;
                elements.true_anomaly = principal_angle(true_anomaly);
                self.position = position;
                self.velocity = relative.velocity;
                self.velocity_prev = relative.velocity;
                self.elements = Some(elements);
            }
            PropagationMode::Numerical => {
                let force = PerturbedTwoBody {
                    gravity: CentralGravity {
                        mu: primary.gravitational_parameter(),
                        center: primary.position,
                    },
                    drag: AtmosphericDrag {
                        density,
                        coefficient: params.drag_coefficient,
                        max_fraction: params.max_drag_fraction,
                    },
                    thrust: Thrust {
                        acceleration: thrust * params.thrust_scale,
                    },
                };
                let mut state = LeapfrogState {
                    position: self.position,
                    velocity: self.velocity,
                    velocity_prev: self.velocity_prev,
                };
                let landed = Leapfrog::from_params(params).advance_until(&mut state, dt, &force, |s| {
                    primary.altitude_of(&s.position) <= 0.0
                });
                if !state.is_finite() {
                    return Err(OrreryError::NonFiniteState);
                }
                if landed {
                    self.position = state.position;
                    return Ok(self.remove(primary));
                }

                let previous = (self.position, self.velocity);
                self.position = state.position;
                self.velocity = state.velocity;
                match self.elements_around(primary) {
                    Ok(elements) => {
                        self.velocity_prev = state.velocity_prev;
                        self.elements = Some(elements);
                    }
                    Err(err) => {
                        (self.position, self.velocity) = previous;
                        return Err(err);
                    }
                }
            }
        }

        Ok(StepOutcome::Propagated(mode))
    }

    fn remove(&mut self, primary: &Primary) -> StepOutcome {
        self.velocity = Vector3::zeros();
        self.velocity_prev = Vector3::zeros();
        self.disposed = true;
        info!(
            "{} reached the surface of {} (altitude = {:.1} m), removed",
            self.name,
            primary.name,
            primary.altitude_of(&self.position)
        );
        StepOutcome::Removed
    }
}

/// Mean and true anomaly of the inbound crossing of the sphere of radius `radius`, if the
/// conic reaches it within the next `dt` seconds.
fn surface_impact(elements: &OrbitalElements, radius: Meter, dt: Second) -> Option<(f64, Radian)> {
    if elements.periapsis_distance() > radius {
        return None;
    }
    let inbound = -elements.true_anomaly_at_radius(radius)?;
    let impact = elements.mean_from_true(inbound);
    let swept = elements.mean_motion() * dt;

    let reached = if elements.shape.is_closed() {
        // both anomalies in [0, 2π)
        principal_angle(impact - elements.mean_anomaly) <= swept
    } else {
        impact >= elements.mean_anomaly && impact <= elements.mean_anomaly + swept
    };
    reached.then_some((impact, inbound))
}

fn is_finite(v: &Vector3<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}
