//! # Simulator
//!
//! Registry of the primaries and vehicles of one scene, driven by a [`SimulationClock`].
//!
//! Each tick simulates every vehicle once around its own primary. Vehicles do not
//! interact, so a failed step only affects the vehicle it belongs to: the error is
//! logged and reported in the [`TickReport`] and the other vehicles carry on. Vehicles
//! that reach the surface of their primary are dropped from the registry and handed
//! back once in [`TickReport::removed`], in their final state (at the crossing point,
//! velocity zeroed, disposed).

use itertools::{Either, Itertools};
use log::error;
use std::collections::BTreeMap;

use crate::constants::Second;
use crate::orrery_errors::OrreryError;
use crate::primary::Primary;
use crate::propagator::params::PropagatorParams;
use crate::time_control::SimulationClock;
use crate::vehicle::{StepOutcome, Vehicle};

/// Index of a primary in a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimaryId(pub usize);

/// Identifier of a vehicle in a [`Simulator`]; never reused after a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleId(pub usize);

/// What happened during one [`Simulator::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Simulated time step, in seconds.
    pub dt: Second,
    /// Vehicles that reached their primary, as they were when removed from the registry.
    pub removed: Vec<(VehicleId, Vehicle)>,
    /// Vehicles whose step failed; their state is unchanged.
    pub failures: Vec<(VehicleId, OrreryError)>,
}

#[derive(Debug, Default)]
pub struct Simulator {
    primaries: Vec<Primary>,
    vehicles: BTreeMap<VehicleId, Vehicle>,
    next_vehicle: usize,
    selected: Option<VehicleId>,
    thrust: f64,
    pub params: PropagatorParams,
    pub clock: SimulationClock,
}

impl Simulator {
    pub fn new(params: PropagatorParams, clock: SimulationClock) -> Self {
        Simulator {
            params,
            clock,
            ..Default::default()
        }
    }

    pub fn add_primary(&mut self, primary: Primary) -> PrimaryId {
        self.primaries.push(primary);
        PrimaryId(self.primaries.len() - 1)
    }

    /// Register `vehicle` around `primary` and compute its orbit.
    ///
    /// Return
    /// ----------
    /// * `Err(OrreryError::UnknownPrimary)` if `primary` is not registered.
    pub fn add_vehicle(&mut self, mut vehicle: Vehicle, primary: PrimaryId) -> Result<VehicleId, OrreryError> {
        let body = self
            .primaries
            .get(primary.0)
            .ok_or(OrreryError::UnknownPrimary(primary.0))?;
        vehicle.primary = Some(primary);
        vehicle.calc_orbit(body)?;

        let id = VehicleId(self.next_vehicle);
        self.next_vehicle += 1;
        self.vehicles.insert(id, vehicle);
        Ok(id)
    }

    pub fn remove_vehicle(&mut self, id: VehicleId) -> Option<Vehicle> {
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.vehicles.remove(&id)
    }

    /// Select the vehicle receiving the thrust command.
    pub fn select(&mut self, id: Option<VehicleId>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<VehicleId> {
        self.selected
    }

    /// Thrust command for the selected vehicle; the others always get zero.
    pub fn set_thrust(&mut self, thrust: f64) {
        self.thrust = thrust;
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(&id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = (VehicleId, &Vehicle)> {
        self.vehicles.iter().map(|(id, vehicle)| (*id, vehicle))
    }

    pub fn primary(&self, id: PrimaryId) -> Option<&Primary> {
        self.primaries.get(id.0)
    }

    /// Simulate every vehicle for `dt` seconds.
    pub fn update(&mut self, dt: Second) -> TickReport {
        let primaries = &self.primaries;
        let params = &self.params;
        let selected = self.selected;
        let thrust = self.thrust;

        let (landed, failures): (Vec<VehicleId>, Vec<(VehicleId, OrreryError)>) = self
            .vehicles
            .iter_mut()
            .filter_map(|(id, vehicle)| {
                let command = if selected == Some(*id) { thrust } else { 0.0 };
                let step = vehicle
                    .primary
                    .ok_or_else(|| OrreryError::NoPrimary(vehicle.name.clone()))
                    .and_then(|primary| {
                        primaries
                            .get(primary.0)
                            .ok_or(OrreryError::UnknownPrimary(primary.0))
                    })
                    .and_then(|primary| vehicle.simulate(primary, dt, command, params));

                match step {
                    Ok(StepOutcome::Propagated(_)) => None,
                    Ok(StepOutcome::Removed) => Some(Either::Left(*id)),
                    Err(err) => {
                        error!("Step of vehicle {} ({:?}) failed: {err}", vehicle.name, id);
                        Some(Either::Right((*id, err)))
                    }
                }
            })
            .partition_map(|outcome| outcome);

        let removed = landed
            .into_iter()
            .filter_map(|id| self.remove_vehicle(id).map(|vehicle| (id, vehicle)))
            .collect();

        TickReport {
            dt,
            removed,
            failures,
        }
    }

    /// Advance the clock by a real frame delta, then simulate the resulting step.
    ///
    /// Nothing is simulated while the clock is paused.
    pub fn advance(&mut self, real_delta: Second) -> TickReport {
        let dt = self.clock.tick(real_delta);
        if dt == 0.0 {
            return TickReport::default();
        }
        self.update(dt)
    }
}

#[cfg(test)]
mod simulator_test {
    use super::*;
    use crate::constants::{EARTH_MASS, EARTH_RADIUS};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn scene() -> (Simulator, PrimaryId) {
        let mut sim = Simulator::default();
        let earth = sim.add_primary(Primary::new("Earth", EARTH_MASS, EARTH_RADIUS));
        (sim, earth)
    }

    fn orbiter(name: &str) -> Vehicle {
        Vehicle::new(
            name,
            Vector3::new(2. * EARTH_RADIUS, 0.0, 0.0),
            Vector3::new(0.0, 5588.0, 50.0),
        )
    }

    #[test]
    fn test_add_vehicle() {
        let (mut sim, earth) = scene();
        let id = sim.add_vehicle(orbiter("one"), earth).unwrap();
        let vehicle = sim.vehicle(id).unwrap();
        assert_eq!(vehicle.primary, Some(earth));
        assert!(vehicle.elements.is_some());

        assert_eq!(
            sim.add_vehicle(orbiter("two"), PrimaryId(4)).unwrap_err(),
            OrreryError::UnknownPrimary(4)
        );
        assert_eq!(sim.vehicles().count(), 1);
        assert_eq!(sim.primary(earth).unwrap().name, "Earth");
    }

    #[test]
    fn test_crashed_vehicle_removed_once() {
        let (mut sim, earth) = scene();
        let orbiting = sim.add_vehicle(orbiter("orbiting"), earth).unwrap();
        let crashed = sim
            .add_vehicle(
                Vehicle::new(
                    "crashed",
                    Vector3::new(EARTH_RADIUS * 0.5, 0.0, 0.0),
                    Vector3::new(0.0, 10.0, 0.0),
                ),
                earth,
            )
            .unwrap();
        sim.select(Some(crashed));

        let report = sim.update(1.0);
        assert_eq!(report.removed.len(), 1);
        let (id, vehicle) = &report.removed[0];
        assert_eq!(*id, crashed);
        assert_eq!(vehicle.name, "crashed");
        assert!(vehicle.disposed);
        assert_eq!(vehicle.state().velocity, Vector3::zeros());
        assert!(report.failures.is_empty());
        assert!(sim.vehicle(crashed).is_none());
        assert_eq!(sim.selected(), None);

        let report = sim.update(1.0);
        assert!(report.removed.is_empty());
        assert!(sim.vehicle(orbiting).is_some());
    }

    #[test]
    fn test_failure_is_isolated() {
        let (mut sim, earth) = scene();
        let healthy = sim.add_vehicle(orbiter("healthy"), earth).unwrap();
        let broken = sim.add_vehicle(orbiter("broken"), earth).unwrap();
        let before = sim.vehicle(broken).unwrap().clone();

        sim.select(Some(broken));
        sim.set_thrust(f64::NAN);
        let start = sim.vehicle(healthy).unwrap().position;
        let report = sim.update(10.0);

        assert_eq!(report.failures, vec![(broken, OrreryError::NonFiniteState)]);
        assert_eq!(sim.vehicle(broken).unwrap().position, before.position);
        assert_ne!(sim.vehicle(healthy).unwrap().position, start);
    }

    #[test]
    fn test_thrust_only_reaches_selected_vehicle() {
        let (mut sim, earth) = scene();
        let pushed = sim.add_vehicle(orbiter("pushed"), earth).unwrap();
        let coasting = sim.add_vehicle(orbiter("coasting"), earth).unwrap();
        sim.select(Some(pushed));
        sim.set_thrust(1.0);

        for _ in 0..10 {
            sim.update(1.0);
        }
        let a_pushed = sim.vehicle(pushed).unwrap().elements.as_ref().unwrap().semi_major_axis;
        let a_coasting = sim
            .vehicle(coasting)
            .unwrap()
            .elements
            .as_ref()
            .unwrap()
            .semi_major_axis;
        assert!(a_pushed > a_coasting);
    }

    #[test]
    fn test_advance_follows_clock() {
        let (mut sim, earth) = scene();
        let id = sim.add_vehicle(orbiter("one"), earth).unwrap();

        let report = sim.advance(0.05);
        assert_relative_eq!(report.dt, 0.05);

        sim.clock.toggle_pause();
        let position = sim.vehicle(id).unwrap().position;
        let report = sim.advance(0.05);
        assert_eq!(report, TickReport::default());
        assert_eq!(sim.vehicle(id).unwrap().position, position);
    }
}
