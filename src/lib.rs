//! Keplerian orbits for vehicles around a dominant primary.
//!
//! State vectors are converted to classical [`orbital_elements::OrbitalElements`] and
//! advanced either in closed form through Kepler's equation ([`kepler`]) or with a
//! leapfrog integrator when drag or thrust act ([`propagator`]). A [`simulator::Simulator`]
//! drives a set of [`vehicle::Vehicle`]s from a [`time_control::SimulationClock`].

pub mod atmosphere;
pub mod constants;
pub mod kepler;
pub mod orbital_elements;
pub mod orrery_errors;
pub mod primary;
pub mod propagator;
pub mod root_finder;
pub mod simulator;
pub mod time_control;
pub mod vehicle;
