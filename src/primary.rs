//! # Primary bodies
//!
//! The dominant attracting body of a vehicle. A primary is a point mass with a spherical
//! surface and an optional atmosphere; its position is fixed during a tick.

use nalgebra::Vector3;
use std::sync::Arc;

use crate::atmosphere::{AtmosphereModel, ExponentialAtmosphere, NoAtmosphere};
use crate::constants::{
    Kilogram, KilogramPerCubicMeter, Meter, EARTH_MASS, EARTH_RADIUS, G, MARS_MASS, MARS_RADIUS,
};

#[derive(Debug, Clone)]
pub struct Primary {
    pub name: String,
    pub mass: Kilogram,
    pub radius: Meter,
    pub position: Vector3<f64>,
    pub atmosphere: Arc<dyn AtmosphereModel>,
}

impl Primary {
    /// Airless primary at the origin.
    pub fn new(name: impl Into<String>, mass: Kilogram, radius: Meter) -> Self {
        Primary {
            name: name.into(),
            mass,
            radius,
            position: Vector3::zeros(),
            atmosphere: Arc::new(NoAtmosphere),
        }
    }

    pub fn with_position(mut self, position: Vector3<f64>) -> Self {
        self.position = position;
        self
    }

    pub fn with_atmosphere(mut self, atmosphere: impl AtmosphereModel + 'static) -> Self {
        self.atmosphere = Arc::new(atmosphere);
        self
    }

    /// Earth with an exponential atmosphere.
    pub fn earth() -> Self {
        Self::new("Earth", EARTH_MASS, EARTH_RADIUS).with_atmosphere(ExponentialAtmosphere::earth())
    }

    /// Mars with an exponential atmosphere.
    pub fn mars() -> Self {
        Self::new("Mars", MARS_MASS, MARS_RADIUS).with_atmosphere(ExponentialAtmosphere::mars())
    }

    /// `μ = G·M`
    pub fn gravitational_parameter(&self) -> f64 {
        G * self.mass
    }

    /// Height of `point` above the surface; negative below it.
    pub fn altitude_of(&self, point: &Vector3<f64>) -> Meter {
        (point - self.position).norm() - self.radius
    }

    pub fn atmosphere_density(&self, altitude: Meter) -> KilogramPerCubicMeter {
        self.atmosphere.density(altitude)
    }
}

#[cfg(test)]
mod primary_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_altitude() {
        let earth = Primary::earth().with_position(Vector3::new(1e9, 0.0, 0.0));
        let point = Vector3::new(1e9 + 2. * EARTH_RADIUS, 0.0, 0.0);
        assert_relative_eq!(earth.altitude_of(&point), EARTH_RADIUS);
        assert!(earth.altitude_of(&earth.position) < 0.0);
    }

    #[test]
    fn test_gravitational_parameter() {
        assert_relative_eq!(
            Primary::earth().gravitational_parameter(),
            3.986e14,
            max_relative = 1e-3
        );
    }

    #[test]
    fn test_atmosphere_density() {
        let earth = Primary::earth();
        assert!(earth.atmosphere_density(100_000.0) > 0.0);
        assert_eq!(earth.atmosphere_density(EARTH_RADIUS), 0.0);

        let airless = Primary::new("Rock", 1e20, 1e5);
        assert_eq!(airless.atmosphere_density(0.0), 0.0);
    }
}
