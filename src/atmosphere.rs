//! # Atmosphere models
//!
//! A primary exposes the density of its atmosphere as a function of altitude through the
//! [`AtmosphereModel`] trait. A positive density switches the propagator of every vehicle
//! inside it to numerical integration with drag.
//!
//! Implementations
//! -----------------
//! * [`NoAtmosphere`] – Airless body.
//! * [`ExponentialAtmosphere`] – Isothermal exponential profile cut at a given thickness.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::constants::{
    KilogramPerCubicMeter, Meter, EARTH_ATMOSPHERE_THICKNESS, MARS_ATMOSPHERE_THICKNESS,
};

/// Density profile of an atmosphere.
pub trait AtmosphereModel: Send + Sync + Debug {
    /// Density in kg/m³ at `altitude` meters above the surface. Zero outside the
    /// atmosphere.
    fn density(&self, altitude: Meter) -> KilogramPerCubicMeter;
}

/// Airless body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoAtmosphere;

impl AtmosphereModel for NoAtmosphere {
    fn density(&self, _altitude: Meter) -> KilogramPerCubicMeter {
        0.0
    }
}

/// `ρ(h) = ρ₀·exp(−h/H)` below `thickness`, zero at or above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialAtmosphere {
    pub surface_density: KilogramPerCubicMeter,
    pub scale_height: Meter,
    pub thickness: Meter,
}

impl ExponentialAtmosphere {
    pub fn new(surface_density: f64, scale_height: f64, thickness: f64) -> Self {
        ExponentialAtmosphere {
            surface_density,
            scale_height,
            thickness,
        }
    }

    /// Sea-level density 1.225 kg/m³, scale height 8.5 km.
    pub fn earth() -> Self {
        Self::new(1.225, 8_500.0, EARTH_ATMOSPHERE_THICKNESS)
    }

    /// Surface density 0.020 kg/m³, scale height 11.1 km.
    pub fn mars() -> Self {
        Self::new(0.020, 11_100.0, MARS_ATMOSPHERE_THICKNESS)
    }
}

impl AtmosphereModel for ExponentialAtmosphere {
    fn density(&self, altitude: Meter) -> KilogramPerCubicMeter {
        if !(altitude < self.thickness) {
            return 0.0;
        }
        self.surface_density * (-altitude.max(0.0) / self.scale_height).exp()
    }
}
