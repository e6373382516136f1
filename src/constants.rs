//! # Constants and type definitions for Orrery
//!
//! This module centralizes the **physical constants**, **numerical thresholds**, and
//! **unit aliases** used throughout the `orrery` crate.
//!
//! ## Overview
//!
//! - Gravitational constant and reference bodies (SI units)
//! - Thresholds used to classify degenerate orbit geometries
//! - Default tolerances of the Kepler solver
//! - Unit aliases used in signatures to make intent explicit

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Newtonian constant of gravitation in m³ kg⁻¹ s⁻² (CODATA 2018)
pub const G: f64 = 6.674_30e-11;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Kilometer in meters
pub const KM: f64 = 1000.0;

/// Earth mass in kilograms
pub const EARTH_MASS: f64 = 5.97219e24;

/// Earth mean equatorial radius in meters
pub const EARTH_RADIUS: f64 = 6_378.0 * KM;

/// Height above which the Earth atmosphere is considered empty, in meters
pub const EARTH_ATMOSPHERE_THICKNESS: f64 = 500.0 * KM;

/// Mars mass in kilograms
pub const MARS_MASS: f64 = 6.4171e23;

/// Mars mean equatorial radius in meters
pub const MARS_RADIUS: f64 = 3_396.2 * KM;

/// Height above which the Mars atmosphere is considered empty, in meters
pub const MARS_ATMOSPHERE_THICKNESS: f64 = 200.0 * KM;

// -------------------------------------------------------------------------------------------------
// Numerical thresholds
// -------------------------------------------------------------------------------------------------

/// Threshold below which eccentricity, inclination or `|e - 1|` are treated as zero
pub const SMALL_NUMBER: f64 = 1e-15;

/// Default relative tolerance of the Kepler equation solvers
pub const KEPLER_TOLERANCE: f64 = 1e-14;

/// Iteration budget of the Newton-Raphson refinement in the elliptic Kepler solve
pub const KEPLER_NEWTON_MAX_ITER: usize = 20;

/// Iteration budget of the bisection solves (elliptic fallback and hyperbolic solve)
pub const KEPLER_BISECT_MAX_ITER: usize = 200;

/// Number of times the hyperbolic bracket `[0, 2π]` may be doubled before giving up
pub const MAX_BRACKET_EXPANSIONS: usize = 8;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Duration in seconds
pub type Second = f64;
/// Mass in kilograms
pub type Kilogram = f64;
/// Acceleration in m/s²
pub type MeterPerSecondSquared = f64;
/// Density in kg/m³
pub type KilogramPerCubicMeter = f64;
