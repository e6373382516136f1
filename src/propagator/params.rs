use serde::{Deserialize, Serialize};
use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use crate::constants::KEPLER_TOLERANCE;
use crate::orrery_errors::OrreryError;

/// Tuning of the trajectory propagator.
///
/// Defaults
/// -----------------
/// * `substeps`: 32 leapfrog substeps per tick
/// * `drag_coefficient`: 1e-3 (drag acceleration per unit density and speed²)
/// * `max_drag_fraction`: 0.01 (cap on the velocity fraction removed per second)
/// * `thrust_scale`: 2.0 (thrust command → acceleration along the velocity)
/// * `kepler_tolerance`: 1e-14
///
/// Notes & Validation
/// -----------------
/// * `substeps ≥ 1`, `drag_coefficient ≥ 0`, `max_drag_fraction ≥ 0`.
/// * `thrust_scale` finite, `kepler_tolerance > 0`.
/// * Deserializing fills missing fields with the defaults; it does not validate, use
///   [`PropagatorParams::validated`] afterwards.
///
/// See also
/// -----------------
/// * [`crate::vehicle::Vehicle::simulate`] – Consumes these parameters.
/// * [`crate::propagator::leapfrog::Leapfrog`] – Numerical integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagatorParams {
    pub substeps: usize,
    pub drag_coefficient: f64,
    pub max_drag_fraction: f64,
    pub thrust_scale: f64,
    pub kepler_tolerance: f64,
}

impl PropagatorParams {
    /// Equivalent to [`PropagatorParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent builder starting from the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use orrery::propagator::params::PropagatorParams;
    ///
    /// let params = PropagatorParams::builder()
    ///     .substeps(64)
    ///     .drag_coefficient(5e-4)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.substeps, 64);
    /// ```
    pub fn builder() -> PropagatorParamsBuilder {
        PropagatorParamsBuilder::new()
    }

    /// Run the builder validation on an existing value (e.g. after deserialization).
    pub fn validated(self) -> Result<Self, OrreryError> {
        PropagatorParamsBuilder { params: self }.build()
    }
}

impl Default for PropagatorParams {
    fn default() -> Self {
        PropagatorParams {
            substeps: 32,
            drag_coefficient: 1e-3,
            max_drag_fraction: 0.01,
            thrust_scale: 2.0,
            kepler_tolerance: KEPLER_TOLERANCE,
        }
    }
}

/// Builder for [`PropagatorParams`], with validation.
#[derive(Debug, Clone)]
pub struct PropagatorParamsBuilder {
    params: PropagatorParams,
}

impl Default for PropagatorParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PropagatorParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: PropagatorParams::default(),
        }
    }

    pub fn substeps(mut self, v: usize) -> Self {
        self.params.substeps = v;
        self
    }
    pub fn drag_coefficient(mut self, v: f64) -> Self {
        self.params.drag_coefficient = v;
        self
    }
    pub fn max_drag_fraction(mut self, v: f64) -> Self {
        self.params.max_drag_fraction = v;
        self
    }
    pub fn thrust_scale(mut self, v: f64) -> Self {
        self.params.thrust_scale = v;
        self
    }
    pub fn kepler_tolerance(mut self, v: f64) -> Self {
        self.params.kepler_tolerance = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Validate and produce the parameters.
    ///
    /// Returns
    /// -----------------
    /// * `Err(OrreryError::InvalidPropagatorParameter)` naming the first rule that fails.
    pub fn build(self) -> Result<PropagatorParams, OrreryError> {
        let p = &self.params;

        if p.substeps == 0 {
            return Err(OrreryError::InvalidPropagatorParameter(
                "substeps must be >= 1".into(),
            ));
        }
        if !Self::ge0(p.drag_coefficient) || !Self::ge0(p.max_drag_fraction) {
            return Err(OrreryError::InvalidPropagatorParameter(
                "drag parameters must be non-negative".into(),
            ));
        }
        if !p.thrust_scale.is_finite() {
            return Err(OrreryError::InvalidPropagatorParameter(
                "thrust_scale must be finite".into(),
            ));
        }
        if !Self::gt0(p.kepler_tolerance) {
            return Err(OrreryError::InvalidPropagatorParameter(
                "kepler_tolerance must be > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for PropagatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Propagator Parameters")?;
            writeln!(f, "---------------------")?;
            writeln!(f, "  substeps          = {:<12}# Leapfrog substeps per tick", self.substeps)?;
            writeln!(
                f,
                "  drag_coefficient  = {:<12.1e}# Drag per unit density and speed²",
                self.drag_coefficient
            )?;
            writeln!(
                f,
                "  max_drag_fraction = {:<12.3}# Cap on velocity fraction removed per second",
                self.max_drag_fraction
            )?;
            writeln!(
                f,
                "  thrust_scale      = {:<12.3}# Thrust command to acceleration",
                self.thrust_scale
            )?;
            writeln!(
                f,
                "  kepler_tolerance  = {:<12.1e}# Tolerance in Kepler solver",
                self.kepler_tolerance
            )
        } else {
            write!(
                f,
                "PropagatorParams(substeps={}, drag_coefficient={:.1e}, max_drag_fraction={:.3}, thrust_scale={:.2}, kepler_tolerance={:.1e})",
                self.substeps,
                self.drag_coefficient,
                self.max_drag_fraction,
                self.thrust_scale,
                self.kepler_tolerance
            )
        }
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PropagatorParams::new();
        assert_eq!(params.substeps, 32);
        assert_eq!(params.drag_coefficient, 1e-3);
        assert_eq!(params.max_drag_fraction, 0.01);
        assert_eq!(params.thrust_scale, 2.0);
        assert_eq!(params.kepler_tolerance, 1e-14);
        assert_eq!(PropagatorParams::builder().build().unwrap(), params);
    }

    #[test]
    fn test_builder_validation() {
        let err = PropagatorParams::builder().substeps(0).build().unwrap_err();
        assert_eq!(
            err,
            OrreryError::InvalidPropagatorParameter("substeps must be >= 1".into())
        );

        assert!(PropagatorParams::builder()
            .drag_coefficient(-1.0)
            .build()
            .is_err());
        assert!(PropagatorParams::builder()
            .max_drag_fraction(f64::NAN)
            .build()
            .is_err());
        assert!(PropagatorParams::builder()
            .thrust_scale(f64::INFINITY)
            .build()
            .is_err());
        assert!(PropagatorParams::builder()
            .kepler_tolerance(0.0)
            .build()
            .is_err());

        // Zero drag is allowed
        assert!(PropagatorParams::builder()
            .drag_coefficient(0.0)
            .max_drag_fraction(0.0)
            .build()
            .is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let params: PropagatorParams =
            serde_json::from_str(r#"{ "substeps": 8, "thrust_scale": 1.0 }"#).unwrap();
        assert_eq!(params.substeps, 8);
        assert_eq!(params.thrust_scale, 1.0);
        assert_eq!(params.drag_coefficient, 1e-3);
        assert!(params.validated().is_ok());

        let params: PropagatorParams = serde_json::from_str(r#"{ "substeps": 0 }"#).unwrap();
        assert!(params.validated().is_err());
    }

    #[test]
    fn test_display() {
        let params = PropagatorParams::default();
        assert!(params.to_string().starts_with("PropagatorParams(substeps=32"));
        let pretty = format!("{params:#}");
        assert!(pretty.contains("Propagator Parameters"));
        assert!(pretty.contains("substeps          = 32"));
    }
}
