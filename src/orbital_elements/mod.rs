//! # Osculating orbital elements
//!
//! This module defines [`OrbitalElements`], the classical element set of a two-body
//! trajectory, and the conversions between it and a Cartesian state vector.
//!
//! ## What is stored?
//!
//! 1. **a** – Semi-major axis, signed: negative for hyperbolic trajectories, `0` on the
//!    parabolic boundary.
//! 2. **p** – Semi-latus rectum `|h|²/μ`, defined for every conic.
//! 3. **e** – Eccentricity (unitless).
//! 4. **i** – Inclination in `[0, π]` (radians).
//! 5. **Ω** – Longitude of ascending node (radians).
//! 6. **ω** – Argument of periapsis (radians).
//! 7. **ν** – True anomaly (radians).
//! 8. **M** – Mean anomaly (radians). Wrapped into `[0, 2π)` for closed orbits,
//!    unbounded for open ones.
//!
//! together with the gravitational parameter `μ = G·(m₁ + m₂)`, the [`OrbitShape`] tag
//! and the three vectors the elements were derived from (angular momentum `h`, node
//! vector `n`, eccentricity vector `e`). The orbit orientation is rebuilt from those
//! vectors on demand, see [`OrbitalElements::rotation`].
//!
//! ## Units
//!
//! Any consistent system works; the rest of the crate uses SI (m, s, kg).
//!
//! ## Degeneracies
//!
//! - **Circular orbits (`e → 0`)**: periapsis undefined, `ω = 0` and the true anomaly is
//!   measured from the ascending node (or from the x axis when also equatorial).
//! - **Equatorial orbits (`i → 0` or `π`)**: node undefined, `Ω = 0` and `ω` is measured
//!   from the x axis.
//! - **Parabolic trajectories (`e → 1`)**: `a = 0`, the anomalies use Barker's equation.
//!
//! None of these raise an error.
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Vector3;
//! use orrery::orbital_elements::OrbitalElements;
//!
//! let mut elements = OrbitalElements::new(3.986e5).unwrap();
//! elements.from_state_vector(
//!     &Vector3::new(1000.0, 5000.0, 7000.0),
//!     &Vector3::new(3.0, 4.0, 5.0),
//! );
//! assert!(elements.eccentricity > 0.94 && elements.eccentricity < 0.95);
//!
//! let state = elements.to_inertial(None).unwrap();
//! assert!((state.position - Vector3::new(1000.0, 5000.0, 7000.0)).norm() < 1e-6);
//! ```
//!
//! ## See also
//!
//! - [`anomaly`] – Conversions between true, eccentric and mean anomalies.
//! - [`frames`] – Perifocal and inertial state vectors, trajectory sampling.
//! - [`crate::kepler`] – The Kepler equation solvers.

pub mod anomaly;
pub mod frames;
pub mod orbit_shape;

use nalgebra::Vector3;
use std::f64::consts::PI;
use std::fmt;

use crate::constants::{Kilogram, Meter, Radian, DPI, G, SMALL_NUMBER};
use crate::kepler::principal_angle;
use crate::orrery_errors::OrreryError;

pub use frames::StateVectors;
pub use orbit_shape::OrbitShape;

/// Osculating two-body elements.
///
/// Notes
/// -----
/// The elements are consistent with a state vector only right after
/// [`OrbitalElements::from_state_vector`] or an analytic anomaly update. Changing the
/// underlying position or velocity invalidates them until the next recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalElements {
    pub mu: f64,
    pub semi_major_axis: Meter,
    pub semi_latus_rectum: Meter,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node_longitude: Radian,
    pub periapsis_argument: Radian,
    pub true_anomaly: Radian,
    pub mean_anomaly: Radian,
    pub shape: OrbitShape,
    pub angular_momentum: Vector3<f64>,
    pub node_vector: Vector3<f64>,
    pub eccentricity_vector: Vector3<f64>,
}

/// Angle between two vectors in `[0, π]`; `π/2` when one of them is null.
pub(crate) fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Radian {
    if a.norm_squared() == 0.0 || b.norm_squared() == 0.0 {
        return PI / 2.;
    }
    a.cross(b).norm().atan2(a.dot(b))
}

/// Angular momentum (nearly) along the z axis.
fn is_equatorial(h: &Vector3<f64>) -> bool {
    h.x.abs() + h.y.abs() < SMALL_NUMBER * h.norm()
}

fn check_mu(mu: f64) -> Result<f64, OrreryError> {
    if mu.is_finite() && mu > 0.0 {
        Ok(mu)
    } else {
        Err(OrreryError::InvalidGravitationalParameter(mu))
    }
}

impl OrbitalElements {
    /// Empty elements for the gravitational parameter `mu`.
    ///
    /// Return
    /// ----------
    /// * `Err(OrreryError::InvalidGravitationalParameter)` unless `mu` is finite and `> 0`.
    pub fn new(mu: f64) -> Result<Self, OrreryError> {
        Ok(OrbitalElements {
            mu: check_mu(mu)?,
            semi_major_axis: 0.0,
            semi_latus_rectum: 0.0,
            eccentricity: 0.0,
            inclination: 0.0,
            ascending_node_longitude: 0.0,
            periapsis_argument: 0.0,
            true_anomaly: 0.0,
            mean_anomaly: 0.0,
            shape: OrbitShape::Circular,
            angular_momentum: Vector3::z(),
            node_vector: Vector3::zeros(),
            eccentricity_vector: Vector3::zeros(),
        })
    }

    /// Empty elements for a primary of mass `m1` and a secondary of mass `m2` (kg).
    pub fn from_masses(m1: Kilogram, m2: Kilogram) -> Result<Self, OrreryError> {
        Self::new(G * (m1 + m2))
    }

    /// Replace the gravitational parameter; the other elements are left untouched.
    pub fn set_mu(&mut self, mu: f64) -> Result<(), OrreryError> {
        self.mu = check_mu(mu)?;
        Ok(())
    }

    /// Replace the gravitational parameter by `G·(m1 + m2)`.
    pub fn set_masses(&mut self, m1: Kilogram, m2: Kilogram) -> Result<(), OrreryError> {
        self.set_mu(G * (m1 + m2))
    }

    /// Set the conic directly from its semi-major axis and eccentricity, in the reference
    /// plane with periapsis along +x.
    ///
    /// `p = a(1 − e²)`; with `a = 0` the current semi-latus rectum is kept, so a parabola
    /// is better built with [`OrbitalElements::with_periapsis_distance`].
    pub fn with_conic(mut self, semi_major_axis: Meter, eccentricity: f64) -> Self {
        self.semi_major_axis = semi_major_axis;
        if semi_major_axis != 0.0 {
            self.semi_latus_rectum = semi_major_axis * (1. - eccentricity * eccentricity);
        }
        self.set_planar_shape(eccentricity);
        self
    }

    /// Set the conic from its periapsis distance `q` and eccentricity, in the reference
    /// plane with periapsis along +x. Works for every shape, including the parabola.
    pub fn with_periapsis_distance(mut self, periapsis: Meter, eccentricity: f64) -> Self {
        self.semi_latus_rectum = periapsis * (1. + eccentricity);
        self.semi_major_axis = if (eccentricity - 1.).abs() > SMALL_NUMBER {
            periapsis / (1. - eccentricity)
        } else {
            0.0
        };
        self.set_planar_shape(eccentricity);
        self
    }

    fn set_planar_shape(&mut self, eccentricity: f64) {
        self.eccentricity = eccentricity;
        self.shape = OrbitShape::from_eccentricity(eccentricity);
        self.inclination = 0.0;
        self.ascending_node_longitude = 0.0;
        self.periapsis_argument = 0.0;
        self.angular_momentum = Vector3::z() * (self.mu * self.semi_latus_rectum.abs()).sqrt();
        self.node_vector = Vector3::zeros();
        self.eccentricity_vector = Vector3::x() * eccentricity;
    }

    /// Compute the elements from a position and velocity relative to the primary.
    ///
    /// Arguments
    /// -----------------
    /// * `position` – relative position `r`.
    /// * `velocity` – relative velocity `v`.
    ///
    /// Remarks
    /// -------------
    /// * Every element, the shape tag and the `h`, `n`, `e` vectors are overwritten.
    /// * Circular, equatorial and parabolic geometries are resolved by convention (see
    ///   the module documentation) and never fail.
    pub fn from_state_vector(&mut self, position: &Vector3<f64>, velocity: &Vector3<f64>) {
        let mu = self.mu;

        // Angular momentum, normal to the orbital plane
        let h = position.cross(velocity);
        let is_flat = is_equatorial(&h);

        // Ascending node: ẑ × h, null for equatorial orbits
        let n = Vector3::new(-h.y, h.x, 0.0);

        // Eccentricity vector, towards periapsis
        let r = position.norm();
        let ev = (position * (velocity.norm_squared() - mu / r) - velocity * position.dot(velocity))
            / mu;
        let e = ev.norm();
        let shape = OrbitShape::from_eccentricity(e);

        let p = h.norm_squared() / mu;
        let a = if (e - 1.).abs() > SMALL_NUMBER {
            p / (1. - e * e)
        } else {
            0.0
        };

        let i = h.x.hypot(h.y).atan2(h.z);

        let raan = if is_flat {
            0.0
        } else {
            let raan = (n.x / n.norm()).clamp(-1., 1.).acos();
            if n.y < 0.0 {
                DPI - raan
            } else {
                raan
            }
        };

        let ap = if shape == OrbitShape::Circular {
            0.0
        } else if is_flat {
            ev.y.atan2(ev.x)
        } else {
            let ap = angle_between(&n, &ev);
            if ev.z < 0.0 {
                DPI - ap
            } else {
                ap
            }
        };

        let ta = match shape {
            OrbitShape::Circular if is_flat => {
                let ta = (position.x / r).clamp(-1., 1.).acos();
                if velocity.x > 0.0 {
                    DPI - ta
                } else {
                    ta
                }
            }
            OrbitShape::Circular => {
                let ta = angle_between(&n, position);
                if n.dot(velocity) > 0.0 {
                    DPI - ta
                } else {
                    ta
                }
            }
            _ => {
                let ta = angle_between(&ev, position);
                if position.dot(velocity) < 0.0 {
                    DPI - ta
                } else {
                    ta
                }
            }
        };

        self.semi_major_axis = a;
        self.semi_latus_rectum = p;
        self.eccentricity = e;
        self.inclination = i;
        self.ascending_node_longitude = raan;
        self.periapsis_argument = principal_angle(ap);
        self.true_anomaly = principal_angle(ta);
        self.shape = shape;
        self.angular_momentum = h;
        self.node_vector = n;
        self.eccentricity_vector = ev;
        self.mean_anomaly = self.mean_from_true(self.true_anomaly);
    }

    /// True when the orbital plane is the reference plane (prograde or retrograde).
    pub fn is_equatorial(&self) -> bool {
        is_equatorial(&self.angular_momentum)
    }

    /// Orbital period `2π/n`, `None` for open trajectories.
    pub fn period(&self) -> Option<f64> {
        self.shape.is_closed().then(|| DPI / self.mean_motion())
    }

    /// Distance of closest approach `p/(1 + e)`.
    pub fn periapsis_distance(&self) -> Meter {
        self.semi_latus_rectum / (1. + self.eccentricity)
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 180.0 / PI;
        writeln!(
            f,
            "Orbital Elements ({}, mu = {:.6e})",
            self.shape, self.mu
        )?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6}",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  p   (semi-latus rectum)     = {:.6}",
            self.semi_latus_rectum
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6} rad ({:.6}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6} rad ({:.6}°)",
            self.periapsis_argument,
            self.periapsis_argument * rad_to_deg
        )?;
        writeln!(
            f,
            "  ν   (true anomaly)          = {:.6} rad ({:.6}°)",
            self.true_anomaly,
            self.true_anomaly * rad_to_deg
        )?;
        writeln!(
            f,
            "  M   (mean anomaly)          = {:.6} rad ({:.6}°)",
            self.mean_anomaly,
            self.mean_anomaly * rad_to_deg
        )
    }
}

#[cfg(test)]
pub(crate) mod orbital_elements_test {
    use super::*;
    use crate::constants::{EARTH_MASS, RADEG};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    pub(crate) const MU_KM: f64 = 3.986e5;

    pub(crate) fn reference_elements() -> OrbitalElements {
        let mut elements = OrbitalElements::new(MU_KM).unwrap();
        elements.from_state_vector(
            &Vector3::new(1000.0, 5000.0, 7000.0),
            &Vector3::new(3.0, 4.0, 5.0),
        );
        elements
    }

    #[test]
    fn test_reference_state_vector() {
        let elements = reference_elements();

        assert_eq!(elements.shape, OrbitShape::Elliptical);
        assert_relative_eq!(elements.eccentricity, 0.9475409674714041, epsilon = 1e-12);
        assert_relative_eq!(
            elements.semi_major_axis,
            9478.576758223926,
            max_relative = 1e-10
        );
        assert_abs_diff_eq!(elements.inclination / RADEG, 124.0479, epsilon = 1e-4);
        assert_abs_diff_eq!(
            elements.ascending_node_longitude / RADEG,
            190.6197,
            epsilon = 1e-4
        );
        assert_abs_diff_eq!(elements.periapsis_argument / RADEG, 303.0910, epsilon = 1e-4);
        assert_abs_diff_eq!(elements.true_anomaly / RADEG, 159.6116, epsilon = 1e-4);
    }

    #[test]
    fn test_invalid_mu_is_rejected() {
        assert_eq!(
            OrbitalElements::new(0.0),
            Err(OrreryError::InvalidGravitationalParameter(0.0))
        );
        assert!(OrbitalElements::new(f64::NAN).is_err());
        assert!(OrbitalElements::new(-1.0).is_err());

        let mut elements = OrbitalElements::new(1.0).unwrap();
        assert!(elements.set_mu(f64::INFINITY).is_err());
        assert_eq!(elements.mu, 1.0);
    }

    #[test]
    fn test_from_masses() {
        let elements = OrbitalElements::from_masses(EARTH_MASS, 0.0).unwrap();
        assert_relative_eq!(elements.mu, 3.986e14, max_relative = 1e-3);

        let mut elements = OrbitalElements::new(1.0).unwrap();
        elements.set_masses(EARTH_MASS, 1000.0).unwrap();
        assert_relative_eq!(elements.mu, G * (EARTH_MASS + 1000.0));
    }

    #[test]
    fn test_circular_equatorial() {
        let mut elements = OrbitalElements::new(MU_KM).unwrap();
        let r = 7000.0;
        let speed = (MU_KM / r).sqrt();
        let position = Vector3::new(r, 0.0, 0.0);
        elements.from_state_vector(&position, &Vector3::new(0.0, speed, 0.0));

        assert_eq!(elements.inclination, 0.0);
        assert_eq!(elements.ascending_node_longitude, 0.0);
        assert_relative_eq!(elements.semi_major_axis, r, max_relative = 1e-9);
        assert!(elements.eccentricity < 1e-9);

        let state = elements.to_inertial(None).unwrap();
        assert_abs_diff_eq!((state.position - position).norm(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_exactly_circular_equatorial_true_anomaly() {
        // Tagged circular: the anomaly is measured from +x, also for retrograde motion
        let mut elements = OrbitalElements::new(1.0).unwrap();
        for (ta, sense) in [(1.0_f64, 1.0), (4.0, 1.0), (1.0, -1.0), (4.0, -1.0)] {
            let position = Vector3::new(ta.cos(), sense * ta.sin(), 0.0);
            let velocity = Vector3::new(-ta.sin(), sense * ta.cos(), 0.0);
            elements.from_state_vector(&position, &velocity);

            assert_eq!(elements.shape, OrbitShape::Circular);
            assert_abs_diff_eq!(elements.true_anomaly, ta, epsilon = 1e-7);

            let state = elements.to_inertial(None).unwrap();
            assert_abs_diff_eq!((state.position - position).norm(), 0.0, epsilon = 1e-7);
            assert_abs_diff_eq!((state.velocity - velocity).norm(), 0.0, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_circular_inclined_measures_from_node() {
        let mut elements = OrbitalElements::new(1.0).unwrap();
        // Circle in the x-z plane, moving up through +x
        let position = Vector3::new(0.0, 0.0, 1.0);
        let velocity = Vector3::new(-1.0, 0.0, 0.0);
        elements.from_state_vector(&position, &velocity);

        assert_eq!(elements.shape, OrbitShape::Circular);
        assert_abs_diff_eq!(elements.inclination, PI / 2., epsilon = 1e-12);
        assert_eq!(elements.periapsis_argument, 0.0);
        assert_abs_diff_eq!(elements.true_anomaly, PI / 2., epsilon = 1e-12);

        let state = elements.to_inertial(None).unwrap();
        assert_abs_diff_eq!((state.position - position).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!((state.velocity - velocity).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hyperbolic_from_state_vector() {
        let mu = G * EARTH_MASS;
        let mut elements = OrbitalElements::new(mu).unwrap();
        let r0 = 6.378e6 * 2.;
        elements.from_state_vector(&Vector3::new(r0, 0.0, 0.0), &Vector3::new(0.0, 8590.0, 0.0));

        assert_eq!(elements.shape, OrbitShape::Hyperbolic);
        assert!(elements.semi_major_axis < 0.0);
        assert_abs_diff_eq!(elements.true_anomaly, 0.0, epsilon = 1e-9);

        // At periapsis the perifocal position is the initial position
        let state = elements.to_perifocal(None).unwrap();
        assert_relative_eq!(state.position.x, r0, max_relative = 1e-12);
        assert_abs_diff_eq!(state.position.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_nearly_circular_from_state_vector() {
        let mu = G * EARTH_MASS;
        let mut elements = OrbitalElements::new(mu).unwrap();
        let r0 = 6.378e6 * 2.;
        elements.from_state_vector(&Vector3::new(r0, 0.0, 0.0), &Vector3::new(0.0, 5590.0, 0.0));

        assert!(elements.eccentricity > 0.0 && elements.eccentricity < 0.1);
        assert_relative_eq!(elements.semi_major_axis / r0, 1.0, epsilon = 0.05);
        assert_abs_diff_eq!(elements.inclination, 0.0, epsilon = 1e-4);

        // Slightly below circular speed: the vehicle sits at apoapsis
        assert_abs_diff_eq!(elements.true_anomaly, PI, epsilon = 1e-12);
        let state = elements.to_perifocal(None).unwrap();
        assert_relative_eq!(state.position.x, -r0, max_relative = 1e-12);

        let ea = elements.eccentric_from_mean(0.0, 1e-14).unwrap();
        assert_eq!(elements.mean_from_eccentric(ea), 0.0);
    }

    #[test]
    fn test_with_conic_and_periapsis() {
        let elements = OrbitalElements::new(1.0).unwrap().with_conic(1e5, 0.9);
        assert_eq!(elements.shape, OrbitShape::Elliptical);
        assert_relative_eq!(elements.semi_latus_rectum, 1e5 * 0.19, max_relative = 1e-12);
        assert_relative_eq!(elements.periapsis_distance(), 1e4, max_relative = 1e-12);

        let parabola = OrbitalElements::new(1.0)
            .unwrap()
            .with_periapsis_distance(2.0, 1.0);
        assert_eq!(parabola.shape, OrbitShape::Parabolic);
        assert_eq!(parabola.semi_major_axis, 0.0);
        assert_eq!(parabola.semi_latus_rectum, 4.0);
        assert!(parabola.period().is_none());
    }

    #[test]
    fn test_period() {
        let elements = OrbitalElements::new(MU_KM).unwrap().with_conic(7000.0, 0.1);
        assert_relative_eq!(
            elements.period().unwrap(),
            DPI * (7000f64.powi(3) / MU_KM).sqrt(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_display() {
        let output = format!("{}", reference_elements());
        assert!(output.contains("Orbital Elements (elliptical"));
        assert!(output.contains("e   (eccentricity)          = 0.947541"));
        assert!(output.contains("124.04"));
    }

    #[test]
    fn test_angle_between_null_vector() {
        assert_eq!(
            angle_between(&Vector3::zeros(), &Vector3::x()),
            PI / 2.
        );
        assert_abs_diff_eq!(
            angle_between(&Vector3::x(), &Vector3::new(-2.0, 0.0, 0.0)),
            PI
        );
    }
}
