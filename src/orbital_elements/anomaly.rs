//! # Anomaly conversions
//!
//! True (`ν`), eccentric (`E`, or `F` for hyperbolas) and mean (`M`) anomalies, dispatched
//! on the [`OrbitShape`] of the elements.
//!
//! On the parabolic boundary the role of the eccentric anomaly is played by Barker's
//! parameter `D = tan(ν/2)`, with `M = D + D³/3`.

use crate::constants::Radian;
use crate::kepler::{eccentric_from_mean_elliptic, eccentric_from_mean_hyperbolic, principal_angle};
use crate::orrery_errors::OrreryError;

use super::{OrbitShape, OrbitalElements};

/// Closed-form inverse of Barker's equation `M = D + D³/3`.
fn barker_inverse(mean_anomaly: f64) -> f64 {
    if mean_anomaly < 0.0 {
        return -barker_inverse(-mean_anomaly);
    }
    let a = 1.5 * mean_anomaly;
    let w = (a + (1. + a * a).sqrt()).cbrt();
    w - 1. / w
}

impl OrbitalElements {
    /// True anomaly from the eccentric anomaly.
    ///
    /// The elliptic branch `E + 2·atan2(β sin E, 1 − β cos E)` is not wrapped and stays
    /// close to `E`; the hyperbolic and parabolic branches return a value in `[0, 2π)`.
    pub fn true_from_eccentric(&self, eccentric_anomaly: f64) -> Radian {
        let e = self.eccentricity;
        match self.shape {
            OrbitShape::Hyperbolic => {
                let ratio = ((e + 1.) / (e - 1.)).sqrt();
                principal_angle(2. * (ratio * (eccentric_anomaly / 2.).tanh()).atan())
            }
            OrbitShape::Parabolic => principal_angle(2. * eccentric_anomaly.atan()),
            OrbitShape::Circular | OrbitShape::Elliptical => {
                let beta = e / (1. + (1. - e * e).sqrt());
                let (sin_e, cos_e) = eccentric_anomaly.sin_cos();
                eccentric_anomaly + 2. * (beta * sin_e).atan2(1. - beta * cos_e)
            }
        }
    }

    /// Eccentric anomaly from the true anomaly.
    ///
    /// Elliptic results lie in `[0, 2π)`. Hyperbolic results are signed and become NaN
    /// beyond the asymptotes, where the anomaly is unreachable.
    pub fn eccentric_from_true(&self, true_anomaly: Radian) -> f64 {
        let e = self.eccentricity;
        match self.shape {
            OrbitShape::Hyperbolic => {
                2. * (((e - 1.) / (e + 1.)).sqrt() * (true_anomaly / 2.).tan()).atanh()
            }
            OrbitShape::Parabolic => (true_anomaly / 2.).tan(),
            OrbitShape::Circular | OrbitShape::Elliptical => {
                let (sin_ta, cos_ta) = true_anomaly.sin_cos();
                principal_angle(((1. - e * e).sqrt() * sin_ta).atan2(e + cos_ta))
            }
        }
    }

    /// Mean anomaly from the eccentric anomaly (Kepler's equation).
    pub fn mean_from_eccentric(&self, eccentric_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        match self.shape {
            OrbitShape::Hyperbolic => e * eccentric_anomaly.sinh() - eccentric_anomaly,
            OrbitShape::Parabolic => eccentric_anomaly + eccentric_anomaly.powi(3) / 3.,
            OrbitShape::Circular | OrbitShape::Elliptical => {
                eccentric_anomaly - e * eccentric_anomaly.sin()
            }
        }
    }

    /// Eccentric anomaly from the mean anomaly.
    ///
    /// Arguments
    /// -----------------
    /// * `mean_anomaly` – mean anomaly `M` (radians).
    /// * `tolerance` – tolerance handed to the Kepler solver.
    ///
    /// Return
    /// ----------
    /// * `M` itself for circular orbits, the Kepler solution otherwise.
    /// * `Err(OrreryError::HyperbolicBracketNotFound)` if the hyperbolic solve fails.
    ///
    /// See also
    /// ------------
    /// * [`crate::kepler::eccentric_from_mean_elliptic`]
    /// * [`crate::kepler::eccentric_from_mean_hyperbolic`]
    pub fn eccentric_from_mean(&self, mean_anomaly: f64, tolerance: f64) -> Result<f64, OrreryError> {
        let e = self.eccentricity;
        match self.shape {
            OrbitShape::Circular => Ok(mean_anomaly),
            OrbitShape::Hyperbolic => eccentric_from_mean_hyperbolic(e, mean_anomaly, tolerance),
            OrbitShape::Parabolic => Ok(barker_inverse(mean_anomaly)),
            OrbitShape::Elliptical => Ok(eccentric_from_mean_elliptic(e, mean_anomaly, tolerance)),
        }
    }

    /// True anomaly reached at mean anomaly `M`.
    pub fn true_from_mean(&self, mean_anomaly: f64, tolerance: f64) -> Result<Radian, OrreryError> {
        let ea = self.eccentric_from_mean(mean_anomaly, tolerance)?;
        Ok(self.true_from_eccentric(ea))
    }

    /// Mean anomaly at true anomaly `ν`.
    pub fn mean_from_true(&self, true_anomaly: Radian) -> f64 {
        self.mean_from_eccentric(self.eccentric_from_true(true_anomaly))
    }

    /// Mean motion: `sqrt(μ/|a|³)`, or `2·sqrt(μ/p³)` on the parabolic boundary.
    pub fn mean_motion(&self) -> f64 {
        match self.shape {
            OrbitShape::Parabolic => 2. * (self.mu / self.semi_latus_rectum.powi(3)).sqrt(),
            _ => (self.mu / self.semi_major_axis.abs().powi(3)).sqrt(),
        }
    }
}

#[cfg(test)]
mod anomaly_test {
    use super::*;
    use crate::constants::{DPI, KEPLER_TOLERANCE};
    use crate::kepler::angle_diff;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn elements(a: f64, e: f64) -> OrbitalElements {
        OrbitalElements::new(1.0).unwrap().with_conic(a, e)
    }

    fn quarter_steps(to: f64) -> impl Iterator<Item = f64> {
        (0..).map(|k| k as f64 * 0.25).take_while(move |x| *x <= to)
    }

    #[test]
    fn test_circular_round_trips() {
        let orbit = elements(1e5, 0.0);
        for x in quarter_steps(6.0) {
            let ea = orbit.eccentric_from_true(x);
            assert_abs_diff_eq!(orbit.true_from_eccentric(ea), x, epsilon = 1e-9);

            let ea = orbit.eccentric_from_mean(x, KEPLER_TOLERANCE).unwrap();
            assert_abs_diff_eq!(orbit.mean_from_eccentric(ea), x, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_elliptical_round_trips() {
        let orbit = elements(1e5, 0.9);
        for x in quarter_steps(6.0) {
            let ea = orbit.eccentric_from_true(x);
            assert!(angle_diff(orbit.true_from_eccentric(ea), x).abs() < 1e-9);

            let ea = orbit.eccentric_from_mean(x, KEPLER_TOLERANCE).unwrap();
            assert_abs_diff_eq!(orbit.mean_from_eccentric(ea), x, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_hyperbolic_round_trips() {
        let orbit = elements(-1e5, 1.2);
        for ta in quarter_steps(2.5) {
            let ea = orbit.eccentric_from_true(ta);
            assert!(!ea.is_nan());
            assert_abs_diff_eq!(orbit.true_from_eccentric(ea), ta, epsilon = 1e-9);
        }

        for m in quarter_steps(6.0) {
            let ea = orbit.eccentric_from_mean(m, KEPLER_TOLERANCE).unwrap();
            assert_abs_diff_eq!(orbit.mean_from_eccentric(ea), m, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_hyperbolic_incoming_branch() {
        let orbit = elements(-1e5, 1.5);
        let ta = DPI - 1.0;
        let m = orbit.mean_from_true(ta);
        assert!(m < 0.0);
        let back = orbit.true_from_mean(m, KEPLER_TOLERANCE).unwrap();
        assert_abs_diff_eq!(back, ta, epsilon = 1e-9);
    }

    #[test]
    fn test_hyperbolic_beyond_asymptote_is_nan() {
        let orbit = elements(-1e5, 1.2);
        // acos(-1/1.2) ≈ 2.556
        assert!(orbit.eccentric_from_true(3.0).is_nan());
    }

    #[test]
    fn test_parabolic_round_trips() {
        let orbit = OrbitalElements::new(1.0)
            .unwrap()
            .with_periapsis_distance(1.0, 1.0);
        for ta in [0.0, 0.5, 1.5, 2.5, 3.0, DPI - 2.0, DPI - 0.3] {
            let m = orbit.mean_from_true(ta);
            let back = orbit.true_from_mean(m, KEPLER_TOLERANCE).unwrap();
            assert_abs_diff_eq!(back, ta, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_barker_inverse() {
        for d in [-20.0, -1.0, 0.0, 0.3, 2.0, 50.0] {
            let m = d + d * d * d / 3.;
            assert_relative_eq!(barker_inverse(m), d, epsilon = 1e-12, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_mean_motion() {
        let orbit = OrbitalElements::new(4.0).unwrap().with_conic(-2.0, 1.5);
        assert_relative_eq!(orbit.mean_motion(), (4.0f64 / 8.0).sqrt());

        let parabola = OrbitalElements::new(4.0)
            .unwrap()
            .with_periapsis_distance(0.5, 1.0);
        assert_relative_eq!(parabola.mean_motion(), 4.0);
    }
}
