//! # Perifocal and inertial frames
//!
//! The perifocal frame has its x axis towards periapsis, its z axis along the angular
//! momentum and its y axis completing the right-handed triad. For circular orbits the
//! x axis points to the ascending node, or along the inertial x axis when the orbit is
//! also equatorial.
//!
//! The orientation is rebuilt from the stored `h`, `n`, `e` vectors each time it is
//! requested; nothing is cached.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use serde::Serialize;

use crate::constants::{Meter, Radian, DPI};

use super::{OrbitShape, OrbitalElements};

/// Angular margin kept between sampled points and the asymptotes of an open trajectory.
const ASYMPTOTE_MARGIN: Radian = 1e-3;

/// Position and velocity pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateVectors {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let candidate = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&candidate).normalize()
}

impl OrbitalElements {
    /// Orthonormal basis `(ê, ĥ × ê, ĥ)` of the perifocal frame, as matrix columns.
    ///
    /// Multiplying a perifocal vector by this matrix expresses it in the inertial frame.
    pub fn perifocal_basis(&self) -> Matrix3<f64> {
        let h_hat = self
            .angular_momentum
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::z);

        let reference = match self.shape {
            OrbitShape::Circular if self.is_equatorial() => Vector3::x(),
            OrbitShape::Circular => self.node_vector.try_normalize(0.0).unwrap_or_else(Vector3::x),
            _ => self
                .eccentricity_vector
                .try_normalize(0.0)
                .unwrap_or_else(Vector3::x),
        };

        let a_hat = h_hat
            .cross(&reference)
            .try_normalize(0.0)
            .unwrap_or_else(|| any_perpendicular(&h_hat));
        let e_hat = a_hat.cross(&h_hat);

        Matrix3::from_columns(&[e_hat, a_hat, h_hat])
    }

    /// Rotation from perifocal to inertial coordinates.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
            self.perifocal_basis(),
        ))
    }

    /// Distance to the focus at true anomaly `ta` (the current one when `None`).
    pub fn radial_distance(&self, ta: Option<Radian>) -> Meter {
        let ta = ta.unwrap_or(self.true_anomaly);
        let e = self.eccentricity;
        match self.shape {
            OrbitShape::Hyperbolic => {
                self.semi_major_axis * (1. - e * self.eccentric_from_true(ta).cosh())
            }
            OrbitShape::Parabolic => self.semi_latus_rectum / (1. + ta.cos()),
            OrbitShape::Circular | OrbitShape::Elliptical => {
                self.semi_major_axis * (1. - e * self.eccentric_from_true(ta).cos())
            }
        }
    }

    /// Position and velocity in the perifocal frame at true anomaly `ta` (the current
    /// one when `None`).
    ///
    /// Return
    /// ----------
    /// * `None` when `ta` is outside the asymptotic cone of an open trajectory
    ///   (`p/(1 + e·cos ta) ≤ 0`). This is a normal outcome when sampling, not an error.
    pub fn to_perifocal(&self, ta: Option<Radian>) -> Option<StateVectors> {
        let f = ta.unwrap_or(self.true_anomaly);
        let e = self.eccentricity;
        let mu = self.mu;

        let r = self.semi_latus_rectum / (1. + e * f.cos());
        if !(r > 0.0) || !r.is_finite() {
            return None;
        }

        let (sin_f, cos_f) = f.sin_cos();
        let position = Vector3::new(r * cos_f, r * sin_f, 0.0);

        let velocity = match self.shape {
            OrbitShape::Hyperbolic => {
                let ea = self.eccentric_from_true(f);
                let rho = (-mu * self.semi_major_axis).sqrt() / r;
                Vector3::new(-rho * ea.sinh(), rho * (e * e - 1.).sqrt() * ea.cosh(), 0.0)
            }
            OrbitShape::Parabolic => {
                let scale = (mu / self.semi_latus_rectum).sqrt();
                Vector3::new(-scale * sin_f, scale * (e + cos_f), 0.0)
            }
            OrbitShape::Circular | OrbitShape::Elliptical => {
                let ea = self.eccentric_from_true(f);
                let rho = (mu * self.semi_major_axis).sqrt() / r;
                Vector3::new(-rho * ea.sin(), rho * (1. - e * e).sqrt() * ea.cos(), 0.0)
            }
        };

        Some(StateVectors { position, velocity })
    }

    /// Position and velocity relative to the primary, in the inertial frame.
    ///
    /// Same `None` semantics as [`OrbitalElements::to_perifocal`].
    pub fn to_inertial(&self, ta: Option<Radian>) -> Option<StateVectors> {
        let perifocal = self.to_perifocal(ta)?;
        let rotation = self.rotation();
        Some(StateVectors {
            position: rotation * perifocal.position,
            velocity: rotation * perifocal.velocity,
        })
    }

    /// True anomaly in `[0, π]` where the trajectory leaves the sphere of radius `radius`,
    /// from `cos ν = (p/radius − 1)/e`. It enters the sphere at `−ν`.
    ///
    /// `None` when the conic never crosses that sphere: periapsis outside it, apoapsis
    /// inside it, or a circle.
    pub fn true_anomaly_at_radius(&self, radius: Meter) -> Option<Radian> {
        let e = self.eccentricity;
        if !(e > 0.0) || !(radius > 0.0) {
            return None;
        }
        let cos_ta = (self.semi_latus_rectum / radius - 1.) / e;
        (-1.0..=1.0).contains(&cos_ta).then(|| cos_ta.acos())
    }

    /// Limiting true anomaly `acos(−1/e)` of an open trajectory; `None` for closed orbits.
    pub fn true_anomaly_asymptote(&self) -> Option<Radian> {
        match self.shape {
            OrbitShape::Hyperbolic | OrbitShape::Parabolic => {
                Some((-1. / self.eccentricity).clamp(-1., 1.).acos())
            }
            OrbitShape::Circular | OrbitShape::Elliptical => None,
        }
    }

    /// Sample the trajectory as inertial points relative to the primary.
    ///
    /// Closed orbits are sampled uniformly in eccentric anomaly over `[0, 2π]`, which
    /// gives `steps + 1` points with the last one closing the loop. Open trajectories
    /// are sampled uniformly in true anomaly strictly inside the asymptotes; samples
    /// that cannot be placed are skipped.
    pub fn sample_trajectory(&self, steps: usize) -> Vec<Vector3<f64>> {
        if steps == 0 {
            return Vec::new();
        }

        let anomalies: Vec<Radian> = match self.true_anomaly_asymptote() {
            None => (0..=steps)
                .map(|k| self.true_from_eccentric(DPI * k as f64 / steps as f64))
                .collect(),
            Some(limit) => {
                let limit = limit - ASYMPTOTE_MARGIN;
                (0..=steps)
                    .map(|k| -limit + 2. * limit * k as f64 / steps as f64)
                    .collect()
            }
        };

        anomalies
            .into_iter()
            .filter_map(|ta| self.to_inertial(Some(ta)))
            .map(|state| state.position)
            .collect()
    }
}
