#![allow(dead_code)]
use approx::assert_relative_eq;
use nalgebra::Vector3;
use orrery::orbital_elements::OrbitalElements;
use rand::rngs::StdRng;
use rand::Rng;

pub fn assert_elements_close(actual: &OrbitalElements, expected: &OrbitalElements, epsilon: f64) {
    assert_eq!(actual.shape, expected.shape);
    assert_relative_eq!(
        actual.semi_major_axis,
        expected.semi_major_axis,
        max_relative = epsilon
    );
    assert_relative_eq!(
        actual.eccentricity,
        expected.eccentricity,
        epsilon = epsilon
    );
    assert_relative_eq!(actual.inclination, expected.inclination, epsilon = epsilon);
    assert_relative_eq!(
        actual.ascending_node_longitude,
        expected.ascending_node_longitude,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.periapsis_argument,
        expected.periapsis_argument,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.true_anomaly,
        expected.true_anomaly,
        epsilon = epsilon
    );
}

/// `|a − b| / |b|`
pub fn relative_distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (a - b).norm() / b.norm()
}

/// Vis-viva energy per unit mass.
pub fn specific_energy(position: &Vector3<f64>, velocity: &Vector3<f64>, mu: f64) -> f64 {
    velocity.norm_squared() / 2. - mu / position.norm()
}

/// Uniformly distributed unit vector.
pub fn random_direction(rng: &mut StdRng) -> Vector3<f64> {
    let z: f64 = rng.random_range(-1.0..1.0);
    let phi: f64 = rng.random_range(0.0..std::f64::consts::TAU);
    let s = (1. - z * z).sqrt();
    Vector3::new(s * phi.cos(), s * phi.sin(), z)
}
