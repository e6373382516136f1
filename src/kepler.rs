//! # Kepler equation solvers
//!
//! Inversion of Kepler's equation for closed and open orbits:
//!
//! - **Elliptic** (`0 ≤ e < 1`): `M = E − e·sin(E)`, solved by Newton-Raphson from a
//!   third-order series seed (Murison), with a bisection fallback on `[0, 2π]` when the
//!   refinement fails. The result is always defined and lies in `[0, 2π)`.
//! - **Hyperbolic** (`e > 1`): `M = e·sinh(F) − F`, solved by bisection. The function is
//!   odd in `F`, so negative mean anomalies are solved through their mirror image. The
//!   upper end of the initial bracket `[0, 2π]` is doubled until it encloses the root.
//!
//! Angles are in radians. The helpers [`principal_angle`] and [`angle_diff`] wrap angles
//! into `[0, 2π)` and `[-π, π]`.
//!
//! ## See also
//! * [`crate::root_finder`] – The generic solvers used here.
//! * [`crate::orbital_elements::OrbitalElements::eccentric_from_mean`] – Dispatch by orbit shape.

use log::debug;
use std::f64::consts::PI;

use crate::constants::{
    Radian, DPI, KEPLER_BISECT_MAX_ITER, KEPLER_NEWTON_MAX_ITER, MAX_BRACKET_EXPANSIONS,
};
use crate::orrery_errors::OrreryError;
use crate::root_finder::{bisect, newton_raphson, BisectParams, NewtonRaphsonParams};

/// Principal value of an angle in radians, in `[0, 2π)`.
#[inline]
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Signed difference `a − b` wrapped into `[-π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let a = principal_angle(a);
    let b = principal_angle(b);

    let mut diff = a - b;

    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// Third-order starter for the elliptic Kepler equation (Murison, 2006).
#[inline]
fn murison_seed(e: f64, mean_anomaly: Radian) -> Radian {
    let (sin_m, cos_m) = mean_anomaly.sin_cos();
    let e2 = e * e;
    let e3 = e2 * e;

    mean_anomaly + (-0.5 * e3 + e + (e2 + 1.5 * cos_m * e3) * cos_m) * sin_m
}

/// Solve the elliptic Kepler equation `M = E − e·sin(E)` for `E`.
///
/// Arguments
/// -----------------
/// * `e` – eccentricity, `0 ≤ e < 1`.
/// * `mean_anomaly` – mean anomaly `M` in radians, any real value.
/// * `tolerance` – relative step tolerance of the Newton-Raphson refinement.
///
/// Return
/// ----------
/// * The eccentric anomaly `E` in `[0, 2π)`.
///
/// Remarks
/// -------------
/// * A failed refinement (flat derivative, exhausted budget or non-finite iterate) falls
///   back to a bisection of `E − e·sin(E) − M` over `[0, 2π]` with `M` wrapped first.
///   The fallback is logged at debug level.
pub fn eccentric_from_mean_elliptic(e: f64, mean_anomaly: Radian, tolerance: f64) -> Radian {
    let seed = murison_seed(e, mean_anomaly);

    let params = NewtonRaphsonParams {
        tolerance,
        max_iterations: KEPLER_NEWTON_MAX_ITER,
        ..Default::default()
    };

    let refined = newton_raphson(
        |ea: f64| ea - e * ea.sin() - mean_anomaly,
        Some(|ea: f64| 1. - e * ea.cos()),
        seed,
        &params,
    );

    match refined {
        Ok(ea) if ea.is_finite() => principal_angle(ea),
        other => {
            debug!(
                "Newton-Raphson refinement of the elliptic Kepler equation failed ({other:?}) for e = {e}, M = {mean_anomaly}; bisecting instead"
            );
            let m = principal_angle(mean_anomaly);
            let ea = bisect(
                |ea: f64| ea - e * ea.sin() - m,
                0.,
                DPI,
                &BisectParams {
                    tolerance: tolerance.max(1e-12),
                    max_iterations: KEPLER_BISECT_MAX_ITER,
                },
            );
            principal_angle(ea)
        }
    }
}

/// Solve the hyperbolic Kepler equation `M = e·sinh(F) − F` for `F`.
///
/// Arguments
/// -----------------
/// * `e` – eccentricity, `e > 1`.
/// * `mean_anomaly` – hyperbolic mean anomaly `M`, any real value.
/// * `tolerance` – early-exit tolerance of the bisection, scaled by `max(1, |M|)`.
///
/// Return
/// ----------
/// * `Ok(F)` with the sign of `M`.
/// * `Err(OrreryError::HyperbolicBracketNotFound)` if no sign change is found after
///   doubling the bracket [`MAX_BRACKET_EXPANSIONS`] times (also the case for a
///   non-finite `M`).
pub fn eccentric_from_mean_hyperbolic(
    e: f64,
    mean_anomaly: f64,
    tolerance: f64,
) -> Result<f64, OrreryError> {
    if mean_anomaly < 0.0 {
        return eccentric_from_mean_hyperbolic(e, -mean_anomaly, tolerance).map(|f| -f);
    }

    let kepler = |f: f64| e * f.sinh() - f - mean_anomaly;

    let mut hi = DPI;
    let mut expansions = 0;
    // NaN never satisfies the bracket condition
    loop {
        if kepler(hi) >= 0.0 {
            break;
        }
        if expansions == MAX_BRACKET_EXPANSIONS {
            return Err(OrreryError::HyperbolicBracketNotFound(mean_anomaly));
        }
        hi *= 2.;
        expansions += 1;
    }

    let params = BisectParams {
        tolerance: tolerance.max(1e-12) * mean_anomaly.max(1.),
        max_iterations: KEPLER_BISECT_MAX_ITER,
    };

    Ok(bisect(kepler, 0., hi, &params))
}
