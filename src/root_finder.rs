//! # Scalar root finders
//!
//! Generic one-dimensional solvers used by the Kepler equation solvers:
//!
//! - [`newton_raphson`] – Newton-Raphson iteration with an analytic derivative, or a
//!   5-point central-difference derivative when none is supplied
//!   ([`newton_raphson_numeric`]).
//! - [`bisect`] – Bisection on a sign-changing bracket. It never fails: when the
//!   iteration budget is exhausted it returns the last midpoint, which callers use as a
//!   fallback value.
//!
//! Both solvers are pure functions of their inputs; all temporaries live on the stack.

use log::warn;

use crate::orrery_errors::OrreryError;

/// Tuning of [`newton_raphson`].
///
/// Fields
/// -----------------
/// * `tolerance` – relative step tolerance: stop when `|x₁ − x₀| ≤ tolerance·|x₁|`.
/// * `epsilon` – flat-derivative guard: fail when `|f'(x)| ≤ epsilon·|f(x)|`.
/// * `max_iterations` – iteration budget.
/// * `h` – step of the finite-difference stencil (unused with an analytic derivative).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRaphsonParams {
    pub tolerance: f64,
    pub epsilon: f64,
    pub max_iterations: usize,
    pub h: f64,
}

impl Default for NewtonRaphsonParams {
    fn default() -> Self {
        NewtonRaphsonParams {
            tolerance: 1e-7,
            epsilon: f64::EPSILON,
            max_iterations: 20,
            h: 1e-4,
        }
    }
}

/// Tuning of [`bisect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectParams {
    /// Early exit when `|f|` at an endpoint or midpoint is below this value.
    pub tolerance: f64,
    /// Number of halvings before the midpoint is returned as is.
    pub max_iterations: usize,
}

impl Default for BisectParams {
    fn default() -> Self {
        BisectParams {
            tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

/// 5-point central-difference estimate of `f'(x)`.
#[inline]
fn five_point_derivative<F: Fn(f64) -> f64>(f: &F, x: f64, h: f64) -> f64 {
    let yph = f(x + h);
    let ymh = f(x - h);
    let yp2h = f(x + 2. * h);
    let ym2h = f(x - 2. * h);

    (ym2h - yp2h + 8. * (yph - ymh)) / (12. * h)
}

/// Find a root of `f` with the Newton-Raphson method.
///
/// Arguments
/// -----------------
/// * `f` – function whose root is searched.
/// * `f_prime` – analytic derivative; `None` switches to a 5-point stencil of step `params.h`.
/// * `x0` – initial guess.
/// * `params` – tolerances and iteration budget, see [`NewtonRaphsonParams`].
///
/// Return
/// ----------
/// * `Ok(root)` once the relative step criterion is met.
/// * `Err(OrreryError::NearZeroDerivative)` if the slope is too flat to divide by.
/// * `Err(OrreryError::MaxIterationsReached)` if the budget is exhausted.
///
/// See also
/// ------------
/// * [`newton_raphson_numeric`] – Shorthand without derivative.
/// * [`bisect`] – Bracketing fallback.
pub fn newton_raphson<F, D>(
    f: F,
    f_prime: Option<D>,
    x0: f64,
    params: &NewtonRaphsonParams,
) -> Result<f64, OrreryError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = x0;

    for _ in 0..params.max_iterations {
        let y = f(x);
        let yp = match &f_prime {
            Some(fp) => fp(x),
            None => five_point_derivative(&f, x, params.h),
        };

        // Badly conditioned update: first derivative tiny relative to the function
        if yp.abs() <= params.epsilon * y.abs() {
            return Err(OrreryError::NearZeroDerivative(x));
        }

        let x1 = x - y / yp;

        if (x1 - x).abs() <= params.tolerance * x1.abs() {
            return Ok(x1);
        }

        x = x1;
    }

    Err(OrreryError::MaxIterationsReached(params.max_iterations))
}

/// [`newton_raphson`] with a numerical derivative.
pub fn newton_raphson_numeric<F>(
    f: F,
    x0: f64,
    params: &NewtonRaphsonParams,
) -> Result<f64, OrreryError>
where
    F: Fn(f64) -> f64,
{
    newton_raphson(f, None::<fn(f64) -> f64>, x0, params)
}

/// Approximate a root of `f` inside `[lo, hi]` by bisection.
///
/// The caller guarantees that `f(lo)` and `f(hi)` have opposite signs; no bracket search
/// is attempted here. The interval keeps the half where `f(mid) > 0` as the upper end.
///
/// Arguments
/// -----------------
/// * `f` – function whose root is searched.
/// * `lo`, `hi` – bracket ends.
/// * `params` – early-exit tolerance on `|f|` and iteration budget.
///
/// Return
/// ----------
/// * The first endpoint or midpoint where `|f| < tolerance`, or the last midpoint when
///   the budget runs out (a warning is logged in that case).
pub fn bisect<F>(f: F, mut lo: f64, mut hi: f64, params: &BisectParams) -> f64
where
    F: Fn(f64) -> f64,
{
    if f(lo).abs() < params.tolerance {
        return lo;
    }
    if f(hi).abs() < params.tolerance {
        return hi;
    }

    let mut count = 0;
    loop {
        let mid = (lo + hi) * 0.5;
        let mv = f(mid);
        if mv.abs() < params.tolerance {
            return mid;
        }
        if count >= params.max_iterations {
            warn!(
                "bisect failed to converge in {} iterations (lo = {lo}, hi = {hi}, mid = {mid}, f(mid) = {mv})",
                count
            );
            return mid;
        }
        count += 1;

        if mv > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
}
