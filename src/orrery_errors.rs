use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrreryError {
    #[error("Newton-Raphson failed to converge: nearly zero first derivative at x = {0}")]
    NearZeroDerivative(f64),

    #[error("Newton-Raphson failed to converge: maximum iterations reached ({0})")]
    MaxIterationsReached(usize),

    #[error("Unable to bracket the hyperbolic eccentric anomaly for mean anomaly {0}")]
    HyperbolicBracketNotFound(f64),

    #[error("Invalid gravitational parameter: {0} (must be finite and > 0)")]
    InvalidGravitationalParameter(f64),

    #[error("Invalid propagator parameter: {0}")]
    InvalidPropagatorParameter(String),

    #[error("True anomaly {0} lies outside the reachable part of the conic")]
    InvalidTrueAnomaly(f64),

    #[error("Propagation produced a non-finite state vector")]
    NonFiniteState,

    #[error("Attempt to simulate disposed vehicle: {0}")]
    DisposedVehicle(String),

    #[error("Vehicle has no primary: {0}")]
    NoPrimary(String),

    #[error("Unknown primary id: {0}")]
    UnknownPrimary(usize),
}

impl OrreryError {
    /// True for the root-finding failures (iteration budget exceeded, flat derivative,
    /// missing bracket). These are scoped to a single computation.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            OrreryError::NearZeroDerivative(_)
                | OrreryError::MaxIterationsReached(_)
                | OrreryError::HyperbolicBracketNotFound(_)
        )
    }
}
