use thiserror::Error;

/// Errors surfaced by reaction construction and queries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KinematicsError {
    #[error("{particle} rest mass must be positive and finite (got {value})")]
    InvalidMass { particle: &'static str, value: f64 },
    #[error("projectile kinetic energy must be non-negative and finite (got {0})")]
    NegativeKineticEnergy(f64),
    #[error("excitation energy must be non-negative and finite (got {0})")]
    NegativeExcitation(f64),
    #[error(
        "reaction is below threshold: invariant mass {invariant_mass} MeV < exit mass sum {exit_mass_sum} MeV (threshold T1 = {threshold_kinetic_energy} MeV)"
    )]
    BelowThreshold {
        invariant_mass: f64,
        exit_mass_sum: f64,
        threshold_kinetic_energy: f64,
    },
    #[error("unknown quantity '{0}' (expected one of coscm, theta_cm, theta3, theta4, e3, e4, v3, v4, p3, p4)")]
    UnknownQuantity(String),
    #[error("sample count must be at least 2 (got {0})")]
    InvalidSampleCount(usize),
    #[error("cos(theta_cm) must lie in [-1, 1] (got {0})")]
    CoscmOutOfRange(f64),
    #[error("invalid solver options: {0}")]
    InvalidOptions(String),
    #[error("inverse lookup produced {0} distinct roots; at most two are physical")]
    TooManyRoots(usize),
}
