//! Relativistic kinematics of two-body reactions `1 + 2 -> 3 + 4` with the target at rest.
//!
//! The engine maps rest masses and projectile kinetic energy to the CM-frame
//! invariants once, then exposes the CM-to-lab transform as a pure function of
//! `cos(theta_cm)`: sampled on a uniform grid ([`TwoBody::compute_arrays`]) or
//! inverted for any lab observable ([`TwoBody::at_value`]), including the
//! two-valued fold below a particle's grazing angle.
//!
//! Masses are MeV/c², energies MeV, momenta MeV/c, angles radians and
//! velocities fractions of c. `e3`/`e4` are total lab energies.

pub mod engine;
pub mod error;
pub mod grid;
pub mod invariants;
pub mod invert;
pub mod quantity;
pub mod reaction;
pub mod solver;
pub mod transform;

pub use engine::{
    COSCM_RESOLUTION, DEFAULT_SAMPLES, DEFAULT_TOLERANCE, MAX_REFINE_ITERATIONS, SolverOptions,
    TwoBody,
};
pub use error::KinematicsError;
pub use invariants::Invariants;
pub use invert::{Solution, SolutionSet, dedup_solutions};
pub use quantity::{Particle, Quantity, QuantityMap};
pub use reaction::ReactionSpec;
pub use transform::{CriticalAngle, KinematicState};
