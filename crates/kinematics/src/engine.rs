//! `TwoBody`: a reaction bound to its precomputed invariants.

use std::sync::OnceLock;

use tracing::debug;

use crate::error::KinematicsError;
use crate::grid;
use crate::invariants::Invariants;
use crate::invert::{self, SolutionSet};
use crate::quantity::{Particle, Quantity, QuantityMap};
use crate::reaction::ReactionSpec;
use crate::transform::{self, CriticalAngle, KinematicState};

/// Grid resolution used when none is requested (the `2·500 + 1` sampling of
/// the classic kinematics tables).
pub const DEFAULT_SAMPLES: usize = 1001;
/// Root residual and deduplication tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// Bracket width at which root refinement stops narrowing `coscm`.
pub const COSCM_RESOLUTION: f64 = 1e-12;
pub const MAX_REFINE_ITERATIONS: usize = 200;

/// Numerical knobs for the inverter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Size of the bracketing grid.
    pub grid_samples: usize,
    pub tolerance: f64,
    pub coscm_resolution: f64,
    pub max_iterations: usize,
    /// Split the sampled curve at refined interior extrema before bracketing.
    ///
    /// With this on (the default), a lab angle between the largest value seen
    /// on the grid and the true grazing angle still yields both fold branches,
    /// so the "no solution" range starts at the grazing angle itself. Turn it
    /// off to get the plain grid scan, whose range ends at the grid maximum.
    pub refine_extrema: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            grid_samples: DEFAULT_SAMPLES,
            tolerance: DEFAULT_TOLERANCE,
            coscm_resolution: COSCM_RESOLUTION,
            max_iterations: MAX_REFINE_ITERATIONS,
            refine_extrema: true,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<(), KinematicsError> {
        if self.grid_samples < 2 {
            return Err(KinematicsError::InvalidSampleCount(self.grid_samples));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(KinematicsError::InvalidOptions(format!(
                "tolerance must be positive (got {})",
                self.tolerance
            )));
        }
        if !(self.coscm_resolution.is_finite() && self.coscm_resolution > 0.0) {
            return Err(KinematicsError::InvalidOptions(format!(
                "coscm resolution must be positive (got {})",
                self.coscm_resolution
            )));
        }
        if self.max_iterations == 0 {
            return Err(KinematicsError::InvalidOptions(
                "iteration budget must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Relativistic two-body kinematics engine for one reaction.
///
/// Everything is derived from the immutable [`ReactionSpec`] at construction;
/// queries are pure and the engine can be shared across threads.
#[derive(Debug)]
pub struct TwoBody {
    spec: ReactionSpec,
    invariants: Invariants,
    options: SolverOptions,
    bracket_grid: OnceLock<Vec<KinematicState>>,
}

impl TwoBody {
    pub fn new(spec: ReactionSpec) -> Self {
        let invariants = Invariants::solve(&spec);
        debug!(
            sqrt_s = invariants.e_cm_total,
            beta_cm = invariants.beta_cm,
            p_cm = invariants.p_cm,
            q_value = spec.q_value(),
            "reaction invariants"
        );
        Self {
            spec,
            invariants,
            options: SolverOptions::default(),
            bracket_grid: OnceLock::new(),
        }
    }

    pub fn with_options(spec: ReactionSpec, options: SolverOptions) -> Result<Self, KinematicsError> {
        options.validate()?;
        let mut engine = Self::new(spec);
        engine.options = options;
        Ok(engine)
    }

    /// Validate masses (MeV/c²) and projectile kinetic energy (MeV) and build the engine.
    pub fn from_masses(m1: f64, m2: f64, m3: f64, m4: f64, t1: f64) -> Result<Self, KinematicsError> {
        ReactionSpec::new(m1, m2, m3, m4, t1).map(Self::new)
    }

    pub fn spec(&self) -> &ReactionSpec {
        &self.spec
    }

    pub fn invariants(&self) -> &Invariants {
        &self.invariants
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn mass(&self, particle: Particle) -> f64 {
        match particle {
            Particle::Ejectile => self.spec.ejectile_mass(),
            Particle::Recoil => self.spec.recoil_mass(),
        }
    }

    /// Full lab state for an ejectile CM emission cosine.
    pub fn state_at(&self, coscm: f64) -> Result<KinematicState, KinematicsError> {
        if !(coscm.is_finite() && (-1.0..=1.0).contains(&coscm)) {
            return Err(KinematicsError::CoscmOutOfRange(coscm));
        }
        Ok(transform::transform(&self.invariants, coscm))
    }

    /// Frame transform sampled on `n_samples` uniform `coscm` points.
    pub fn sample_grid(&self, n_samples: usize) -> Result<Vec<KinematicState>, KinematicsError> {
        grid::sample(&self.invariants, n_samples)
    }

    /// Every quantity as an index-aligned sequence of length `n_samples`, ascending in `coscm`.
    pub fn compute_arrays(&self, n_samples: usize) -> Result<QuantityMap, KinematicsError> {
        let states = self.sample_grid(n_samples)?;
        Ok(grid::tabulate(&states, &Quantity::ALL))
    }

    fn bracket_grid(&self) -> &[KinematicState] {
        self.bracket_grid.get_or_init(|| {
            grid::coscm_grid(self.options.grid_samples)
                .unwrap_or_default()
                .into_iter()
                .map(|c| transform::transform(&self.invariants, c))
                .collect()
        })
    }

    /// All physical solutions of `x(coscm) = value`, deduplicated on the full state.
    pub fn solve(&self, x: Quantity, value: f64) -> Result<SolutionSet, KinematicsError> {
        self.solve_for(x, value, &Quantity::ALL)
    }

    /// As [`solve`](Self::solve), deduplicating on the `outputs` vector only.
    pub fn solve_for(
        &self,
        x: Quantity,
        value: f64,
        outputs: &[Quantity],
    ) -> Result<SolutionSet, KinematicsError> {
        let roots = invert::find_roots(&self.invariants, self.bracket_grid(), x, value, &self.options);
        let solutions = invert::dedup_solutions(roots, outputs, self.options.tolerance);
        if solutions.len() > 2 {
            return Err(KinematicsError::TooManyRoots(solutions.len()));
        }
        Ok(SolutionSet {
            quantity: x,
            target: value,
            solutions,
        })
    }

    /// Name-based inverse lookup.
    ///
    /// Returns, for each requested output (all quantities when `y_names` is
    /// `None`), the values at every CM angle where `x_name` equals `x_value`.
    /// Sequences have length 0, 1 or 2 and are aligned across outputs.
    pub fn at_value(
        &self,
        x_name: &str,
        x_value: f64,
        y_names: Option<&[&str]>,
    ) -> Result<QuantityMap, KinematicsError> {
        let x: Quantity = x_name.parse()?;
        let outputs = match y_names {
            Some(names) => Quantity::parse_all(names)?,
            None => Quantity::ALL.to_vec(),
        };
        let set = self.solve_for(x, x_value, &outputs)?;
        Ok(set.to_map(&outputs))
    }

    /// Grazing angle of an exit particle, if its lab angle folds.
    pub fn critical_angle(&self, particle: Particle) -> Option<CriticalAngle> {
        transform::critical_angle(&self.invariants, &self.spec, particle)
    }

    /// Lab kinetic energy `e - m` of one particle in a state.
    pub fn kinetic_energy(&self, state: &KinematicState, particle: Particle) -> f64 {
        let (_, energy, _, _) = state.particle(particle);
        energy - self.mass(particle)
    }

    /// `(min, max)` lab kinetic energy of a particle over all emission angles.
    pub fn energy_range(&self, particle: Particle) -> (f64, f64) {
        let backward = transform::transform(&self.invariants, -1.0);
        let forward = transform::transform(&self.invariants, 1.0);
        let a = self.kinetic_energy(&backward, particle);
        let b = self.kinetic_energy(&forward, particle);
        (a.min(b), a.max(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_validated() {
        let spec = ReactionSpec::new(1.0, 1.0, 1.0, 1.0, 1.0).unwrap();
        let bad = SolverOptions {
            tolerance: 0.0,
            ..SolverOptions::default()
        };
        assert!(matches!(
            TwoBody::with_options(spec, bad),
            Err(KinematicsError::InvalidOptions(_))
        ));
        let tiny_grid = SolverOptions {
            grid_samples: 1,
            ..SolverOptions::default()
        };
        assert_eq!(
            TwoBody::with_options(spec, tiny_grid).unwrap_err(),
            KinematicsError::InvalidSampleCount(1)
        );
    }

    #[test]
    fn state_at_rejects_out_of_range_cosines() {
        let engine = TwoBody::from_masses(1.0, 2.0, 1.0, 2.0, 0.5).unwrap();
        assert!(engine.state_at(1.0).is_ok());
        assert_eq!(
            engine.state_at(1.5).unwrap_err(),
            KinematicsError::CoscmOutOfRange(1.5)
        );
        assert!(engine.state_at(f64::NAN).is_err());
    }

    #[test]
    fn energy_range_brackets_every_sample() {
        let engine = TwoBody::from_masses(938.272, 3727.379, 938.272, 3727.379, 12.0).unwrap();
        for particle in [Particle::Ejectile, Particle::Recoil] {
            let (lo, hi) = engine.energy_range(particle);
            for state in engine.sample_grid(101).unwrap() {
                let t = engine.kinetic_energy(&state, particle);
                assert!(t >= lo - 1e-9 && t <= hi + 1e-9);
            }
        }
        let (lo, hi) = engine.energy_range(Particle::Ejectile);
        assert!((hi - 12.0).abs() < 1e-6);
        assert!(lo > 0.0 && lo < hi);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<TwoBody>();
    }
}
