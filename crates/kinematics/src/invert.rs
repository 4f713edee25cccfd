//! Inverse lookup: every CM angle at which a lab observable takes a given value.
//!
//! The sampled curve is split at its interior extrema (refined by
//! golden-section search), scanned for sign changes of `x - target`, and each
//! bracket is refined independently. A lab angle below a particle's grazing
//! angle therefore yields both branches of the kinematic fold.

use tracing::{debug, warn};

use crate::engine::SolverOptions;
use crate::invariants::Invariants;
use crate::quantity::{Quantity, QuantityMap};
use crate::solver::{RefineLimits, locate_extremum, refine_root};
use crate::transform::{KinematicState, transform};

/// A refined root of an inverse query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub state: KinematicState,
    /// `|x(coscm) - target|` at the root.
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Zero, one or two solutions in ascending `coscm`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionSet {
    pub quantity: Quantity,
    pub target: f64,
    pub solutions: Vec<Solution>,
}

impl SolutionSet {
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &KinematicState> {
        self.solutions.iter().map(|s| &s.state)
    }

    /// One sequence per output, all of length `len()`; empty sequences when there is no solution.
    pub fn to_map(&self, outputs: &[Quantity]) -> QuantityMap {
        outputs
            .iter()
            .map(|&q| (q, self.states().map(|s| s.get(q)).collect()))
            .collect()
    }
}

/// `(coscm, value)` pairs in ascending `coscm`, with refined interior extrema inserted.
fn breakpoints(
    inv: &Invariants,
    grid: &[KinematicState],
    x: Quantity,
    options: &SolverOptions,
) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = grid.iter().map(|s| (s.coscm, s.get(x))).collect();
    if !options.refine_extrema {
        return points;
    }

    let mut extrema = Vec::new();
    for w in points.windows(3) {
        let rising = w[1].1 - w[0].1;
        let falling = w[2].1 - w[1].1;
        let maximize = if rising > 0.0 && falling < 0.0 {
            true
        } else if rising < 0.0 && falling > 0.0 {
            false
        } else {
            continue;
        };
        extrema.push(locate_extremum(
            |c| transform(inv, c).get(x),
            w[0].0,
            w[2].0,
            maximize,
            options.coscm_resolution,
            options.max_iterations,
        ));
    }
    if !extrema.is_empty() {
        debug!(quantity = %x, count = extrema.len(), "inserted interior extrema");
        points.extend(extrema);
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    points
}

/// Locate and refine every root of `x(coscm) = target`. Not deduplicated.
pub(crate) fn find_roots(
    inv: &Invariants,
    grid: &[KinematicState],
    x: Quantity,
    target: f64,
    options: &SolverOptions,
) -> Vec<Solution> {
    if !target.is_finite() {
        return Vec::new();
    }
    let points = breakpoints(inv, grid, x, options);
    let residual = |c: f64| transform(inv, c).get(x) - target;
    let limits = RefineLimits {
        tolerance: options.tolerance,
        x_resolution: options.coscm_resolution,
        max_iterations: options.max_iterations,
    };

    let mut roots: Vec<Solution> = points
        .iter()
        .filter(|(_, v)| *v - target == 0.0)
        .map(|&(c, _)| Solution {
            state: transform(inv, c),
            residual: 0.0,
            iterations: 0,
            converged: true,
        })
        .collect();

    for w in points.windows(2) {
        let (fa, fb) = (w[0].1 - target, w[1].1 - target);
        if fa * fb >= 0.0 {
            continue;
        }
        let estimate = refine_root(residual, w[0].0, w[1].0, limits);
        if !estimate.converged {
            warn!(
                quantity = %x,
                target,
                coscm = estimate.x,
                residual = estimate.residual,
                iterations = estimate.iterations,
                "root refinement stopped above tolerance; keeping best estimate"
            );
        }
        roots.push(Solution {
            state: transform(inv, estimate.x),
            residual: estimate.residual,
            iterations: estimate.iterations,
            converged: estimate.converged,
        });
    }

    debug!(quantity = %x, target, roots = roots.len(), "bracket scan complete");
    roots
}

fn is_duplicate(a: &Solution, b: &Solution, outputs: &[Quantity], tolerance: f64) -> bool {
    (a.state.coscm - b.state.coscm).abs() < tolerance
        || outputs
            .iter()
            .all(|&q| (a.state.get(q) - b.state.get(q)).abs() < tolerance)
}

/// Collapse roots whose `coscm` or whose requested outputs agree within `tolerance`,
/// keeping the member with the smaller residual. Result is in ascending `coscm`.
///
/// An empty `outputs` slice compares every quantity.
pub fn dedup_solutions(
    mut solutions: Vec<Solution>,
    outputs: &[Quantity],
    tolerance: f64,
) -> Vec<Solution> {
    let outputs = if outputs.is_empty() {
        &Quantity::ALL[..]
    } else {
        outputs
    };
    solutions.sort_by(|a, b| a.state.coscm.total_cmp(&b.state.coscm));

    let mut kept: Vec<Solution> = Vec::with_capacity(solutions.len());
    for candidate in solutions {
        match kept
            .iter_mut()
            .find(|k| is_duplicate(k, &candidate, outputs, tolerance))
        {
            Some(existing) => {
                if candidate.residual < existing.residual {
                    *existing = candidate;
                }
            }
            None => kept.push(candidate),
        }
    }
    kept.sort_by(|a, b| a.state.coscm.total_cmp(&b.state.coscm));
    kept
}
