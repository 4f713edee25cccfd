//! One-dimensional numerics used by the inverter: bracketed root refinement
//! and extremum location on a bounded interval.

/// Outcome of a bracketed root refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootEstimate {
    pub x: f64,
    /// `|f(x)|` at the returned point.
    pub residual: f64,
    pub iterations: usize,
    /// True when `residual < tolerance`.
    pub converged: bool,
}

/// Stopping rules for [`refine_root`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineLimits {
    /// Residual target in the units of `f`.
    pub tolerance: f64,
    /// Bracket width below which the abscissa is considered resolved.
    pub x_resolution: f64,
    pub max_iterations: usize,
}

/// Refine a sign-changing bracket `[a, b]` to a root of `f`.
///
/// Alternates false-position steps with bisection so the bracket at least
/// halves every two iterations. Iteration stops once the residual is below
/// `tolerance` and the bracket is narrower than `x_resolution`, when `f`
/// vanishes exactly, or when the budget runs out; the best endpoint found is
/// returned either way.
pub fn refine_root<F>(f: F, mut a: f64, mut b: f64, limits: RefineLimits) -> RootEstimate
where
    F: Fn(f64) -> f64,
{
    let mut fa = f(a);
    let mut fb = f(b);
    let mut iterations = 0;

    while iterations < limits.max_iterations {
        let best = fa.abs().min(fb.abs());
        if best == 0.0 || (best < limits.tolerance && (b - a).abs() <= limits.x_resolution) {
            break;
        }
        iterations += 1;

        let mut x = if iterations % 2 == 1 && fb != fa {
            b - fb * (b - a) / (fb - fa)
        } else {
            0.5 * (a + b)
        };
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        if !x.is_finite() || x <= lo || x >= hi {
            x = 0.5 * (a + b);
        }
        if x <= lo || x >= hi {
            // bracket cannot be split further in floating point
            break;
        }

        let fx = f(x);
        if fx == 0.0 {
            return RootEstimate {
                x,
                residual: 0.0,
                iterations,
                converged: true,
            };
        }
        if (fx < 0.0) == (fa < 0.0) {
            a = x;
            fa = fx;
        } else {
            b = x;
            fb = fx;
        }
    }

    let (x, residual) = if fa.abs() <= fb.abs() {
        (a, fa.abs())
    } else {
        (b, fb.abs())
    };
    RootEstimate {
        x,
        residual,
        iterations,
        converged: residual < limits.tolerance,
    }
}

const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Golden-section search for the maximum (or minimum) of a unimodal `f` on `[a, b]`.
///
/// Returns `(x, f(x))` at the best point visited.
pub fn locate_extremum<F>(
    f: F,
    mut a: f64,
    mut b: f64,
    maximize: bool,
    x_resolution: f64,
    max_iterations: usize,
) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    let sign = if maximize { 1.0 } else { -1.0 };
    let g = |x: f64| sign * f(x);

    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut gc = g(c);
    let mut gd = g(d);

    for _ in 0..max_iterations {
        if (b - a).abs() <= x_resolution {
            break;
        }
        if gc > gd {
            b = d;
            d = c;
            gd = gc;
            c = b - INV_PHI * (b - a);
            gc = g(c);
        } else {
            a = c;
            c = d;
            gc = gd;
            d = a + INV_PHI * (b - a);
            gd = g(d);
        }
    }

    let (x, gx) = if gc > gd { (c, gc) } else { (d, gd) };
    (x, sign * gx)
}
