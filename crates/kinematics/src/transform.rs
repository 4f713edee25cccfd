//! CM emission angle to full lab-frame state.

use std::f64::consts::FRAC_PI_2;

use crate::invariants::Invariants;
use crate::quantity::{Particle, Quantity};
use crate::reaction::ReactionSpec;

/// Lab momentum below this fraction of the lab energy counts as "at rest".
const REST_MOMENTUM_FRACTION: f64 = 1e-12;

/// Tolerance on `sin(theta_max)` when deciding the equal-velocity edge case
/// for channels whose masses do not already settle it.
const GRAZING_RATIO_EPS: f64 = 1e-9;

/// One lab-frame sample, fully determined by `coscm` for a given reaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub coscm: f64,
    pub theta_cm: f64,
    pub theta3: f64,
    pub theta4: f64,
    /// Total lab energies (MeV).
    pub e3: f64,
    pub e4: f64,
    /// Lab speeds as fractions of c.
    pub v3: f64,
    pub v4: f64,
    /// Lab momentum magnitudes (MeV/c).
    pub p3: f64,
    pub p4: f64,
}

impl KinematicState {
    pub fn get(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::Coscm => self.coscm,
            Quantity::ThetaCm => self.theta_cm,
            Quantity::Theta3 => self.theta3,
            Quantity::Theta4 => self.theta4,
            Quantity::E3 => self.e3,
            Quantity::E4 => self.e4,
            Quantity::V3 => self.v3,
            Quantity::V4 => self.v4,
            Quantity::P3 => self.p3,
            Quantity::P4 => self.p4,
        }
    }

    /// `(theta, e, p, v)` of one exit particle.
    pub fn particle(&self, particle: Particle) -> (f64, f64, f64, f64) {
        match particle {
            Particle::Ejectile => (self.theta3, self.e3, self.p3, self.v3),
            Particle::Recoil => (self.theta4, self.e4, self.p4, self.v4),
        }
    }
}

struct LabParticle {
    theta: f64,
    energy: f64,
    momentum: f64,
    velocity: f64,
}

/// Boost one exit particle emitted at `cos_own` in the CM frame into the lab.
fn boost(inv: &Invariants, e_cm: f64, cos_own: f64, sin_cm: f64) -> LabParticle {
    let energy = inv.gamma_cm * (e_cm + inv.beta_cm * inv.p_cm * cos_own);
    let p_long = inv.gamma_cm * (inv.p_cm * cos_own + inv.beta_cm * e_cm);
    let p_trans = inv.p_cm * sin_cm;
    let momentum = p_long.hypot(p_trans);

    // A particle left at rest only occurs when its CM speed equals beta_cm;
    // its lab angle then tends to the grazing limit pi/2.
    let theta = if momentum <= REST_MOMENTUM_FRACTION * energy {
        FRAC_PI_2
    } else {
        p_trans.atan2(p_long)
    };

    LabParticle {
        theta,
        energy,
        momentum,
        velocity: momentum / energy,
    }
}

/// Frame transform: the single formula path behind grids and inverse lookups.
///
/// `coscm` must already lie in `[-1, 1]`. The recoil is emitted back-to-back
/// with the ejectile in the CM frame, so it sees `-coscm`.
pub fn transform(inv: &Invariants, coscm: f64) -> KinematicState {
    let theta_cm = coscm.clamp(-1.0, 1.0).acos();
    let sin_cm = ((1.0 - coscm) * (1.0 + coscm)).max(0.0).sqrt();

    let ejectile = boost(inv, inv.e3_cm, coscm, sin_cm);
    let recoil = boost(inv, inv.e4_cm, -coscm, sin_cm);

    KinematicState {
        coscm,
        theta_cm,
        theta3: ejectile.theta,
        theta4: recoil.theta,
        e3: ejectile.energy,
        e4: recoil.energy,
        v3: ejectile.velocity,
        v4: recoil.velocity,
        p3: ejectile.momentum,
        p4: recoil.momentum,
    }
}

/// Largest lab angle reachable by a particle whose CM speed does not exceed the boost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalAngle {
    pub theta_max: f64,
    /// Ejectile-frame `cos(theta_cm)` at which `theta_max` is reached.
    pub coscm: f64,
    pub state: KinematicState,
}

/// Closed-form grazing angle: `sin(theta_max) = p_cm / (m * gamma_cm * beta_cm)`.
///
/// Returns `None` when the particle outruns the boost and the lab angle is
/// one-to-one in `coscm`. A target-mass particle in an elastic channel moves
/// exactly at the boost speed and always grazes at `pi/2`.
pub fn critical_angle(
    inv: &Invariants,
    spec: &ReactionSpec,
    particle: Particle,
) -> Option<CriticalAngle> {
    let beta_gamma = inv.beta_gamma();
    if beta_gamma <= 0.0 {
        return None;
    }
    let (mass, e_cm) = match particle {
        Particle::Ejectile => (spec.ejectile_mass(), inv.e3_cm),
        Particle::Recoil => (spec.recoil_mass(), inv.e4_cm),
    };
    let orientation = match particle {
        Particle::Ejectile => 1.0,
        Particle::Recoil => -1.0,
    };

    let ratio = inv.p_cm / (mass * beta_gamma);
    let (theta_max, cos_own) = if spec.moves_at_boost_speed(particle)
        || (ratio - 1.0).abs() <= GRAZING_RATIO_EPS
    {
        (FRAC_PI_2, -1.0)
    } else if ratio < 1.0 {
        (ratio.asin(), (-inv.p_cm / (inv.beta_cm * e_cm)).clamp(-1.0, 1.0))
    } else {
        return None;
    };

    let coscm = orientation * cos_own;
    Some(CriticalAngle {
        theta_max,
        coscm,
        state: transform(inv, coscm),
    })
}
