//! Entry/exit channel description and its feasibility check.

use crate::error::KinematicsError;
use crate::quantity::Particle;

/// Relative tolerance for treating two rest masses as the same particle.
const SAME_MASS_EPS: f64 = 1e-12;

fn same_mass(a: f64, b: f64) -> bool {
    (a - b).abs() <= SAME_MASS_EPS * a.max(b)
}

/// Validated `projectile + target -> ejectile + recoil` reaction in MeV/c² and MeV.
///
/// The target is at rest in the lab. Construction fails for non-positive
/// masses, negative kinetic energy, or a sub-threshold reaction, so every
/// value of this type admits a real exit-channel CM momentum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionSpec {
    m1: f64,
    m2: f64,
    m3: f64,
    m4: f64,
    kinetic_energy: f64,
}

impl ReactionSpec {
    pub fn new(m1: f64, m2: f64, m3: f64, m4: f64, t1: f64) -> Result<Self, KinematicsError> {
        for (particle, value) in [
            ("projectile", m1),
            ("target", m2),
            ("ejectile", m3),
            ("recoil", m4),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(KinematicsError::InvalidMass { particle, value });
            }
        }
        if !(t1.is_finite() && t1 >= 0.0) {
            return Err(KinematicsError::NegativeKineticEnergy(t1));
        }

        let spec = Self {
            m1,
            m2,
            m3,
            m4,
            kinetic_energy: t1,
        };
        if spec.exit_excess() < 0.0 {
            return Err(KinematicsError::BelowThreshold {
                invariant_mass: spec.invariant_mass(),
                exit_mass_sum: m3 + m4,
                threshold_kinetic_energy: spec.threshold_kinetic_energy(),
            });
        }
        Ok(spec)
    }

    /// Populate the exit channel in excited states by shifting the ejectile and
    /// recoil rest masses, re-running the threshold check.
    pub fn with_excitation(self, ex3: f64, ex4: f64) -> Result<Self, KinematicsError> {
        for ex in [ex3, ex4] {
            if !(ex.is_finite() && ex >= 0.0) {
                return Err(KinematicsError::NegativeExcitation(ex));
            }
        }
        Self::new(
            self.m1,
            self.m2,
            self.m3 + ex3,
            self.m4 + ex4,
            self.kinetic_energy,
        )
    }

    pub fn projectile_mass(&self) -> f64 {
        self.m1
    }

    pub fn target_mass(&self) -> f64 {
        self.m2
    }

    pub fn ejectile_mass(&self) -> f64 {
        self.m3
    }

    pub fn recoil_mass(&self) -> f64 {
        self.m4
    }

    /// Projectile lab kinetic energy `T1` (MeV).
    pub fn kinetic_energy(&self) -> f64 {
        self.kinetic_energy
    }

    /// Mandelstam `s` with the target at rest: `(m1 + m2)² + 2·m2·T1`.
    pub fn mandelstam_s(&self) -> f64 {
        let sum = self.m1 + self.m2;
        sum * sum + 2.0 * self.m2 * self.kinetic_energy
    }

    /// Entry-channel invariant mass `sqrt(s)` (MeV).
    pub fn invariant_mass(&self) -> f64 {
        self.mandelstam_s().sqrt()
    }

    /// Reaction Q-value `m1 + m2 - m3 - m4` (MeV), exactly zero for elastic channels.
    pub fn q_value(&self) -> f64 {
        (self.m1 - self.m3) + (self.m2 - self.m4)
    }

    /// Smallest projectile kinetic energy that opens the exit channel (0 for exothermic reactions).
    pub fn threshold_kinetic_energy(&self) -> f64 {
        let exit = self.m3 + self.m4;
        let entry = self.m1 + self.m2;
        ((exit * exit - entry * entry) / (2.0 * self.m2)).max(0.0)
    }

    /// `s - (m3+m4)²`, expanded as `Q·(m1+m2+m3+m4) + 2·m2·T1` so elastic
    /// channels carry no cancellation at low energy. Negative below threshold.
    pub(crate) fn exit_excess(&self) -> f64 {
        let mass_sum = self.m1 + self.m2 + self.m3 + self.m4;
        self.q_value() * mass_sum + 2.0 * self.m2 * self.kinetic_energy
    }

    /// `(s - (m3+m4)²)·(s - (m3-m4)²)`, non-negative for every constructed spec.
    pub(crate) fn exit_radicand(&self) -> f64 {
        let excess = self.exit_excess();
        // s - (m3-m4)² = s - (m3+m4)² + 4·m3·m4
        excess * (excess + 4.0 * self.m3 * self.m4)
    }

    /// True when the exit channel is the entry pair again and `particle` has
    /// the target's mass: it then moves at exactly the CM speed in the CM frame.
    pub fn moves_at_boost_speed(&self, particle: Particle) -> bool {
        let elastic = (same_mass(self.m1, self.m3) && same_mass(self.m2, self.m4))
            || (same_mass(self.m1, self.m4) && same_mass(self.m2, self.m3));
        let mass = match particle {
            Particle::Ejectile => self.m3,
            Particle::Recoil => self.m4,
        };
        elastic && same_mass(mass, self.m2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const M_P: f64 = 938.272;
    const M_N: f64 = 939.565;

    #[test]
    fn rejects_non_positive_masses_and_negative_energy() {
        assert!(matches!(
            ReactionSpec::new(0.0, 1.0, 1.0, 1.0, 1.0),
            Err(KinematicsError::InvalidMass {
                particle: "projectile",
                ..
            })
        ));
        assert!(matches!(
            ReactionSpec::new(1.0, 1.0, 1.0, -2.0, 1.0),
            Err(KinematicsError::InvalidMass {
                particle: "recoil",
                ..
            })
        ));
        assert!(matches!(
            ReactionSpec::new(1.0, f64::NAN, 1.0, 1.0, 1.0),
            Err(KinematicsError::InvalidMass { .. })
        ));
        assert_eq!(
            ReactionSpec::new(1.0, 1.0, 1.0, 1.0, -0.1),
            Err(KinematicsError::NegativeKineticEnergy(-0.1))
        );
    }

    #[test]
    fn sub_threshold_reaction_reports_threshold() {
        // p + p -> n + n is endothermic by 2 * (M_N - M_P)
        let err = ReactionSpec::new(M_P, M_P, M_N, M_N, 1.0).unwrap_err();
        match err {
            KinematicsError::BelowThreshold {
                invariant_mass,
                exit_mass_sum,
                threshold_kinetic_energy,
            } => {
                assert!(invariant_mass < exit_mass_sum);
                let expected = ((2.0 * M_N).powi(2) - (2.0 * M_P).powi(2)) / (2.0 * M_P);
                assert!((threshold_kinetic_energy - expected).abs() < 1e-9);
            }
            other => panic!("unexpected error {other:?}"),
        }

        // a heavy ejectile makes s - (m3-m4)² negative as well; still closed
        let err = ReactionSpec::new(1.0, 1.0, 100.0, 1.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::BelowThreshold { exit_mass_sum, .. } if exit_mass_sum == 101.0
        ));
        assert!(ReactionSpec::new(1.0, 1.0, 100.0, 1.0, 1000.0).is_err());
        assert!(ReactionSpec::new(1.0, 1.0, 100.0, 1.0, 5100.0).is_ok());
    }

    #[test]
    fn elastic_channels_have_an_exact_zero_q_value() {
        let spec = ReactionSpec::new(M_P, 11_174.862, M_P, 11_174.862, 1e-6).unwrap();
        assert_eq!(spec.q_value(), 0.0);
        assert_eq!(spec.exit_excess(), 2.0 * 11_174.862 * 1e-6);
        assert!(spec.moves_at_boost_speed(Particle::Recoil));
        assert!(!spec.moves_at_boost_speed(Particle::Ejectile));

        // 12C(p,12C)p: the ejectile is the target-mass particle
        let swapped = ReactionSpec::new(M_P, 11_174.862, 11_174.862, M_P, 1e-6).unwrap();
        assert_eq!(swapped.q_value(), 0.0);
        assert!(swapped.moves_at_boost_speed(Particle::Ejectile));

        let excited = spec.with_excitation(0.0, 0.1);
        assert!(excited.is_err());
        let inelastic = ReactionSpec::new(M_P, 11_174.862, M_P, 11_174.862, 10.0)
            .and_then(|s| s.with_excitation(0.0, 4.4))
            .unwrap();
        assert!(!inelastic.moves_at_boost_speed(Particle::Recoil));
    }

    #[test]
    fn threshold_energy_opens_the_channel() {
        let at_rest = ReactionSpec::new(M_P, M_P, M_P, M_P, 0.0).unwrap();
        assert_eq!(at_rest.threshold_kinetic_energy(), 0.0);
        assert_eq!(at_rest.q_value(), 0.0);

        let entry = 2.0 * M_P;
        let exit = 2.0 * M_N;
        let threshold = (exit * exit - entry * entry) / (2.0 * M_P);
        let spec = ReactionSpec::new(M_P, M_P, M_N, M_N, threshold * (1.0 + 1e-9)).unwrap();
        assert!(spec.exit_radicand() >= 0.0);
        assert!(spec.q_value() < 0.0);
    }

    #[test]
    fn excitation_shifts_exit_masses() {
        let spec = ReactionSpec::new(4.0, 12.0, 4.0, 12.0, 5.0).unwrap();
        let excited = spec.with_excitation(0.0, 0.5).unwrap();
        assert_eq!(excited.recoil_mass(), 12.5);
        assert!((excited.q_value() + 0.5).abs() < 1e-12);
        assert_eq!(
            spec.with_excitation(-1.0, 0.0),
            Err(KinematicsError::NegativeExcitation(-1.0))
        );
        assert!(matches!(
            spec.with_excitation(0.0, 100.0),
            Err(KinematicsError::BelowThreshold { .. })
        ));
    }
}
