//! Property-based tests for the two-body engine using proptest.
//!
//! Covers: energy and momentum conservation, inverse lookup consistency,
//! solution multiplicity, out-of-range queries.

use std::f64::consts::PI;

use proptest::prelude::*;
use reaction_engine::{Particle, Quantity, ReactionSpec, TwoBody};

/// Random reaction with `m1 + m2 = m3 + m4` before excitation, so only the
/// excitation energy can close the channel.
fn reaction() -> impl Strategy<Value = (f64, f64, f64, f64, f64)> {
    (
        1.0f64..20_000.0,
        1.0f64..20_000.0,
        -0.4f64..0.4,
        1.0f64..200.0,
        0.0f64..0.9,
    )
}

fn build(m1: f64, m2: f64, shift: f64, t1: f64, ex_fraction: f64) -> Option<TwoBody> {
    let d = shift * m1.min(m2);
    let available = t1 * m2 / (m1 + m2);
    ReactionSpec::new(m1, m2, m1 + d, m2 - d, t1)
        .and_then(|s| s.with_excitation(0.0, ex_fraction * available))
        .ok()
        .map(TwoBody::new)
}

// ── Conservation ─────────────────────────────────────────────────────

proptest! {
    /// e3 + e4 equals the lab total energy at every CM angle.
    #[test]
    fn lab_energy_is_conserved(
        (m1, m2, shift, t1, ex) in reaction(),
        coscm in -1.0f64..=1.0,
    ) {
        let engine = build(m1, m2, shift, t1, ex);
        prop_assume!(engine.is_some());
        let engine = engine.unwrap();
        let state = engine.state_at(coscm).unwrap();
        let total = engine.invariants().lab_total_energy;
        prop_assert!(((state.e3 + state.e4) - total).abs() <= 1e-9 * total);
    }

    /// Exit momenta sum to the beam momentum in both lab components.
    #[test]
    fn lab_momentum_is_conserved(
        (m1, m2, shift, t1, ex) in reaction(),
        coscm in -1.0f64..=1.0,
    ) {
        let engine = build(m1, m2, shift, t1, ex);
        prop_assume!(engine.is_some());
        let engine = engine.unwrap();
        let s = engine.state_at(coscm).unwrap();
        let p1 = engine.invariants().projectile_momentum;
        let scale = 1e-9 * (p1 + s.p3 + s.p4);
        prop_assert!((s.p3 * s.theta3.cos() + s.p4 * s.theta4.cos() - p1).abs() <= scale);
        prop_assert!((s.p3 * s.theta3.sin() - s.p4 * s.theta4.sin()).abs() <= scale);
    }

    /// Lab speeds stay subluminal and angles stay in [0, pi].
    #[test]
    fn lab_state_is_physical(
        (m1, m2, shift, t1, ex) in reaction(),
        coscm in -1.0f64..=1.0,
    ) {
        let engine = build(m1, m2, shift, t1, ex);
        prop_assume!(engine.is_some());
        let s = engine.unwrap().state_at(coscm).unwrap();
        prop_assert!(s.v3 >= 0.0 && s.v3 < 1.0);
        prop_assert!(s.v4 >= 0.0 && s.v4 < 1.0);
        prop_assert!((0.0..=PI).contains(&s.theta3));
        prop_assert!((0.0..=PI).contains(&s.theta4));
    }
}

// ── Inverse Lookup ───────────────────────────────────────────────────

proptest! {
    /// e3 is linear in coscm, so inverting it recovers the emission angle.
    #[test]
    fn e3_lookup_recovers_emission_angle(
        (m1, m2, shift, t1, ex) in reaction(),
        coscm in -1.0f64..=1.0,
    ) {
        let engine = build(m1, m2, shift, t1, ex);
        prop_assume!(engine.is_some());
        let engine = engine.unwrap();
        let inv = engine.invariants();
        prop_assume!(inv.gamma_cm * inv.beta_cm * inv.p_cm > 1.0);

        let e3 = engine.state_at(coscm).unwrap().e3;
        let result = engine.at_value("e3", e3, Some(&["coscm", "theta3"])).unwrap();
        prop_assert_eq!(result[&Quantity::Coscm].len(), 1);
        prop_assert_eq!(result[&Quantity::Theta3].len(), 1);
        prop_assert!((result[&Quantity::Coscm][0] - coscm).abs() < 1e-6);
    }

    /// No lab observable value is reached at more than two CM angles.
    #[test]
    fn lab_angles_have_at_most_two_solutions(
        (m1, m2, shift, t1, ex) in reaction(),
        target in 0.0f64..=PI,
    ) {
        let engine = build(m1, m2, shift, t1, ex);
        prop_assume!(engine.is_some());
        let engine = engine.unwrap();
        for x in [Quantity::Theta3, Quantity::Theta4] {
            let set = engine.solve(x, target).unwrap();
            prop_assert!(set.len() <= 2);
            for solution in set.solutions.iter().filter(|s| s.converged) {
                prop_assert!((solution.state.get(x) - target).abs() < 1e-6);
            }
        }
    }

    /// Particles that outrun the CM boost have a one-to-one lab angle.
    #[test]
    fn unfolded_ejectile_has_unique_angle(
        (m1, m2, shift, t1, ex) in reaction(),
        target in 0.0f64..=PI,
    ) {
        let engine = build(m1, m2, shift, t1, ex);
        prop_assume!(engine.is_some());
        let engine = engine.unwrap();
        prop_assume!(engine.critical_angle(Particle::Ejectile).is_none());
        prop_assert!(engine.solve(Quantity::Theta3, target).unwrap().len() <= 1);
    }

    /// Values beyond the kinematic range give empty, aligned sequences.
    #[test]
    fn unreachable_energy_gives_empty_result(
        (m1, m2, shift, t1, ex) in reaction(),
        excess in 1e-3f64..100.0,
    ) {
        let engine = build(m1, m2, shift, t1, ex);
        prop_assume!(engine.is_some());
        let engine = engine.unwrap();
        let (_, hi) = engine.energy_range(Particle::Recoil);
        let e4 = engine.spec().recoil_mass() + hi + excess;
        let result = engine.at_value("e4", e4, None).unwrap();
        prop_assert_eq!(result.len(), Quantity::ALL.len());
        prop_assert!(result.values().all(Vec::is_empty));
    }
}
