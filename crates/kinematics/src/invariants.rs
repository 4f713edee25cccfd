//! Frame-invariant quantities derived once per reaction.

use crate::reaction::ReactionSpec;

/// Boost and exit-channel CM quantities. Immutable; owned by the engine that computed them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invariants {
    /// Projectile lab total energy `E1 = T1 + m1` (MeV).
    pub projectile_energy: f64,
    /// Projectile lab momentum `p1` (MeV/c).
    pub projectile_momentum: f64,
    /// Lab-frame total energy `E1 + m2`, conserved by every exit state (MeV).
    pub lab_total_energy: f64,
    /// `sqrt(s)` (MeV).
    pub e_cm_total: f64,
    pub beta_cm: f64,
    pub gamma_cm: f64,
    /// CM rapidity `atanh(beta_cm)`.
    pub rapidity: f64,
    /// Entry-channel CM momentum (MeV/c).
    pub p_cm_entry: f64,
    /// Exit-channel CM momentum shared by ejectile and recoil (MeV/c).
    pub p_cm: f64,
    pub e3_cm: f64,
    pub e4_cm: f64,
}

impl Invariants {
    pub fn solve(spec: &ReactionSpec) -> Self {
        let m1 = spec.projectile_mass();
        let m2 = spec.target_mass();
        let m3 = spec.ejectile_mass();
        let m4 = spec.recoil_mass();
        let t1 = spec.kinetic_energy();

        let projectile_energy = t1 + m1;
        // T(T + 2m) avoids the cancellation in E² - m² at low energy
        let projectile_momentum = (t1 * (t1 + 2.0 * m1)).sqrt();
        let lab_total_energy = projectile_energy + m2;

        let s = spec.mandelstam_s();
        let e_cm_total = s.sqrt();
        let beta_cm = projectile_momentum / lab_total_energy;
        let gamma_cm = lab_total_energy / e_cm_total;
        let rapidity = beta_cm.atanh();
        let p_cm_entry = projectile_momentum * m2 / e_cm_total;

        let p_cm = spec.exit_radicand().sqrt() / (2.0 * e_cm_total);
        let e3_cm = (s + m3 * m3 - m4 * m4) / (2.0 * e_cm_total);
        let e4_cm = e_cm_total - e3_cm;

        Self {
            projectile_energy,
            projectile_momentum,
            lab_total_energy,
            e_cm_total,
            beta_cm,
            gamma_cm,
            rapidity,
            p_cm_entry,
            p_cm,
            e3_cm,
            e4_cm,
        }
    }

    /// `gamma_cm * beta_cm`, equal to `p1 / sqrt(s)`.
    pub fn beta_gamma(&self) -> f64 {
        self.projectile_momentum / self.e_cm_total
    }
}
