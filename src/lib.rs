//! Relativistic two-body reaction kinematics.
//!
//! The member crates are re-exported here so front-ends depend on one crate:
//! units and nuclide masses, reaction manifests, the kinematics engine and
//! the CSV/JSON writers. The functions below glue a manifest to an engine and
//! an engine's output to the export formats.

use std::collections::BTreeMap;
use std::io::Write;

use thiserror::Error;

pub use reaction_config as config;
pub use reaction_core::{constants, nuclide, units};
pub use reaction_engine as engine;
pub use reaction_export as export;

use config::{ConfigError, ReactionConfig};
use engine::{KinematicsError, Particle, Quantity, QuantityMap, ReactionSpec, SolverOptions, TwoBody};
use export::ExportError;
use export::report::{AtValueReport, GrazingAngle, ReactionSummary};
use export::table::{self, Column};
use units::AngleUnit;

/// Failure to turn a reaction manifest into an engine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}

/// Resolve masses and energies of a manifest and build its engine.
///
/// Excitation energies are added to the exit-channel rest masses and a
/// manifest `samples` entry sizes the inverter's bracketing grid.
pub fn engine_from_config(config: &ReactionConfig) -> Result<TwoBody, BuildError> {
    let resolved = config.resolve()?;
    let [m1, m2, m3, m4] = resolved.masses_mev;
    let spec = ReactionSpec::new(m1, m2, m3, m4, resolved.kinetic_energy_mev)?
        .with_excitation(resolved.ex_ejectile_mev, resolved.ex_recoil_mev)?;
    let options = SolverOptions {
        grid_samples: config.samples.unwrap_or(engine::DEFAULT_SAMPLES),
        ..SolverOptions::default()
    };
    Ok(TwoBody::with_options(spec, options)?)
}

/// Convert the angle columns of a table from radians to `unit`.
pub fn convert_angles(map: &QuantityMap, unit: AngleUnit) -> QuantityMap {
    map.iter()
        .map(|(&q, values)| {
            let converted = if q.is_angle() {
                values.iter().map(|&v| unit.from_radians(v)).collect()
            } else {
                values.clone()
            };
            (q, converted)
        })
        .collect()
}

/// Write a quantity table as CSV, columns in quantity order.
pub fn write_table<W: Write>(
    writer: W,
    map: &QuantityMap,
    precision: Option<usize>,
) -> Result<usize, ExportError> {
    let columns: Vec<Column<'_>> = map
        .iter()
        .map(|(q, values)| Column {
            name: q.name(),
            values,
        })
        .collect();
    table::write_columns(writer, &columns, precision)
}

/// Package an inverse lookup for JSON export.
pub fn at_value_report(reaction: &str, x: Quantity, x_value: f64, map: &QuantityMap) -> AtValueReport {
    let values: BTreeMap<String, Vec<f64>> = map
        .iter()
        .map(|(q, v)| (q.name().to_string(), v.clone()))
        .collect();
    AtValueReport {
        reaction: reaction.to_string(),
        x: x.name().to_string(),
        x_value,
        solutions: map.values().next().map_or(0, Vec::len),
        values,
    }
}

/// Reaction invariants, kinetic-energy ranges and grazing angles.
pub fn summarize(reaction: &str, engine: &TwoBody) -> ReactionSummary {
    let spec = engine.spec();
    let inv = engine.invariants();
    let grazing = |particle: Particle| {
        engine.critical_angle(particle).map(|crit| GrazingAngle {
            theta_max_deg: AngleUnit::Deg.from_radians(crit.theta_max),
            coscm: crit.coscm,
            kinetic_energy_mev: engine.kinetic_energy(&crit.state, particle),
        })
    };
    ReactionSummary {
        reaction: reaction.to_string(),
        masses_mev: [
            spec.projectile_mass(),
            spec.target_mass(),
            spec.ejectile_mass(),
            spec.recoil_mass(),
        ],
        kinetic_energy_mev: spec.kinetic_energy(),
        q_value_mev: spec.q_value(),
        threshold_mev: spec.threshold_kinetic_energy(),
        sqrt_s_mev: inv.e_cm_total,
        beta_cm: inv.beta_cm,
        gamma_cm: inv.gamma_cm,
        rapidity: inv.rapidity,
        p_cm_mev: inv.p_cm,
        e3_cm_mev: inv.e3_cm,
        e4_cm_mev: inv.e4_cm,
        ejectile_kinetic_range_mev: engine.energy_range(Particle::Ejectile),
        recoil_kinetic_range_mev: engine.energy_range(Particle::Recoil),
        ejectile_grazing: grazing(Particle::Ejectile),
        recoil_grazing: grazing(Particle::Recoil),
    }
}

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
