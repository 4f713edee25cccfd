//! Configuration models and loaders for reaction manifests.

use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use reaction_core::nuclide::{self, NuclideError};
use reaction_core::units::{EnergyUnit, MassUnit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rest mass given either as an isotope string or as a number in `mass_unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MassEntry {
    Value(f64),
    Nuclide(String),
}

impl MassEntry {
    /// Resolve to MeV/c². Numeric entries are scaled by `unit`; nuclides come from the table.
    pub fn to_mev(&self, unit: MassUnit) -> Result<f64, ConfigError> {
        match self {
            MassEntry::Value(value) => Ok(unit.to_mev(*value)),
            MassEntry::Nuclide(name) => Ok(nuclide::nuclear_mass_mev(name)?),
        }
    }
}

/// Command-line form: a number is a mass, anything else an isotope.
impl FromStr for MassEntry {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<f64>() {
            Ok(value) => MassEntry::Value(value),
            Err(_) => MassEntry::Nuclide(s.to_string()),
        })
    }
}

impl fmt::Display for MassEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MassEntry::Value(value) => write!(f, "{value}"),
            MassEntry::Nuclide(name) => f.write_str(name),
        }
    }
}

/// Two-body reaction manifest `projectile + target -> ejectile + recoil`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionConfig {
    pub name: String,
    pub projectile: MassEntry,
    pub target: MassEntry,
    pub ejectile: MassEntry,
    pub recoil: MassEntry,
    #[serde(default)]
    pub mass_unit: MassUnit,
    pub kinetic_energy: f64,
    #[serde(default)]
    pub energy_unit: EnergyUnit,
    #[serde(default)]
    pub ex_ejectile: f64,
    #[serde(default)]
    pub ex_recoil: f64,
    #[serde(default)]
    pub samples: Option<usize>,
}

/// Manifest reduced to the MeV quantities the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedReaction {
    /// Projectile, target, ejectile, recoil (MeV/c²), excitation not included.
    pub masses_mev: [f64; 4],
    pub kinetic_energy_mev: f64,
    pub ex_ejectile_mev: f64,
    pub ex_recoil_mev: f64,
}

impl ReactionConfig {
    pub fn resolve(&self) -> Result<ResolvedReaction, ConfigError> {
        let masses_mev = [
            self.projectile.to_mev(self.mass_unit)?,
            self.target.to_mev(self.mass_unit)?,
            self.ejectile.to_mev(self.mass_unit)?,
            self.recoil.to_mev(self.mass_unit)?,
        ];
        Ok(ResolvedReaction {
            masses_mev,
            kinetic_energy_mev: self.energy_unit.to_mev(self.kinetic_energy),
            ex_ejectile_mev: self.energy_unit.to_mev(self.ex_ejectile),
            ex_recoil_mev: self.energy_unit.to_mev(self.ex_recoil),
        })
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("mass lookup failed: {0}")]
    Nuclide(#[from] NuclideError),
    #[error("reaction '{0}' not found in catalog")]
    MissingReaction(String),
}

/// Load reaction manifests from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_reactions<P: AsRef<Path>>(path: P) -> Result<Vec<ReactionConfig>, ConfigError> {
    load_records(path)
}

/// Case-insensitive lookup by reaction name.
pub fn find_reaction<'a>(
    reactions: &'a [ReactionConfig],
    name: &str,
) -> Result<&'a ReactionConfig, ConfigError> {
    reactions
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::MissingReaction(name.to_string()))
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ALPHA_TOML: &str = r#"
name = "12C(a,a)12C"
projectile = "alpha"
target = "12C"
ejectile = "4He"
recoil = "12C"
kinetic_energy = 4000.0
energy_unit = "keV"
"#;

    #[test]
    fn toml_manifest_resolves_nuclides_and_units() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.toml");
        File::create(&path)
            .unwrap()
            .write_all(ALPHA_TOML.as_bytes())
            .unwrap();

        let reactions = load_reactions(&path).unwrap();
        assert_eq!(reactions.len(), 1);
        let resolved = reactions[0].resolve().unwrap();
        assert!((resolved.kinetic_energy_mev - 4.0).abs() < 1e-12);
        assert_eq!(resolved.masses_mev[0], resolved.masses_mev[2]);
        assert_eq!(resolved.ex_recoil_mev, 0.0);
    }

    #[test]
    fn yaml_list_accepts_numeric_masses_in_amu() {
        let yaml = r#"
- name: heavy
  projectile: 1.0
  target: 2.0
  ejectile: 1.0
  recoil: 2.0
  mass_unit: amu
  kinetic_energy: 10.0
  ex_recoil: 0.5
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.yaml");
        std::fs::write(&path, yaml).unwrap();

        let reactions = load_reactions(&path).unwrap();
        let heavy = find_reaction(&reactions, "HEAVY").unwrap();
        let resolved = heavy.resolve().unwrap();
        assert!((resolved.masses_mev[1] - 2.0 * reaction_core::constants::AMU_MEV).abs() < 1e-9);
        assert_eq!(resolved.ex_recoil_mev, 0.5);
        assert!(matches!(
            find_reaction(&reactions, "light"),
            Err(ConfigError::MissingReaction(_))
        ));
    }

    #[test]
    fn directory_records_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.toml"), ALPHA_TOML.replace("12C(a,a)12C", "second"))
            .unwrap();
        std::fs::write(dir.path().join("a.toml"), ALPHA_TOML.replace("12C(a,a)12C", "first"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let reactions = load_reactions(dir.path()).unwrap();
        let names: Vec<_> = reactions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn mass_entries_parse_from_flags() {
        assert_eq!("938.272".parse::<MassEntry>(), Ok(MassEntry::Value(938.272)));
        assert_eq!(" 7Li ".parse::<MassEntry>(), Ok(MassEntry::Nuclide("7Li".into())));
        assert_eq!(MassEntry::Nuclide("p".into()).to_string(), "p");
    }

    #[test]
    fn unknown_nuclide_surfaces_config_error() {
        let cfg = ReactionConfig {
            name: "bad".into(),
            projectile: MassEntry::Nuclide("999Xx".into()),
            target: MassEntry::Value(1.0),
            ejectile: MassEntry::Value(1.0),
            recoil: MassEntry::Value(1.0),
            mass_unit: MassUnit::MeV,
            kinetic_energy: 1.0,
            energy_unit: EnergyUnit::MeV,
            ex_ejectile: 0.0,
            ex_recoil: 0.0,
            samples: None,
        };
        assert!(matches!(cfg.resolve(), Err(ConfigError::Nuclide(_))));
    }
}
