//! Core units, constants, and shared primitives for the reaction kinematics workspace.

pub mod nuclide;

/// Physical constants in MeV-based natural units (unless stated otherwise).
pub mod constants {
    /// Unified atomic mass unit (MeV/c²).
    pub const AMU_MEV: f64 = 931.494_102_42;
    /// Electron rest mass (MeV/c²).
    pub const ELECTRON_MASS_MEV: f64 = 0.510_998_950;
}

/// Unit enumerations and conversion helpers. The engine works in MeV/c² and MeV;
/// everything else is converted here before it reaches it.
pub mod units {
    use std::fmt;
    use std::str::FromStr;

    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    use super::constants::AMU_MEV;

    #[derive(Debug, Error, Clone, PartialEq, Eq)]
    pub enum UnitError {
        #[error("unknown energy unit '{0}' (expected keV, MeV, GeV or TeV)")]
        Energy(String),
        #[error("unknown angle unit '{0}' (expected rad, deg or mrad)")]
        Angle(String),
        #[error("unknown mass unit '{0}' (expected MeV or amu)")]
        Mass(String),
    }

    /// Energy units accepted on input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub enum EnergyUnit {
        #[serde(rename = "keV")]
        KeV,
        #[default]
        #[serde(rename = "MeV")]
        MeV,
        #[serde(rename = "GeV")]
        GeV,
        #[serde(rename = "TeV")]
        TeV,
    }

    impl EnergyUnit {
        /// Multiplier taking a value in this unit to MeV.
        #[inline]
        pub fn factor(self) -> f64 {
            match self {
                EnergyUnit::KeV => 1e-3,
                EnergyUnit::MeV => 1.0,
                EnergyUnit::GeV => 1e3,
                EnergyUnit::TeV => 1e6,
            }
        }

        #[inline]
        pub fn to_mev(self, value: f64) -> f64 {
            value * self.factor()
        }

        #[inline]
        pub fn from_mev(self, mev: f64) -> f64 {
            mev / self.factor()
        }

        pub fn symbol(self) -> &'static str {
            match self {
                EnergyUnit::KeV => "keV",
                EnergyUnit::MeV => "MeV",
                EnergyUnit::GeV => "GeV",
                EnergyUnit::TeV => "TeV",
            }
        }
    }

    impl FromStr for EnergyUnit {
        type Err = UnitError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "kev" => Ok(EnergyUnit::KeV),
                "mev" => Ok(EnergyUnit::MeV),
                "gev" => Ok(EnergyUnit::GeV),
                "tev" => Ok(EnergyUnit::TeV),
                _ => Err(UnitError::Energy(s.to_string())),
            }
        }
    }

    impl fmt::Display for EnergyUnit {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.symbol())
        }
    }

    /// Angle units used when presenting lab and CM angles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum AngleUnit {
        #[default]
        Rad,
        Deg,
        Mrad,
    }

    impl AngleUnit {
        /// Size of one unit in radians.
        #[inline]
        pub fn factor(self) -> f64 {
            match self {
                AngleUnit::Rad => 1.0,
                AngleUnit::Deg => std::f64::consts::PI / 180.0,
                AngleUnit::Mrad => 1e-3,
            }
        }

        #[inline]
        pub fn to_radians(self, value: f64) -> f64 {
            value * self.factor()
        }

        #[inline]
        pub fn from_radians(self, radians: f64) -> f64 {
            radians / self.factor()
        }
    }

    impl FromStr for AngleUnit {
        type Err = UnitError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "rad" => Ok(AngleUnit::Rad),
                "deg" => Ok(AngleUnit::Deg),
                "mrad" => Ok(AngleUnit::Mrad),
                _ => Err(UnitError::Angle(s.to_string())),
            }
        }
    }

    /// Units for numeric rest masses.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub enum MassUnit {
        #[default]
        #[serde(rename = "MeV")]
        MeV,
        #[serde(rename = "amu")]
        Amu,
    }

    impl MassUnit {
        #[inline]
        pub fn to_mev(self, value: f64) -> f64 {
            match self {
                MassUnit::MeV => value,
                MassUnit::Amu => value * AMU_MEV,
            }
        }
    }

    impl FromStr for MassUnit {
        type Err = UnitError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "mev" => Ok(MassUnit::MeV),
                "amu" | "u" => Ok(MassUnit::Amu),
                _ => Err(UnitError::Mass(s.to_string())),
            }
        }
    }
}
