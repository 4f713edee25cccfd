//! Names of the observables the engine produces.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::KinematicsError;

/// One of the ten observables carried by a [`KinematicState`](crate::KinematicState).
///
/// Angles are in radians, energies are total lab energies in MeV, momenta in
/// MeV/c and velocities as fractions of c.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quantity {
    Coscm,
    ThetaCm,
    Theta3,
    Theta4,
    E3,
    E4,
    V3,
    V4,
    P3,
    P4,
}

/// Per-quantity ordered sequences, keyed in declaration order of [`Quantity`].
pub type QuantityMap = BTreeMap<Quantity, Vec<f64>>;

impl Quantity {
    pub const ALL: [Quantity; 10] = [
        Quantity::Coscm,
        Quantity::ThetaCm,
        Quantity::Theta3,
        Quantity::Theta4,
        Quantity::E3,
        Quantity::E4,
        Quantity::V3,
        Quantity::V4,
        Quantity::P3,
        Quantity::P4,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Quantity::Coscm => "coscm",
            Quantity::ThetaCm => "theta_cm",
            Quantity::Theta3 => "theta3",
            Quantity::Theta4 => "theta4",
            Quantity::E3 => "e3",
            Quantity::E4 => "e4",
            Quantity::V3 => "v3",
            Quantity::V4 => "v4",
            Quantity::P3 => "p3",
            Quantity::P4 => "p4",
        }
    }

    /// True for the angle-valued quantities (radians).
    pub fn is_angle(self) -> bool {
        matches!(
            self,
            Quantity::ThetaCm | Quantity::Theta3 | Quantity::Theta4
        )
    }

    /// Parse a list of names, failing on the first unknown one.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Quantity>, KinematicsError> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl FromStr for Quantity {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::ALL
            .into_iter()
            .find(|q| q.name() == s)
            .ok_or_else(|| KinematicsError::UnknownQuantity(s.to_string()))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exit-channel particle selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Particle {
    /// Particle 3.
    Ejectile,
    /// Particle 4.
    Recoil,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for q in Quantity::ALL {
            assert_eq!(q.name().parse::<Quantity>().unwrap(), q);
            assert_eq!(q.to_string(), q.name());
        }
    }

    #[test]
    fn unknown_names_identify_the_bad_key() {
        let err = "theta5".parse::<Quantity>().unwrap_err();
        assert_eq!(err, KinematicsError::UnknownQuantity("theta5".into()));
        assert!(err.to_string().contains("theta5"));
        // names are case-sensitive, like the mapping keys they mirror
        assert!("E3".parse::<Quantity>().is_err());
    }

    #[test]
    fn parse_all_stops_at_first_bad_name() {
        let ok = Quantity::parse_all(&["e3", "p4"]).unwrap();
        assert_eq!(ok, vec![Quantity::E3, Quantity::P4]);
        let err = Quantity::parse_all(&["e3", "bogus", "nope"]).unwrap_err();
        assert_eq!(err, KinematicsError::UnknownQuantity("bogus".into()));
    }
}
