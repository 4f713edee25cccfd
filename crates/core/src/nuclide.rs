//! Nuclide lookup: isotope-string parsing and nuclear rest masses from a
//! compact table of AME2020 mass excesses.

use thiserror::Error;

use crate::constants::{AMU_MEV, ELECTRON_MASS_MEV};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NuclideError {
    #[error("invalid isotope string '{0}' (expected forms like '12C', '4He', 'p', 'alpha')")]
    Malformed(String),
    #[error("isotope '{0}' not found in the mass table")]
    Unknown(String),
}

/// Entry in the built-in mass table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nuclide {
    pub mass_number: u32,
    pub charge: u32,
    pub symbol: &'static str,
    /// Atomic mass excess (keV).
    pub mass_excess_kev: f64,
}

impl Nuclide {
    /// Nuclear rest mass (MeV/c²): atomic mass minus the electrons.
    pub fn mass_mev(&self) -> f64 {
        self.mass_number as f64 * AMU_MEV + self.mass_excess_kev * 1e-3
            - self.charge as f64 * ELECTRON_MASS_MEV
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.mass_number, self.symbol)
    }
}

const fn entry(mass_number: u32, charge: u32, symbol: &'static str, mass_excess_kev: f64) -> Nuclide {
    Nuclide {
        mass_number,
        charge,
        symbol,
        mass_excess_kev,
    }
}

const TABLE: &[Nuclide] = &[
    entry(1, 0, "n", 8_071.318_1),
    entry(1, 1, "H", 7_288.971_06),
    entry(2, 1, "H", 13_135.722_89),
    entry(3, 1, "H", 14_949.810_9),
    entry(3, 2, "He", 14_931.217_6),
    entry(4, 2, "He", 2_424.915_61),
    entry(6, 3, "Li", 14_086.882_1),
    entry(7, 3, "Li", 14_907.105_1),
    entry(7, 4, "Be", 15_768.999),
    entry(9, 4, "Be", 11_348.453),
    entry(10, 5, "B", 12_050.611),
    entry(11, 5, "B", 8_667.708),
    entry(12, 6, "C", 0.0),
    entry(13, 6, "C", 3_125.008_75),
    entry(14, 6, "C", 3_019.892_9),
    entry(14, 7, "N", 2_863.416_72),
    entry(15, 7, "N", 101.438_66),
    entry(16, 8, "O", -4_737.001_37),
    entry(17, 8, "O", -808.763_6),
    entry(18, 8, "O", -782.815_6),
    entry(19, 9, "F", -1_487.444_4),
    entry(20, 10, "Ne", -7_041.931_3),
    entry(23, 11, "Na", -9_529.852_5),
    entry(24, 12, "Mg", -13_933.567),
    entry(27, 13, "Al", -17_196.86),
    entry(28, 14, "Si", -21_492.794_3),
    entry(40, 20, "Ca", -34_846.386),
    entry(56, 26, "Fe", -60_607.1),
    entry(197, 79, "Au", -31_139.7),
    entry(208, 82, "Pb", -21_748.5),
];

/// Split an isotope string into `(A, element)` with the element lower-cased.
///
/// Accepts `"12C"`, `"4he"`, and the aliases `p`, `d`, `t`, `n`, `a`/`alpha`.
pub fn parse_isotope(isotope: &str) -> Result<(u32, String), NuclideError> {
    let cleaned = isotope.trim().to_ascii_lowercase();
    let alias = match cleaned.as_str() {
        "p" => Some((1, "h")),
        "d" => Some((2, "h")),
        "t" => Some((3, "h")),
        "n" => Some((1, "n")),
        "a" | "alpha" => Some((4, "he")),
        _ => None,
    };
    if let Some((a, element)) = alias {
        return Ok((a, element.to_string()));
    }

    let split = cleaned
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| NuclideError::Malformed(isotope.to_string()))?;
    let (digits, element) = cleaned.split_at(split);
    if digits.is_empty() || element.is_empty() || !element.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(NuclideError::Malformed(isotope.to_string()));
    }
    let mass_number = digits
        .parse::<u32>()
        .map_err(|_| NuclideError::Malformed(isotope.to_string()))?;
    Ok((mass_number, element.to_string()))
}

/// Look up a table entry by isotope string.
pub fn lookup(isotope: &str) -> Result<&'static Nuclide, NuclideError> {
    let (mass_number, element) = parse_isotope(isotope)?;
    TABLE
        .iter()
        .find(|n| n.mass_number == mass_number && n.symbol.eq_ignore_ascii_case(&element))
        .ok_or_else(|| NuclideError::Unknown(format!("{mass_number}{element}")))
}

/// Nuclear rest mass in MeV/c² for an isotope string.
pub fn nuclear_mass_mev(isotope: &str) -> Result<f64, NuclideError> {
    lookup(isotope).map(Nuclide::mass_mev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_light_ions() {
        assert_eq!(parse_isotope("p").unwrap(), (1, "h".to_string()));
        assert_eq!(parse_isotope(" Alpha ").unwrap(), (4, "he".to_string()));
        assert_eq!(lookup("d").unwrap().label(), "2H");
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert!(matches!(parse_isotope("C12"), Err(NuclideError::Malformed(_))));
        assert!(matches!(parse_isotope("12"), Err(NuclideError::Malformed(_))));
        assert!(matches!(parse_isotope("4he3"), Err(NuclideError::Malformed(_))));
        assert!(matches!(lookup("99Zz"), Err(NuclideError::Unknown(_))));
    }

    #[test]
    fn alpha_and_proton_masses_match_reference() {
        let alpha = nuclear_mass_mev("4He").unwrap();
        assert!((alpha - 3727.379).abs() < 1e-2, "alpha = {alpha}");
        let proton = nuclear_mass_mev("p").unwrap();
        assert!((proton - 938.272).abs() < 1e-2, "proton = {proton}");
        let c12 = nuclear_mass_mev("12c").unwrap();
        assert!((c12 - (12.0 * AMU_MEV - 6.0 * ELECTRON_MASS_MEV)).abs() < 1e-12);
    }
}
