//! Export helpers for kinematics tables (CSV) and lookup reports (JSON).

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("column '{name}' has {found} rows, expected {expected}")]
    RaggedColumns {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod table {
    use std::io::Write;

    use super::ExportError;

    /// One named, index-aligned column of a kinematics table.
    #[derive(Debug, Clone, Copy)]
    pub struct Column<'a> {
        pub name: &'a str,
        pub values: &'a [f64],
    }

    fn format_value(value: f64, precision: Option<usize>) -> String {
        match precision {
            Some(digits) => format!("{value:.digits$}"),
            None => value.to_string(),
        }
    }

    /// Write the columns as a CSV table with a header row; returns the number of data rows.
    ///
    /// Without `precision` values use the shortest representation that round-trips.
    pub fn write_columns<W: Write>(
        writer: W,
        columns: &[Column<'_>],
        precision: Option<usize>,
    ) -> Result<usize, ExportError> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(ExportError::RaggedColumns {
                name: bad.name.to_string(),
                expected: rows,
                found: bad.values.len(),
            });
        }

        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(columns.iter().map(|c| c.name))?;
        for i in 0..rows {
            csv.write_record(
                columns
                    .iter()
                    .map(|c| format_value(c.values[i], precision)),
            )?;
        }
        csv.flush()?;
        Ok(rows)
    }
}

pub mod report {
    use std::collections::BTreeMap;
    use std::io::Write;
    use std::path::Path;

    use serde::{Deserialize, Serialize};
    use serde_json::to_writer_pretty;

    use super::{ExportError, writer_for_path};

    /// Result of an inverse lookup: every requested quantity at each matching CM angle.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct AtValueReport {
        pub reaction: String,
        pub x: String,
        pub x_value: f64,
        pub solutions: usize,
        /// Quantity name to aligned values; all sequences have length `solutions`.
        pub values: BTreeMap<String, Vec<f64>>,
    }

    /// Grazing angle of one exit particle.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct GrazingAngle {
        pub theta_max_deg: f64,
        pub coscm: f64,
        pub kinetic_energy_mev: f64,
    }

    /// Reaction-level invariants and ranges.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ReactionSummary {
        pub reaction: String,
        /// Projectile, target, ejectile, recoil (MeV/c²), excitation included.
        pub masses_mev: [f64; 4],
        pub kinetic_energy_mev: f64,
        pub q_value_mev: f64,
        pub threshold_mev: f64,
        pub sqrt_s_mev: f64,
        pub beta_cm: f64,
        pub gamma_cm: f64,
        pub rapidity: f64,
        pub p_cm_mev: f64,
        pub e3_cm_mev: f64,
        pub e4_cm_mev: f64,
        pub ejectile_kinetic_range_mev: (f64, f64),
        pub recoil_kinetic_range_mev: (f64, f64),
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub ejectile_grazing: Option<GrazingAngle>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub recoil_grazing: Option<GrazingAngle>,
    }

    /// Pretty-print any report as JSON followed by a newline.
    pub fn write_json<T: Serialize, W: Write>(mut writer: W, value: &T) -> Result<(), ExportError> {
        to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// As [`write_json`], to a path or stdout (`-`).
    pub fn write_json_to_path<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
        write_json(writer_for_path(path)?, value)
    }
}
