use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use reaction_kinematics::config::{self, MassEntry, ReactionConfig};
use reaction_kinematics::engine::{Quantity, TwoBody};
use reaction_kinematics::export::report::{ReactionSummary, write_json};
use reaction_kinematics::export::writer_for_path;
use reaction_kinematics::units::{AngleUnit, EnergyUnit, MassUnit};
use reaction_kinematics::{
    at_value_report, convert_angles, engine_from_config, summarize, write_table,
};
use tracing::info;

#[path = "kinematics/logging.rs"]
mod logging;

/// Relativistic two-body reaction kinematics: tables, inverse lookups and summaries.
#[derive(Parser, Debug)]
#[command(author, version, about = "Two-body reaction kinematics (target at rest)")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase verbosity (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tabulate every quantity on a uniform cos(theta_cm) grid (CSV)
    Arrays(ArraysArgs),
    /// Find every CM angle where one quantity takes a value and report others there
    AtValue(AtValueArgs),
    /// Print invariants, Q-value, threshold, energy ranges and grazing angles
    Summary(SummaryArgs),
}

/// Where the reaction comes from: a manifest, or inline particle flags.
#[derive(Args, Debug)]
struct ReactionArgs {
    /// Reaction manifest (TOML file, YAML list, or directory of TOML files)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Reaction name within the manifest (case-insensitive)
    #[arg(long, requires = "config")]
    reaction: Option<String>,

    /// Projectile: isotope (e.g. p, alpha, 12C) or rest mass in --mass-unit
    #[arg(long, conflicts_with = "config")]
    projectile: Option<MassEntry>,

    /// Target at rest
    #[arg(long, conflicts_with = "config")]
    target: Option<MassEntry>,

    /// Light exit particle (particle 3)
    #[arg(long, conflicts_with = "config")]
    ejectile: Option<MassEntry>,

    /// Heavy exit particle (particle 4)
    #[arg(long, conflicts_with = "config")]
    recoil: Option<MassEntry>,

    /// Unit of numeric masses (MeV or amu)
    #[arg(long, default_value = "MeV")]
    mass_unit: MassUnit,

    /// Projectile kinetic energy in --energy-unit
    #[arg(long, conflicts_with = "config")]
    energy: Option<f64>,

    /// Unit of --energy and excitation energies (keV, MeV, GeV, TeV)
    #[arg(long, default_value = "MeV")]
    energy_unit: EnergyUnit,

    /// Ejectile excitation energy
    #[arg(long, default_value_t = 0.0)]
    ex3: f64,

    /// Recoil excitation energy
    #[arg(long, default_value_t = 0.0)]
    ex4: f64,
}

#[derive(Args, Debug)]
struct ArraysArgs {
    #[command(flatten)]
    reaction: ReactionArgs,

    /// Number of grid points, at least 2 (default: the manifest's `samples`, else 1001)
    #[arg(long)]
    samples: Option<usize>,

    /// Unit for angle columns
    #[arg(long, default_value = "rad")]
    angle_unit: AngleUnit,

    /// Fixed number of decimals (default: shortest exact representation)
    #[arg(long)]
    precision: Option<usize>,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct AtValueArgs {
    #[command(flatten)]
    reaction: ReactionArgs,

    /// Quantity to match (coscm, theta_cm, theta3, theta4, e3, e4, v3, v4, p3, p4)
    #[arg(long)]
    x: String,

    /// Value of the matched quantity (angles in --angle-unit)
    #[arg(long, allow_negative_numbers = true)]
    value: f64,

    /// Quantity to report; repeat for several (default: all)
    #[arg(long = "y")]
    y: Vec<String>,

    /// Unit for angles, both the matched value and the reported columns
    #[arg(long, default_value = "rad")]
    angle_unit: AngleUnit,

    /// Emit a JSON report instead of a CSV table
    #[arg(long)]
    json: bool,

    /// Output file (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    reaction: ReactionArgs,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    match cli.command {
        Command::Arrays(args) => run_arrays(args),
        Command::AtValue(args) => run_at_value(args),
        Command::Summary(args) => run_summary(args),
    }
}

fn run_arrays(args: ArraysArgs) -> anyhow::Result<()> {
    let (reaction, engine) = build_engine(&args.reaction)?;
    let samples = args.samples.unwrap_or(engine.options().grid_samples);
    let arrays = engine.compute_arrays(samples)?;
    let table = convert_angles(&arrays, args.angle_unit);
    let rows = write_table(open_output(&args.output)?, &table, args.precision)?;
    info!(reaction = %reaction.name, rows, "wrote kinematics table");
    Ok(())
}

fn run_at_value(args: AtValueArgs) -> anyhow::Result<()> {
    let (reaction, engine) = build_engine(&args.reaction)?;
    let x: Quantity = args.x.parse()?;
    let target = if x.is_angle() {
        args.angle_unit.to_radians(args.value)
    } else {
        args.value
    };

    let y_names: Vec<&str> = args.y.iter().map(String::as_str).collect();
    let found = engine.at_value(
        x.name(),
        target,
        (!y_names.is_empty()).then_some(y_names.as_slice()),
    )?;
    let found = convert_angles(&found, args.angle_unit);
    let solutions = found.values().next().map_or(0, Vec::len);
    info!(reaction = %reaction.name, quantity = %x, value = args.value, solutions, "inverse lookup");

    let writer = open_output(&args.output)?;
    if args.json {
        write_json(writer, &at_value_report(&reaction.name, x, args.value, &found))?;
    } else {
        write_table(writer, &found, None)?;
    }
    Ok(())
}

fn run_summary(args: SummaryArgs) -> anyhow::Result<()> {
    let (reaction, engine) = build_engine(&args.reaction)?;
    let summary = summarize(&reaction.name, &engine);
    let stdout = std::io::stdout();
    if args.json {
        write_json(stdout.lock(), &summary)?;
    } else {
        print_summary(&mut stdout.lock(), &summary)?;
    }
    Ok(())
}

fn open_output(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    writer_for_path(path).with_context(|| format!("failed to open {}", path.display()))
}

fn build_engine(args: &ReactionArgs) -> anyhow::Result<(ReactionConfig, TwoBody)> {
    let reaction = match &args.config {
        Some(path) => reaction_from_manifest(path, args.reaction.as_deref())?,
        None => reaction_from_flags(args)?,
    };
    let engine = engine_from_config(&reaction)
        .with_context(|| format!("cannot build reaction '{}'", reaction.name))?;
    Ok((reaction, engine))
}

fn reaction_from_manifest(path: &Path, name: Option<&str>) -> anyhow::Result<ReactionConfig> {
    let reactions = config::load_reactions(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    match (name, reactions.as_slice()) {
        (Some(name), _) => Ok(config::find_reaction(&reactions, name)?.clone()),
        (None, [only]) => Ok(only.clone()),
        (None, []) => bail!("no reactions found in {}", path.display()),
        (None, many) => {
            let names: Vec<&str> = many.iter().map(|r| r.name.as_str()).collect();
            bail!(
                "{} holds several reactions, pick one with --reaction: {}",
                path.display(),
                names.join(", ")
            )
        }
    }
}

fn reaction_from_flags(args: &ReactionArgs) -> anyhow::Result<ReactionConfig> {
    let missing = |flag: &str| anyhow!("--{flag} is required without --config");
    let projectile = args.projectile.clone().ok_or_else(|| missing("projectile"))?;
    let target = args.target.clone().ok_or_else(|| missing("target"))?;
    let ejectile = args.ejectile.clone().ok_or_else(|| missing("ejectile"))?;
    let recoil = args.recoil.clone().ok_or_else(|| missing("recoil"))?;
    let kinetic_energy = args.energy.ok_or_else(|| missing("energy"))?;

    Ok(ReactionConfig {
        name: format!("{target}({projectile},{ejectile}){recoil}"),
        projectile,
        target,
        ejectile,
        recoil,
        mass_unit: args.mass_unit,
        kinetic_energy,
        energy_unit: args.energy_unit,
        ex_ejectile: args.ex3,
        ex_recoil: args.ex4,
        samples: None,
    })
}

fn print_summary(out: &mut dyn Write, s: &ReactionSummary) -> std::io::Result<()> {
    writeln!(out, "Reaction: {}", s.reaction)?;
    writeln!(
        out,
        "  masses (MeV/c^2): m1 = {:.6}, m2 = {:.6}, m3 = {:.6}, m4 = {:.6}",
        s.masses_mev[0], s.masses_mev[1], s.masses_mev[2], s.masses_mev[3]
    )?;
    writeln!(out, "  T1 = {:.6} MeV", s.kinetic_energy_mev)?;
    writeln!(out, "  Q = {:.6} MeV, threshold T1 = {:.6} MeV", s.q_value_mev, s.threshold_mev)?;
    writeln!(
        out,
        "  sqrt(s) = {:.6} MeV, beta_cm = {:.8}, gamma_cm = {:.8}, rapidity = {:.8}",
        s.sqrt_s_mev, s.beta_cm, s.gamma_cm, s.rapidity
    )?;
    writeln!(
        out,
        "  p_cm = {:.6} MeV/c, E3_cm = {:.6} MeV, E4_cm = {:.6} MeV",
        s.p_cm_mev, s.e3_cm_mev, s.e4_cm_mev
    )?;
    for (label, range, grazing) in [
        ("ejectile", s.ejectile_kinetic_range_mev, &s.ejectile_grazing),
        ("recoil", s.recoil_kinetic_range_mev, &s.recoil_grazing),
    ] {
        write!(
            out,
            "  {label}: T in [{:.6}, {:.6}] MeV",
            range.0, range.1
        )?;
        match grazing {
            Some(g) => writeln!(
                out,
                ", theta_max = {:.4} deg (coscm = {:.6}, T = {:.6} MeV)",
                g.theta_max_deg, g.coscm, g.kinetic_energy_mev
            )?,
            None => writeln!(out, ", all lab angles reachable once")?,
        }
    }
    Ok(())
}
