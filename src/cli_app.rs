//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use acuity_kiosk::calibration::{
    CalibrationStore, DEFAULT_MIN_WIDTH_PX, FileSlot, LoadOutcome, pixels_per_mm_from_width,
    width_px_for,
};
use acuity_kiosk::charts::ChartVariant;
use acuity_kiosk::core::config::Config;
use acuity_kiosk::core::errors::AcuityError;
use acuity_kiosk::tui::run_kiosk;

/// Visual acuity chart kiosk driven by a TV remote or keyboard.
#[derive(Debug, Parser)]
#[command(
    name = "acuity",
    author,
    version,
    about = "Visual acuity chart kiosk",
    long_about = None
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute (defaults to `run`).
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Start the kiosk on this terminal.
    Run(RunArgs),
    /// Inspect or change the stored screen calibration.
    Calibration(CalibrationArgs),
    /// List the available charts.
    Charts,
    /// Inspect configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct RunArgs {
    /// Open this chart directly instead of the landing view.
    #[arg(long, value_name = "CHART")]
    chart: Option<ChartVariant>,
}

#[derive(Debug, Clone, Args)]
struct CalibrationArgs {
    #[command(subcommand)]
    command: Option<CalibrationCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum CalibrationCommand {
    /// Show the effective pixels-per-millimetre scalar.
    Show,
    /// Store a new scalar.
    Set(CalibrationSetArgs),
    /// Forget the stored scalar; the configured default applies again.
    Reset,
}

#[derive(Debug, Clone, Args)]
#[command(group(ArgGroup::new("value").required(true).args(["width_px", "pixels_per_mm"])))]
struct CalibrationSetArgs {
    /// Measured on-screen width of an 85.6 mm reference card, in pixels.
    #[arg(long, value_name = "PX")]
    width_px: Option<u32>,
    /// Scalar to store directly.
    #[arg(long, value_name = "RATIO")]
    pixels_per_mm: Option<f64>,
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration.
    Show,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl From<AcuityError> for CliError {
    fn from(err: AcuityError) -> Self {
        match err {
            AcuityError::InvalidCalibration { .. }
            | AcuityError::UnknownChart { .. }
            | AcuityError::InvalidConfig { .. }
            | AcuityError::MissingConfig { .. } => Self::User(err.to_string()),
            other => Self::Runtime(other.to_string()),
        }
    }
}

/// Dispatch parsed CLI arguments.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        None => run_kiosk_command(cli, &RunArgs::default()),
        Some(Command::Run(args)) => run_kiosk_command(cli, args),
        Some(Command::Calibration(args)) => run_calibration(cli, args),
        Some(Command::Charts) => run_charts(cli),
        Some(Command::Config(args)) => run_config(cli, args),
        Some(Command::Completions(args)) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Ok(Config::load(cli.config.as_deref())?)
}

fn run_kiosk_command(cli: &Cli, args: &RunArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    run_kiosk(&config, args.chart)?;
    Ok(())
}

// ──────────────────── calibration ────────────────────

fn calibration_store(config: &Config) -> CalibrationStore<FileSlot> {
    CalibrationStore::new(FileSlot::new(&config.calibration.file))
}

fn run_calibration(cli: &Cli, args: &CalibrationArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let mut store = calibration_store(&config);

    match &args.command {
        None | Some(CalibrationCommand::Show) => {
            let outcome = store.load_outcome();
            let default = config.calibration.default_pixels_per_mm;
            let value = outcome.value_or(default);
            let card_width_px = width_px_for(value, config.calibration.min_width_px);
            let source = outcome_source(&outcome);

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", "Calibration".bold());
                    println!("  Pixels per mm: {}", format!("{value:.4}").green());
                    let source_text = if outcome.loaded().is_some() {
                        source.normal()
                    } else {
                        source.yellow()
                    };
                    println!("  Source:        {source_text}");
                    println!("  Card width:    {card_width_px} px");
                    println!("  File:          {}", config.calibration.file.display());
                    if let LoadOutcome::Invalid { details, .. } | LoadOutcome::Unreadable { details } =
                        &outcome
                    {
                        println!("  {} {details}", "Warning:".yellow());
                    }
                }
                OutputMode::Json => {
                    write_json_line(&json!({
                        "command": "calibration show",
                        "pixels_per_mm": value,
                        "source": source,
                        "card_width_px": card_width_px,
                        "file": config.calibration.file.to_string_lossy(),
                    }))?;
                }
            }
            Ok(())
        }
        Some(CalibrationCommand::Set(set)) => {
            let value = requested_pixels_per_mm(set)?;
            store.save(value)?;
            match output_mode(cli) {
                OutputMode::Human => {
                    println!(
                        "Saved calibration: {} px/mm ({})",
                        format!("{value:.4}").green(),
                        config.calibration.file.display()
                    );
                }
                OutputMode::Json => {
                    write_json_line(&json!({
                        "command": "calibration set",
                        "pixels_per_mm": value,
                        "file": config.calibration.file.to_string_lossy(),
                    }))?;
                }
            }
            Ok(())
        }
        Some(CalibrationCommand::Reset) => {
            store.clear()?;
            let default = config.calibration.default_pixels_per_mm;
            match output_mode(cli) {
                OutputMode::Human => {
                    println!("Calibration cleared; default {default} px/mm applies.");
                }
                OutputMode::Json => {
                    write_json_line(&json!({
                        "command": "calibration reset",
                        "pixels_per_mm": default,
                    }))?;
                }
            }
            Ok(())
        }
    }
}

const fn outcome_source(outcome: &LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Loaded(_) => "stored",
        LoadOutcome::Missing => "default",
        LoadOutcome::Invalid { .. } => "default (stored value invalid)",
        LoadOutcome::Unreadable { .. } => "default (file unreadable)",
    }
}

fn requested_pixels_per_mm(args: &CalibrationSetArgs) -> Result<f64, CliError> {
    match (args.width_px, args.pixels_per_mm) {
        (Some(width), _) if width < DEFAULT_MIN_WIDTH_PX => Err(CliError::User(format!(
            "--width-px must be at least {DEFAULT_MIN_WIDTH_PX}, got {width}"
        ))),
        (Some(width), _) => Ok(pixels_per_mm_from_width(width)),
        (None, Some(value)) => Ok(value),
        (None, None) => Err(CliError::User(
            "specify --width-px or --pixels-per-mm".to_string(),
        )),
    }
}

// ──────────────────── charts & config ────────────────────

fn chart_json(variant: ChartVariant) -> Value {
    let lines: Vec<Value> = variant
        .lines()
        .iter()
        .map(|line| {
            json!({
                "acuity": line.acuity,
                "height_mm": line.height_mm,
                "glyphs": line.glyphs,
            })
        })
        .collect();
    json!({
        "id": variant.id(),
        "title": variant.title(),
        "rotatable": variant.is_rotatable(),
        "glyph_count": variant.glyph_count(),
        "lines": lines,
    })
}

fn run_charts(cli: &Cli) -> Result<(), CliError> {
    match output_mode(cli) {
        OutputMode::Human => {
            for variant in ChartVariant::ALL {
                println!(
                    "{}  {} ({} lines, {} optotypes)",
                    format!("{:<10}", variant.id()).bold(),
                    variant.title(),
                    variant.lines().len(),
                    variant.glyph_count()
                );
                for line in variant.lines() {
                    println!(
                        "    {:<5} {:>5.1} mm  {}",
                        line.acuity,
                        line.height_mm,
                        line.glyphs.join(" ")
                    );
                }
            }
        }
        OutputMode::Json => {
            let charts: Vec<Value> = ChartVariant::ALL.into_iter().map(chart_json).collect();
            write_json_line(&json!({
                "command": "charts",
                "charts": charts,
            }))?;
        }
    }
    Ok(())
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Show) => {
            let config = load_config(cli)?;
            match output_mode(cli) {
                OutputMode::Human => println!("{}", config.to_toml()?),
                OutputMode::Json => {
                    let value = serde_json::to_value(&config)?;
                    write_json_line(&json!({
                        "command": "config show",
                        "config": value,
                    }))?;
                }
            }
            Ok(())
        }
    }
}

// ──────────────────── output ────────────────────

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("ACUITY_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}
