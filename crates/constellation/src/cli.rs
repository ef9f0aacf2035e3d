//! Command-line interface.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use constellation_core::{transform, ColorFormat};

use crate::config::{FileConfig, Overrides, ThemeSetting};
use crate::report::{render_json, render_text, Outcome};

#[derive(Debug, Parser)]
#[command(name = "constellation")]
#[command(version)]
#[command(about = "Keep derived color formats in sync with the HEX colors of a stylesheet")]
#[command(long_about = "Constellation\n\n\
    Finds every HEX color declaration in a CSS file and writes a marked block of \
    derived formats (rgb, hsl, hwb, lab, oklch, display-p3, hover/active shades, \
    contrast) right after it. Re-running only touches blocks whose HEX changed.")]
pub struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate or refresh derived color blocks in a stylesheet
    Transform(TransformArgs),
}

#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Stylesheet to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the result (defaults to INPUT)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Theme used when a color's luminance is not decisive
    #[arg(short, long, value_enum)]
    pub theme: Option<ThemeSetting>,

    /// Regenerate every block, even current ones
    #[arg(short, long, overrides_with = "no_force")]
    pub force: bool,

    /// Do not force, even if the config file says so
    #[arg(long, overrides_with = "force")]
    pub no_force: bool,

    /// Formats to derive, comma separated
    #[arg(long, value_delimiter = ',', value_name = "FORMAT,...")]
    pub formats: Option<Vec<ColorFormat>>,

    /// YAML config file (defaults to constellation.yaml next to INPUT)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write nothing; exit with status 1 if the file would change
    #[arg(long)]
    pub check: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Clean,
    /// `--check` found pending changes.
    PendingChanges,
}

/// Initializes `env_logger` at a level picked by `-v` count.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Runs a parsed command line and prints its summary to stdout.
pub fn run(cli: Cli) -> Result<Status> {
    match cli.command {
        Commands::Transform(args) => {
            let (status, summary) = run_transform(&args, cli.verbose > 0)?;
            print!("{}", summary);
            Ok(status)
        }
    }
}

/// Runs `transform` and returns its status with the rendered summary.
pub fn run_transform(args: &TransformArgs, verbose: bool) -> Result<(Status, String)> {
    let file_config = FileConfig::locate(args.config.as_deref(), &args.input)?
        .map(|(_, config)| config)
        .unwrap_or_default();
    let options = file_config.merge(&Overrides {
        theme: args.theme,
        force: force_flag(args),
        formats: args.formats.clone(),
    });
    log::debug!("options: {:?}", options);

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let result = transform(&input, &options)
        .with_context(|| format!("failed to transform {}", args.input.display()))?;

    let output = args.output.as_ref().unwrap_or(&args.input);
    let must_write = result.is_modified() || output != &args.input;

    let (status, outcome) = if args.check {
        if result.is_modified() {
            (Status::PendingChanges, Outcome::WouldChange)
        } else {
            (Status::Clean, Outcome::UpToDate)
        }
    } else if must_write {
        fs::write(output, &result.text)
            .with_context(|| format!("failed to write {}", output.display()))?;
        log::info!("wrote {}", output.display());
        (Status::Clean, Outcome::Written)
    } else {
        (Status::Clean, Outcome::UpToDate)
    };

    let summary = if args.json {
        let mut json = render_json(&result, output, outcome)?;
        json.push('\n');
        json
    } else {
        render_text(&result, output, outcome, verbose)
    };
    Ok((status, summary))
}

fn force_flag(args: &TransformArgs) -> Option<bool> {
    if args.force {
        Some(true)
    } else if args.no_force {
        Some(false)
    } else {
        None
    }
}
