// rimscan/src/main.rs

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::{LogLevel, init_logging};

#[derive(Parser)]
#[command(name = "rimscan", version, about = "Filesystem shape statistics", long_about = None)]
struct Cli {
    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Print per-directory progress and debug records
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a tree and save its statistics
    Scan {
        /// Roots as `path` or `path:depth`. Defaults to the config roots, then
        /// to the built-in system roots.
        roots: Vec<String>,
        /// Scan config path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output path
        #[arg(short, long, default_value = "fsstats.toml")]
        output: PathBuf,
        /// Save cooked statistics instead of raw counts
        #[arg(long)]
        cook: bool,
        /// Additional extension to leave out (repeatable)
        #[arg(short = 'x', long = "exclude")]
        exclude: Vec<String>,
        /// Fail if any directory could not be read
        #[arg(long)]
        strict: bool,
    },
    /// Cook raw statistics into fractions
    Cook {
        /// Raw statistics path
        input: PathBuf,
        /// Output path
        #[arg(short, long, default_value = "fsstats-cooked.toml")]
        output: PathBuf,
    },
    /// Export every distribution as `key,value` CSV
    Export {
        /// Statistics path (raw or cooked)
        input: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "fsstats-csv")]
        dir: PathBuf,
    },
    /// Print a summary of saved statistics
    Show {
        /// Statistics path (raw or cooked)
        input: PathBuf,
        /// Also print every entry
        #[arg(long)]
        full: bool,
    },
    /// Compare two statistics files, cooking raw ones first
    Compare {
        reference: PathBuf,
        candidate: PathBuf,
        /// Fail if a distribution differs by more than this total variation
        #[arg(long)]
        max_tv: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(LogLevel::from_flags(cli.quiet, cli.verbose));

    match cli.command {
        Commands::Scan {
            roots,
            config,
            output,
            cook,
            exclude,
            strict,
        } => commands::scan(commands::ScanArgs {
            roots,
            config,
            output,
            cook,
            exclude,
            strict,
        })?,
        Commands::Cook { input, output } => commands::cook(&input, &output)?,
        Commands::Export { input, dir } => commands::export(&input, &dir)?,
        Commands::Show { input, full } => commands::show(&input, full)?,
        Commands::Compare {
            reference,
            candidate,
            max_tv,
        } => commands::compare(&reference, &candidate, max_tv)?,
    }

    Ok(())
}
