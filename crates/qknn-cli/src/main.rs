//! qknn Command-Line Interface
//!
//! Classifies a labelled CSV dataset with the quantum k-nearest-neighbours
//! algorithm on a local simulator.
//!
//! ```text
//! qknn                                  # default pipeline on HTRU_2.csv
//! qknn run --synthetic --backend statevector_simulator --format json
//! qknn circuits --dataset pulsars.csv --neighbors 5
//! qknn backends
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{ExperimentArgs, OutputFormat};
use commands::{backends, circuits, run, version};
use qknn_core::QknnConfig;

/// qknn - quantum k-nearest-neighbours classification
#[derive(Parser)]
#[command(name = "qknn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = "QKNN_CONFIG")]
    config: Option<PathBuf>,

    /// Log format (console, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode, fit and test a classifier (default)
    Run {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the swap-test circuits and contrasts for the test samples
    Circuits {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List available backends
    Backends,

    /// Show version information
    Version,
}

fn init_logging(verbose: u8, config: &QknnConfig, log_format: Option<&str>) {
    let filter = match verbose {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_format.unwrap_or(config.logging.format.as_str()) {
        "json" => builder.json().init(),
        _ => builder.init(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match QknnConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };
    init_logging(cli.verbose, &config, cli.log_format.as_deref());

    // Execute command
    let result = match cli.command {
        None => run::execute(config, &ExperimentArgs::default(), OutputFormat::Table),

        Some(Commands::Run { experiment, format }) => run::execute(config, &experiment, format),

        Some(Commands::Circuits { experiment, format }) => {
            circuits::execute(config, &experiment, format)
        }

        Some(Commands::Backends) => backends::execute(),

        Some(Commands::Version) => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
