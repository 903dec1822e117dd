//! Restart Sanity Test CLI
//!
//! Runs the SP800-90B restart sanity test on a restart matrix file and
//! prints the results to stderr.

use clap::Parser;
use restart_sanity::{FileConfig, RestartTest};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "restart-sanity")]
#[command(about = "Perform the SP800-90B restart sanity test on a restart matrix file")]
#[command(version = restart_sanity::VERSION)]
struct Cli {
    /// Restart matrix: 1,000,000 bytes, one symbol per byte, row-major
    file: PathBuf,

    /// Initial entropy estimate in bits per symbol [default: 0.8]
    #[arg(short = 'e', long = "H_I", value_name = "H_I")]
    h_i: Option<f64>,

    /// Output information to stderr, including every tail term
    #[arg(short, long)]
    verbose: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Working precision of the tail sum in decimal digits [default: 2000]
    #[arg(long, value_name = "DIGITS")]
    precision: Option<u32>,
}

fn main() {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    init_tracing(cli.verbose || file_config.output.verbose);
    debug!("Verbose mode enabled");

    let mut config = file_config.restart;
    if let Some(h_i) = cli.h_i {
        config.h_i = h_i;
    }
    if let Some(digits) = cli.precision {
        config.precision_digits = digits;
    }

    let test = match RestartTest::new(config) {
        Ok(test) => test,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    debug!(path = %cli.file.display(), "Reading binary data from file");

    match test.run_file(&cli.file) {
        Ok(report) => {
            eprintln!();
            eprint!("{}", report);
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

/// Logs to stderr; WARN by default so the results block stands alone.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}
