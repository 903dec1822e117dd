//! The SP800-90B restart sanity test.
//!
//! One run is a straight pipeline:
//!
//! ```text
//! matrix → frequency scan → Xmax → tail probability → verdict
//! ```
//!
//! The run is deterministic and single-threaded. Nothing outlives the
//! returned [`RestartReport`].

mod config;
mod tail;
mod verdict;

pub use config::{
    ConfigError, FileConfig, OutputConfig, RestartConfig, DEFAULT_H_I, MIN_PRECISION_DIGITS,
};
pub use tail::{TailProbability, SAMPLE_SIZE};
pub use verdict::{RestartReport, Verdict, ALPHA};

use crate::arith::{ArithError, BigFloat};
use crate::matrix::{FrequencyScan, MatrixError, SymbolMatrix};
use std::path::Path;
use thiserror::Error;

/// Errors that abort a restart test run.
#[derive(Debug, Error)]
pub enum RestartError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Arith(#[from] ArithError),
}

/// Runs the restart sanity test with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct RestartTest {
    config: RestartConfig,
}

impl RestartTest {
    /// Creates a test after validating its configuration.
    pub fn new(config: RestartConfig) -> Result<Self, RestartError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Loads a matrix file and runs the test on it.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<RestartReport, RestartError> {
        let matrix = SymbolMatrix::load(path)?;
        self.run(&matrix)
    }

    /// Runs the test on an in-memory matrix.
    pub fn run(&self, matrix: &SymbolMatrix) -> Result<RestartReport, RestartError> {
        let precision = self.config.precision();
        let h_i = self.config.h_i;

        let bits_per_symbol = matrix.bits_per_symbol();
        if h_i > f64::from(bits_per_symbol) {
            tracing::warn!(
                h_i,
                bits_per_symbol,
                "Entropy estimate exceeds the detected bits per symbol"
            );
        }

        let scan = FrequencyScan::scan(matrix);
        let xmax = scan.xmax();

        tracing::debug!(xmax, precision_bits = precision.bits(), "Computing P(X >= Xmax)");
        let tail = TailProbability::from_entropy(h_i, precision)?;
        let tail_probability = tail.upper_tail(xmax);

        let alpha = BigFloat::from_f64(ALPHA, precision)?;
        let verdict = Verdict::from_tail(&tail_probability, &alpha);

        let report = RestartReport {
            bits_per_symbol,
            h_i,
            alpha,
            p: tail.p().clone(),
            row_max_max: scan.row_max_max,
            column_max_max: scan.column_max_max,
            xmax,
            tail_probability,
            verdict,
        };
        report.log();

        Ok(report)
    }
}
