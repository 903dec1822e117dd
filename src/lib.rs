//! Restart Sanity Test Library
//!
//! An implementation of the NIST SP800-90B restart sanity test. The input
//! is a matrix of symbols captured by restarting an entropy source 1000
//! times and recording 1000 symbols after each restart. The test checks
//! whether any symbol repeats more often down a row or a column than the
//! claimed min-entropy can explain.
//!
//! # Architecture
//!
//! The test is a single sequential pipeline:
//!
//! ```text
//! matrix → frequency scan → Xmax → tail probability → verdict
//!               ↑                        ↑
//!          (per-line counts)     arith (exact binomial sum)
//! ```
//!
//! # Design Principles
//!
//! - **Exact tail sum**: every term is computed in arbitrary precision, so
//!   probabilities far below `f64` range never underflow
//! - **Fixed geometry**: 1000 x 1000 symbols, alpha = 0.000005
//! - **Fail on bad input**: short or oversized files are errors, never padded
//!
//! # Example
//!
//! ```no_run
//! use restart_sanity::{RestartConfig, RestartTest};
//!
//! let test = RestartTest::new(RestartConfig::with_entropy(0.8)).unwrap();
//! let report = test.run_file("restart_matrix.bin").unwrap();
//!
//! eprintln!("{}", report);
//! if !report.verdict.is_pass() {
//!     eprintln!("restart data is inconsistent with H_I = {}", report.h_i);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod arith;
pub mod matrix;
pub mod restart;

// Re-export commonly used types at crate root
pub use arith::{BigFloat, Precision};
pub use matrix::{FrequencyScan, MatrixError, SymbolMatrix};
pub use restart::{
    FileConfig, RestartConfig, RestartError, RestartReport, RestartTest, TailProbability, Verdict,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
