//! Pass/fail decision and the results report.

use crate::arith::BigFloat;
use std::fmt;

/// Significance level of the restart test.
pub const ALPHA: f64 = 0.000005;

/// Outcome of the restart sanity test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The restart data is consistent with the claimed entropy.
    Pass,
    /// The observed repeats are too unlikely under the claimed entropy.
    Fail,
}

impl Verdict {
    /// Fails when the tail probability falls strictly below `alpha`.
    pub fn from_tail(tail_probability: &BigFloat, alpha: &BigFloat) -> Self {
        if tail_probability < alpha {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }

    /// Returns true for [`Verdict::Pass`].
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        })
    }
}

/// Everything observed and derived in one restart test run.
#[derive(Debug, Clone)]
pub struct RestartReport {
    /// Detected symbol width of the matrix.
    pub bits_per_symbol: u8,
    /// Claimed min-entropy per symbol.
    pub h_i: f64,
    /// Significance level, at working precision.
    pub alpha: BigFloat,
    /// Probability of the most likely symbol, `2^-H_I`.
    pub p: BigFloat,
    /// Largest per-row repeat count.
    pub row_max_max: u32,
    /// Largest per-column repeat count.
    pub column_max_max: u32,
    /// The test statistic.
    pub xmax: u32,
    /// `P(X >= Xmax)`.
    pub tail_probability: BigFloat,
    /// Outcome.
    pub verdict: Verdict,
}

impl RestartReport {
    /// Emits the report as a structured tracing event.
    pub fn log(&self) {
        tracing::info!(
            bits_per_symbol = self.bits_per_symbol,
            h_i = self.h_i,
            alpha = %self.alpha,
            p = %self.p,
            row_max_max = self.row_max_max,
            column_max_max = self.column_max_max,
            xmax = self.xmax,
            tail_probability = %self.tail_probability,
            verdict = %self.verdict,
            "Restart sanity test complete"
        );
    }
}

impl fmt::Display for RestartReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn line(f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display) -> fmt::Result {
            writeln!(f, "{:>18}{:>8}", label, value)
        }

        writeln!(f, "    ---- Results -----")?;
        line(f, "Bits per symbol = ", &self.bits_per_symbol)?;
        line(f, "H_I = ", &self.h_i)?;
        line(f, "alpha = ", &ALPHA)?;
        line(f, "p = ", &self.p)?;
        line(f, "row_max_max = ", &self.row_max_max)?;
        line(f, "column_max_max = ", &self.column_max_max)?;
        line(f, "Xmax = ", &self.xmax)?;
        line(f, "P(x => xmax) = ", &self.tail_probability)?;
        line(f, "Result = ", &self.verdict)
    }
}
