//! Arbitrary-precision arithmetic for the restart tail sum.
//!
//! The tail probability multiplies binomial coefficients near 10^300 by
//! probability powers that can fall below 10^-2400. Neither fits in an
//! `f64`, so every step of the sum runs on [`BigFloat`], an MPFR float with
//! a working precision fixed for the whole run. Binomial coefficients are
//! exact big integers until they enter the sum.

mod binomial;
mod float;

pub use binomial::{choose, BinomialSweep};
pub use float::{BigFloat, Precision, DEFAULT_PRECISION_DIGITS};

use thiserror::Error;

/// Errors raised when converting into the arbitrary-precision domain.
#[derive(Debug, Clone, Error)]
pub enum ArithError {
    #[error("value {0} is not finite")]
    NonFinite(f64),
}
