//! Arbitrary-precision binary floating point.
//!
//! [`BigFloat`] wraps an MPFR float from `rug`. Every operation is
//! correctly rounded to nearest at the working [`Precision`], and MPFR's
//! exponent range reaches far below `f64::MIN_POSITIVE`, so a power such as
//! `2^-8000` keeps its full relative precision.

use super::ArithError;
use num::bigint::BigUint;
use rug::integer::Order;
use rug::ops::Pow;
use rug::{Float, Integer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Working precision used when none is configured, in decimal digits.
pub const DEFAULT_PRECISION_DIGITS: u32 = 2000;

/// Significant digits rendered by `Display` when the formatter gives none.
const DEFAULT_DISPLAY_DIGITS: usize = 6;

/// Mantissa width of a [`BigFloat`], in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision {
    bits: u32,
}

impl Precision {
    /// Converts a decimal digit count to bits, rounding up.
    pub fn from_digits(digits: u32) -> Self {
        let bits = (f64::from(digits) * std::f64::consts::LOG2_10).ceil() as u32;
        Self::from_bits(bits)
    }

    /// Creates a precision of exactly `bits` mantissa bits, clamped to the
    /// range MPFR supports (and at least 2).
    pub fn from_bits(bits: u32) -> Self {
        Self {
            bits: bits.clamp(2, rug::float::prec_max()),
        }
    }

    /// Returns the mantissa width in bits.
    #[inline]
    pub fn bits(self) -> u32 {
        self.bits
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::from_digits(DEFAULT_PRECISION_DIGITS)
    }
}

/// Arbitrary-precision binary floating-point number.
#[derive(Clone)]
pub struct BigFloat {
    value: Float,
}

impl BigFloat {
    /// Zero at the given precision.
    pub fn zero(precision: Precision) -> Self {
        Self {
            value: Float::new(precision.bits()),
        }
    }

    /// One at the given precision.
    pub fn one(precision: Precision) -> Self {
        Self::from_u64(1, precision)
    }

    /// Converts an integer, rounding if it is wider than `precision`.
    pub fn from_u64(value: u64, precision: Precision) -> Self {
        Self {
            value: Float::with_val(precision.bits(), value),
        }
    }

    /// Converts a big integer, rounding if it is wider than `precision`.
    pub fn from_biguint(value: &BigUint, precision: Precision) -> Self {
        let integer = Integer::from_digits(&value.to_u64_digits(), Order::Lsf);
        Self {
            value: Float::with_val(precision.bits(), &integer),
        }
    }

    /// Converts a finite `f64`. Exact whenever `precision` has at least 53 bits.
    pub fn from_f64(value: f64, precision: Precision) -> Result<Self, ArithError> {
        if !value.is_finite() {
            return Err(ArithError::NonFinite(value));
        }
        Ok(Self {
            value: Float::with_val(precision.bits(), value),
        })
    }

    /// Computes `2^x` for a finite `x`, correctly rounded.
    ///
    /// `x` is taken as the exact binary value of the double, so the only
    /// rounding is the final one to `precision`.
    pub fn exp2(x: f64, precision: Precision) -> Result<Self, ArithError> {
        let exponent = Self::from_f64(x, Precision::from_bits(f64::MANTISSA_DIGITS))?;
        Ok(Self {
            value: Float::with_val(precision.bits(), exponent.value.exp2_ref()),
        })
    }

    /// Returns the working precision.
    #[inline]
    pub fn precision(&self) -> Precision {
        Precision::from_bits(self.value.prec())
    }

    /// Returns true for positive or negative zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true for values strictly below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.value.cmp0() == Some(Ordering::Less)
    }

    /// Returns true unless the value is infinite or NaN.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }

    /// Re-rounds to a different precision.
    pub fn with_precision(&self, precision: Precision) -> Self {
        Self {
            value: Float::with_val(precision.bits(), &self.value),
        }
    }

    /// Multiplies by `2^k` exactly.
    pub fn mul_pow2(&self, k: i32) -> Self {
        let mut value = self.value.clone();
        value <<= k;
        Self { value }
    }

    /// Raises to a non-negative integer power. `x^0` is one, including `0^0`.
    pub fn powi(&self, exponent: u32) -> Self {
        Self {
            value: Float::with_val(self.value.prec(), (&self.value).pow(exponent)),
        }
    }

    /// Nearest `f64`, flushing to zero or infinity outside its range.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64()
    }

    /// Returns `significant` decimal digits and the power of ten of the
    /// first one, so that `|self| ~= d.ddd * 10^exp`. The sign is dropped.
    /// Zero and non-finite values give all-zero digits and exponent 0.
    pub fn to_decimal(&self, significant: usize) -> (String, i64) {
        let significant = significant.max(1);
        if self.is_zero() || !self.is_finite() {
            return ("0".repeat(significant), 0);
        }
        let (_, digits, exponent) = self.value.to_sign_string_exp(10, Some(significant));
        (digits, i64::from(exponent.unwrap_or(1)) - 1)
    }

    /// Renders like C's `%g`: fixed notation for moderate exponents,
    /// scientific otherwise, trailing zeros removed.
    fn to_general_string(&self, significant: usize) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        if self.value.is_nan() {
            return "nan".to_string();
        }
        if self.value.is_infinite() {
            let sign = if self.is_negative() { "-" } else { "" };
            return format!("{sign}inf");
        }

        let (digits, exp10) = self.to_decimal(significant);
        let sign = if self.is_negative() { "-" } else { "" };

        let body = if exp10 < -4 || exp10 >= significant as i64 {
            let (lead, rest) = digits.split_at(1);
            let rest = rest.trim_end_matches('0');
            let exp_sign = if exp10 < 0 { '-' } else { '+' };
            let exp_abs = exp10.unsigned_abs();
            if rest.is_empty() {
                format!("{lead}e{exp_sign}{exp_abs:02}")
            } else {
                format!("{lead}.{rest}e{exp_sign}{exp_abs:02}")
            }
        } else if exp10 >= 0 {
            let (int, frac) = digits.split_at(exp10 as usize + 1);
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{int}.{frac}")
            }
        } else {
            let zeros = "0".repeat((-exp10 - 1) as usize);
            format!("0.{zeros}{}", digits.trim_end_matches('0'))
        };

        format!("{sign}{body}")
    }
}
}

/// Result precision of a binary operation: the wider of the two operands.
fn result_bits(a: &BigFloat, b: &BigFloat) -> u32 {
    a.value.prec().max(b.value.prec())
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&BigFloat> for &BigFloat {
            type Output = BigFloat;
            fn $method(self, rhs: &BigFloat) -> BigFloat {
                BigFloat {
                    value: Float::with_val(result_bits(self, rhs), &self.value $op &rhs.value),
                }
            }
        }

        impl $trait<&BigFloat> for BigFloat {
            type Output = BigFloat;
            fn $method(self, rhs: &BigFloat) -> BigFloat {
                &self $op rhs
            }
        }

        impl $trait<BigFloat> for BigFloat {
            type Output = BigFloat;
            fn $method(self, rhs: BigFloat) -> BigFloat {
                &self $op &rhs
            }
        }
    };
}

forward_binop!(Add, add, +);
forward_binop!(Sub, sub, -);
forward_binop!(Mul, mul, *);

// Division by zero follows IEEE 754: a signed infinity, or NaN for 0 / 0.
forward_binop!(Div, div, /);

impl AddAssign<&BigFloat> for BigFloat {
    /// Keeps the precision of `self`.
    fn add_assign(&mut self, rhs: &BigFloat) {
        self.value += &rhs.value;
    }
}

impl Neg for &BigFloat {
    type Output = BigFloat;
    fn neg(self) -> BigFloat {
        BigFloat {
            value: -self.value.clone(),
        }
    }
}

impl Neg for BigFloat {
    type Output = BigFloat;
    fn neg(self) -> BigFloat {
        BigFloat { value: -self.value }
    }
}

/// Compares values regardless of precision. NaN is unordered.
impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl fmt::Display for BigFloat {
    /// The formatter precision selects significant digits (default 6).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let significant = f.precision().unwrap_or(DEFAULT_DISPLAY_DIGITS).max(1);
        let rendered = self.to_general_string(significant);
        match f.width() {
            Some(width) => write!(f, "{rendered:>width$}"),
            None => f.write_str(&rendered),
        }
    }
}

impl fmt::Debug for BigFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigFloat")
            .field("value", &format_args!("{:.20}", self))
            .field("precision_bits", &self.value.prec())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prec() -> Precision {
        Precision::from_digits(100)
    }

    #[test]
    fn test_precision_from_digits() {
        assert_eq!(Precision::default().bits(), 6644);
        assert_eq!(Precision::from_digits(100).bits(), 333);
        assert_eq!(Precision::from_bits(0).bits(), 2);
        assert_eq!(BigFloat::one(Precision::default()).precision(), Precision::default());
    }

    #[test]
    fn test_integer_arithmetic_is_exact() {
        let three = BigFloat::from_u64(3, prec());
        let seven = BigFloat::from_u64(7, prec());

        let product = &three * &seven;
        assert_eq!(product, BigFloat::from_u64(21, prec()));
        assert_eq!(&product / &seven, three);
        assert_eq!(&product - &three, BigFloat::from_u64(18, prec()));
        assert!((&three - &seven).is_negative());
    }

    #[test]
    fn test_division_rounds_within_precision() {
        let one = BigFloat::one(prec());
        let third = &one / &BigFloat::from_u64(3, prec());
        let error = &(&third * &BigFloat::from_u64(3, prec())) - &one;

        let magnitude = if error.is_negative() { -&error } else { error };
        assert!(magnitude < one.mul_pow2(-(prec().bits() as i32 - 2)));
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        let zero = BigFloat::zero(prec());
        let quotient = &BigFloat::one(prec()) / &zero;

        assert!(!quotient.is_finite());
        assert!(!quotient.is_negative());
        assert_eq!(format!("{}", quotient), "inf");
        assert_eq!(format!("{}", -quotient), "-inf");
        assert_eq!(format!("{}", &zero / &zero), "nan");
    }

    #[test]
    fn test_rounding_to_precision() {
        let narrow = Precision::from_bits(4);
        // 0b10011 = 19 sits halfway between 18 and 20; the tie goes to the
        // even mantissa 0b1010.
        assert_eq!(
            BigFloat::from_u64(19, narrow),
            BigFloat::from_u64(20, Precision::from_bits(64))
        );
        // 0b11111 = 31 carries into a fifth bit and renormalizes to 32.
        assert_eq!(
            BigFloat::from_u64(31, narrow),
            BigFloat::from_u64(32, Precision::from_bits(64))
        );
    }

    #[test]
    fn test_tiny_powers_do_not_underflow() {
        let p = BigFloat::one(prec()).mul_pow2(-8);
        let tiny = p.powi(1000);

        assert!(!tiny.is_zero());
        assert_eq!(tiny, BigFloat::one(prec()).mul_pow2(-8000));
        assert_eq!(tiny.to_f64(), 0.0);
        assert_eq!(format!("{}", tiny), "5.75486e-2409");
    }

    #[test]
    fn test_add_disparate_magnitudes() {
        let one = BigFloat::one(prec());
        let tiny = one.mul_pow2(-10_000);

        assert_eq!(&one + &tiny, one);
        assert_eq!(&tiny + &tiny, tiny.mul_pow2(1));
        assert_eq!(&tiny + &BigFloat::zero(prec()), tiny);
    }

    #[test]
    fn test_from_f64_is_exact() {
        let value = BigFloat::from_f64(0.000005, prec()).unwrap();
        assert_eq!(value.to_f64(), 0.000005);

        let negative = BigFloat::from_f64(-2.5, prec()).unwrap();
        assert!(negative.is_negative());
        assert_eq!(negative.to_f64(), -2.5);

        assert!(matches!(
            BigFloat::from_f64(f64::NAN, prec()),
            Err(ArithError::NonFinite(_))
        ));
    }

    #[test]
    fn test_from_biguint_spans_several_words() {
        let wide = (BigUint::from(1u32) << 200u32) + BigUint::from(12_345u32);
        let expected = &BigFloat::one(prec()).mul_pow2(200) + &BigFloat::from_u64(12_345, prec());
        assert_eq!(BigFloat::from_biguint(&wide, prec()), expected);
    }

    #[test]
    fn test_powi() {
        let two = BigFloat::from_u64(2, prec());
        assert_eq!(two.powi(0), BigFloat::one(prec()));
        assert_eq!(two.powi(10), BigFloat::from_u64(1024, prec()));
        assert_eq!(BigFloat::zero(prec()).powi(0), BigFloat::one(prec()));
        assert!(BigFloat::zero(prec()).powi(3).is_zero());
    }

    #[test]
    fn test_exp2_integer_exponents_are_exact() {
        let precision = Precision::default();
        let one = BigFloat::one(precision);

        assert_eq!(BigFloat::exp2(0.0, precision).unwrap(), one);
        assert_eq!(BigFloat::exp2(-1.0, precision).unwrap(), one.mul_pow2(-1));
        assert_eq!(BigFloat::exp2(3.0, precision).unwrap(), one.mul_pow2(3));
        assert_eq!(BigFloat::exp2(-8.0, precision).unwrap(), one.mul_pow2(-8));
    }

    #[test]
    fn test_exp2_small_exponents_keep_full_precision() {
        // Exponents in (-0.5, 0) whose offset from an integer is not a
        // double; references are the exact doubles -0.05 and -0.3 at 2100
        // digits.
        let precision = Precision::default();
        let cases = [
            (-0.05f64, "0.965936328924845549206808486047680914022731174"),
            (-0.3, "0.812252396356235528860381123394764475678305629"),
        ];
        for (x, expected) in cases {
            let value = BigFloat::exp2(x, precision).unwrap();
            assert_eq!(format!("{:.45}", value), expected, "2^{}", x);
        }
    }

    #[test]
    fn test_exp2_square_root_of_two_squares_back() {
        let precision = Precision::default();
        let root = BigFloat::exp2(-0.5, precision).unwrap();
        let half = BigFloat::one(precision).mul_pow2(-1);

        let error = &(&root * &root) - &half;
        let magnitude = if error.is_negative() { -error } else { error };
        assert!(magnitude < half.mul_pow2(-(precision.bits() as i32 - 8)));
    }

    #[test]
    fn test_exp2_default_entropy_probability_digits() {
        let p = BigFloat::exp2(-0.8, Precision::default()).unwrap();
        assert_eq!(format!("{}", p), "0.574349");
        assert_eq!(format!("{:.20}", p), "0.57434917749851748572");
    }

    #[test]
    fn test_exp2_non_finite_rejected() {
        assert!(matches!(
            BigFloat::exp2(f64::INFINITY, Precision::default()),
            Err(ArithError::NonFinite(_))
        ));
    }

    #[test]
    fn test_display_general_format() {
        let one = BigFloat::one(prec());
        let half = one.mul_pow2(-1);
        let third = &one / &BigFloat::from_u64(3, prec());

        assert_eq!(format!("{}", one), "1");
        assert_eq!(format!("{}", half), "0.5");
        assert_eq!(format!("{}", BigFloat::zero(prec())), "0");
        assert_eq!(format!("{}", BigFloat::from_f64(0.000005, prec()).unwrap()), "5e-06");
        assert_eq!(format!("{}", BigFloat::from_u64(123_456_789, prec())), "1.23457e+08");
        assert_eq!(format!("{}", BigFloat::from_u64(999_999_6, prec())), "1e+07");
        assert_eq!(format!("{:.3}", third), "0.333");
        assert_eq!(format!("{}", -&third), "-0.333333");
        assert_eq!(format!("{:>8}", half), "     0.5");
    }

    #[test]
    fn test_to_decimal_digits() {
        let value = BigFloat::from_u64(1000, prec());
        assert_eq!(value.to_decimal(4), ("1000".to_string(), 3));

        let ratio = &BigFloat::from_u64(2, prec()) / &BigFloat::from_u64(3, prec());
        assert_eq!(ratio.to_decimal(5), ("66667".to_string(), -1));
    }

    #[test]
    fn test_ordering() {
        let small = BigFloat::from_f64(1e-300, prec()).unwrap();
        let large = BigFloat::from_u64(1, prec());

        assert!(small < large);
        assert!(-&large < small);
        assert_eq!(
            BigFloat::from_u64(5, prec()),
            BigFloat::from_u64(5, Precision::from_digits(2000))
        );

        let nan = &BigFloat::zero(prec()) / &BigFloat::zero(prec());
        assert_eq!(nan.partial_cmp(&large), None);
    }
}
