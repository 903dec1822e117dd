//! Binomial upper-tail probability.
//!
//! Under the restart model every line of the matrix is 1000 independent
//! draws, and the most likely symbol turns up with probability `p = 2^-H_I`
//! on each draw. The chance of seeing it `Xmax` or more times is the upper
//! tail of Binomial(1000, p), summed term by term in arbitrary precision.

use crate::arith::{ArithError, BigFloat, BinomialSweep, Precision};

/// Draws per line, the `n` of the binomial model.
pub const SAMPLE_SIZE: u32 = 1000;

/// Computes `P(X >= x)` for `X ~ Binomial(n, p)`.
#[derive(Debug, Clone)]
pub struct TailProbability {
    n: u32,
    p: BigFloat,
    q: BigFloat,
}

impl TailProbability {
    /// Uses the fixed sample size of a restart matrix.
    pub fn new(p: BigFloat) -> Self {
        Self::with_sample_size(p, SAMPLE_SIZE)
    }

    /// Uses an explicit number of draws.
    pub fn with_sample_size(p: BigFloat, n: u32) -> Self {
        let q = &BigFloat::one(p.precision()) - &p;
        Self { n, p, q }
    }

    /// Derives `p = 2^-h_i` from a min-entropy estimate in bits per symbol.
    pub fn from_entropy(h_i: f64, precision: Precision) -> Result<Self, ArithError> {
        Ok(Self::new(BigFloat::exp2(-h_i, precision)?))
    }

    /// Per-draw probability of the most likely symbol.
    #[inline]
    pub fn p(&self) -> &BigFloat {
        &self.p
    }

    /// `sum_{j=xmax}^{n} C(n, j) * p^j * (1 - p)^(n - j)`.
    ///
    /// Every term is non-negative, so the running sum never decreases.
    /// Returns one (to working precision) for `xmax = 0` and zero when
    /// `xmax > n`.
    pub fn upper_tail(&self, xmax: u32) -> BigFloat {
        let precision = self.p.precision();
        let mut bigp = BigFloat::zero(precision);

        let coefficients = BinomialSweep::new(u64::from(self.n), u64::from(xmax));
        for (j, (_, coefficient)) in (xmax..=self.n).zip(coefficients) {
            let first = BigFloat::from_biguint(&coefficient, precision);
            let second = self.p.powi(j);
            let third = self.q.powi(self.n - j);

            let increment = &(&first * &second) * &third;
            bigp += &increment;

            tracing::debug!(
                j,
                bigp = %bigp,
                bigp_increment = %increment,
                choose = %first,
                p_pow_j = %second,
                q_pow_n_minus_j = %third,
                "Tail term"
            );
        }

        bigp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::choose;
    use num::bigint::BigUint;
    use num::traits::{One, Zero};
    use proptest::prelude::*;

    fn half(precision: Precision) -> BigFloat {
        BigFloat::one(precision).mul_pow2(-1)
    }

    /// Independent C(n, k) via the smaller of k and n - k.
    fn reference_binomial(n: u64, k: u64) -> BigUint {
        let k = k.min(n - k);
        let mut result = BigUint::one();
        for i in 0..k {
            result *= n - i;
            result /= i + 1;
        }
        result
    }

    #[test]
    fn test_full_range_sums_to_one() {
        let precision = Precision::from_digits(300);
        let tail = TailProbability::from_entropy(0.8, precision).unwrap();

        let total = tail.upper_tail(0);
        let error = &total - &BigFloat::one(precision);
        let magnitude = if error.is_negative() { -error } else { error };
        assert!(magnitude < BigFloat::one(precision).mul_pow2(-(precision.bits() as i32 - 16)));
    }

    #[test]
    fn test_empty_range_is_zero() {
        let tail = TailProbability::new(half(Precision::from_digits(100)));
        assert!(tail.upper_tail(1001).is_zero());
        assert!(tail.upper_tail(5000).is_zero());
    }

    #[test]
    fn test_single_term_at_sample_size() {
        let precision = Precision::default();
        let tail = TailProbability::from_entropy(0.8, precision).unwrap();

        let top = tail.upper_tail(SAMPLE_SIZE);
        assert_eq!(top, tail.p().powi(1000));
        assert_eq!(format!("{:.20}", top), "1.4996968138955847913e-241");
    }

    #[test]
    fn test_fair_coin_tail_is_exact() {
        // With p = 1/2 every term is C(1000, j) / 2^1000, which fits the
        // default precision without rounding.
        let precision = Precision::default();
        let tail = TailProbability::from_entropy(1.0, precision).unwrap();
        assert_eq!(tail.p(), &half(precision));

        for xmax in [50u32, 500, 600, 999] {
            let numerator = (u64::from(xmax)..=1000).fold(BigUint::zero(), |acc, j| {
                acc + reference_binomial(1000, j)
            });
            let expected = BigFloat::from_biguint(&numerator, precision).mul_pow2(-1000);
            assert_eq!(tail.upper_tail(xmax), expected, "xmax = {}", xmax);
        }
    }

    #[test]
    fn test_golden_values() {
        let precision = Precision::default();

        let fair = TailProbability::from_entropy(1.0, precision).unwrap();
        assert_eq!(format!("{}", fair.upper_tail(50)), "1");
        assert_eq!(format!("{:.20}", fair.upper_tail(600)), "1.3642320780330092128e-10");
        assert_eq!(format!("{:.20}", fair.upper_tail(500)), "0.51261250908918040095");
        assert_eq!(format!("{:.20}", fair.upper_tail(750)), "6.7381282530152041363e-59");

        let default = TailProbability::from_entropy(0.8, precision).unwrap();
        assert_eq!(format!("{:.20}", default.upper_tail(600)), "0.053555460746032341608");
    }

    #[test]
    fn test_low_entropy_tail_keeps_full_precision() {
        // p = 2^-0.05 is close to one; each of the eleven terms raises it
        // to a power near 1000, so any error in p itself is magnified.
        let tail = TailProbability::from_entropy(0.05, Precision::default()).unwrap();
        assert_eq!(
            format!("{:.45}", tail.p()),
            "0.965936328924845549206808486047680914022731174"
        );
        assert_eq!(format!("{:.20}", tail.upper_tail(990)), "9.6079242556569631003e-07");
    }

    #[test]
    fn test_small_sample_matches_hand_computation() {
        // n = 4, p = 1/2: P(X >= 3) = (4 + 1) / 16.
        let precision = Precision::from_digits(50);
        let tail = TailProbability::with_sample_size(half(precision), 4);
        let expected = BigFloat::from_u64(5, precision).mul_pow2(-4);
        assert_eq!(tail.upper_tail(3), expected);
        assert_eq!(choose(4, 3) + choose(4, 4), BigUint::from(5u32));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_tail_non_increasing(h_i in 0.05f64..8.0, xmax in 0u32..1000) {
            let precision = Precision::from_digits(120);
            let tail = TailProbability::from_entropy(h_i, precision).unwrap();
            let lower = tail.upper_tail(xmax);
            let upper = tail.upper_tail(xmax + 1);

            // The two sums round independently, so allow a few ulps of slack.
            let slack = lower.mul_pow2(-(precision.bits() as i32 - 16));
            prop_assert!(!upper.is_negative());
            prop_assert!(upper <= &lower + &slack);
        }
    }
}
