//! Binomial coefficients.

use num::bigint::BigUint;
use num::traits::{One, Zero};

/// Exact binomial coefficient C(n, k). Returns zero when `k > n`.
///
/// Builds the running product of `(n - (k - i)) / i` for `i = 1..=k`.
/// After step `i` the product equals C(n - k + i, i), so every division
/// is exact and no factorial is ever formed.
pub fn choose(n: u64, k: u64) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let mut product = BigUint::one();
    for i in 1..=k {
        product *= n - (k - i);
        product /= i;
    }
    product
}

/// Yields C(n, k), C(n, k + 1), ..., C(n, n) in order.
///
/// Each step applies `C(n, k + 1) = C(n, k) * (n - k) / (k + 1)`, which gives
/// the same integers as calling [`choose`] per term.
#[derive(Debug, Clone)]
pub struct BinomialSweep {
    n: u64,
    k: u64,
    current: BigUint,
}

impl BinomialSweep {
    /// Starts a sweep at C(n, start). Empty if `start > n`.
    pub fn new(n: u64, start: u64) -> Self {
        Self {
            n,
            k: start,
            current: choose(n, start),
        }
    }
}

impl Iterator for BinomialSweep {
    type Item = (u64, BigUint);

    fn next(&mut self) -> Option<Self::Item> {
        if self.k > self.n {
            return None;
        }
        let item = (self.k, self.current.clone());
        self.current = &self.current * (self.n - self.k) / (self.k + 1);
        self.k += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.n + 1).saturating_sub(self.k) as usize;
        (remaining, Some(remaining))
    }
}
