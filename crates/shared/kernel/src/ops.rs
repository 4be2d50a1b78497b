//! Small combinatorics helpers.

/// `n!`, or `None` on `u64` overflow (`n > 20`).
#[must_use]
pub fn factorial(n: u64) -> Option<u64> {
    (2..=n).try_fold(1_u64, u64::checked_mul)
}

/// `n choose k`, or `None` on overflow. Zero when `k > n`.
#[must_use]
pub fn binomial_coefficient(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // exact at every step: the running value is C(n, i + 1)
        result = result.checked_mul(u128::from(n - i))? / u128::from(i + 1);
    }
    u64::try_from(result).ok()
}
