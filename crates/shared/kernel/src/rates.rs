//! Conversions between microscopic (Doi) and macroscopic (mass-action) rates.

use crate::error::KernelError;
use std::f64::consts::PI;

const BISECTION_STEPS: usize = 200;

/// Macroscopic rate of a Doi reaction with microscopic rate `k_micro` and radius `radius`
/// between educts diffusing with `d1` and `d2`.
#[must_use]
pub fn macroscopic_rate(k_micro: f64, d1: f64, d2: f64, radius: f64) -> f64 {
    let d = d1 + d2;
    if k_micro <= 0. || radius <= 0. {
        return 0.;
    }
    if d <= 0. {
        // immobile educts react at the reaction-limited rate
        return k_micro * volume_factor(radius);
    }
    let kr = (k_micro / d).sqrt() * radius;
    4. * PI * d * radius * (1. - kr.tanh() / kr)
}

/// Supremum of [`macroscopic_rate`] for `k_micro -> inf`.
#[must_use]
pub fn diffusion_limited_rate(d1: f64, d2: f64, radius: f64) -> f64 {
    4. * PI * (d1 + d2) * radius
}

/// Inverts [`macroscopic_rate`] by bisection.
///
/// # Errors
/// [`KernelError::Rate`] if `k_macro` is negative or not below the diffusion-limited rate.
pub fn microscopic_rate(k_macro: f64, d1: f64, d2: f64, radius: f64) -> Result<f64, KernelError> {
    if k_macro == 0. {
        return Ok(0.);
    }
    let limit = diffusion_limited_rate(d1, d2, radius);
    if !(k_macro > 0. && k_macro < limit) {
        return Err(KernelError::Rate {
            message: format!(
                "macroscopic rate {k_macro} is outside (0, {limit}) for D1={d1}, D2={d2}, R={radius}"
            )
            .into(),
            context: None,
        });
    }

    let mut lo = 0.;
    let mut hi = 1.;
    while macroscopic_rate(hi, d1, d2, radius) < k_macro {
        hi *= 2.;
        if !hi.is_finite() {
            return Err("microscopic rate search diverged".into());
        }
    }
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if macroscopic_rate(mid, d1, d2, radius) < k_macro {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= f64::EPSILON * hi {
            break;
        }
    }
    Ok(0.5 * (lo + hi))
}

fn volume_factor(radius: f64) -> f64 {
    4. / 3. * PI * radius.powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lotka_volterra_constants() {
        let beta = macroscopic_rate(7.670_679_846_561_291, 0.01, 0.01, 0.25);
        assert!((beta - 0.05).abs() < 1e-5, "beta = {beta}");
        let friction = macroscopic_rate(0.391_555_650_247_861_65, 0.01, 0.01, 0.2);
        assert!((friction - 0.01).abs() < 1e-5, "friction = {friction}");
    }

    #[test]
    fn test_microscopic_rate_inverts() {
        let k_micro = microscopic_rate(0.05, 0.01, 0.01, 0.25).unwrap();
        assert!((k_micro - 7.670_679_846_561_291).abs() < 1e-6, "k_micro = {k_micro}");
        assert!((macroscopic_rate(k_micro, 0.01, 0.01, 0.25) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_unreachable_rate_is_rejected() {
        let limit = diffusion_limited_rate(0.01, 0.01, 0.25);
        let err = microscopic_rate(limit * 1.01, 0.01, 0.01, 0.25).unwrap_err();
        assert_eq!(err.kind(), "Rate");
        assert!(microscopic_rate(-1., 0.01, 0.01, 0.25).is_err());
        assert_eq!(microscopic_rate(0., 0.01, 0.01, 0.25).unwrap(), 0.);
    }

    #[test]
    fn test_rate_is_monotonic() {
        let rates: Vec<f64> = [0.1, 1., 10., 100.].iter().map(|&k| macroscopic_rate(k, 1., 1., 0.1)).collect();
        assert!(rates.windows(2).all(|w| w[0] < w[1]));
        assert!(rates.iter().all(|&r| r < diffusion_limited_rate(1., 1., 0.1)));
    }
}
