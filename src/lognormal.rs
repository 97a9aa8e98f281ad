//! Closed-form normal and log-normal cumulative distribution functions.

use std::f64::consts::SQRT_2;

// Abramowitz & Stegun 7.1.26
const P: f64 = 0.327_591_1;
const A1: f64 = 0.254_829_592;
const A2: f64 = -0.284_496_736;
const A3: f64 = 1.421_413_741;
const A4: f64 = -1.453_152_027;
const A5: f64 = 1.061_405_429;

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal CDF. Absolute error is below 1.5e-7.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// CDF of a log-normal distribution with median `scale` and shape `sigma`.
///
/// Returns exactly `0.0` for `x <= 0`.
pub fn lognorm_cdf(x: f64, sigma: f64, scale: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    normal_cdf((x.ln() - scale.ln()) / sigma)
}
