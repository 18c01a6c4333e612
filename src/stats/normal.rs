use std::f64::consts::PI;

use serde::Serialize;

// Zelen & Severo (A&S 26.2.17) coefficients.
const B0: f64 = 0.2316419;
const B1: f64 = 0.3193815;
const B2: f64 = -0.3565638;
const B3: f64 = 1.781478;
const B4: f64 = -1.821256;
const B5: f64 = 1.330274;
const INV_SQRT_2PI: f64 = 0.3989423;

/// Standard normal CDF using the Zelen & Severo polynomial.
///
/// Accurate to roughly 7 decimal places. Callers that need more should use an
/// exact error function instead.
pub fn normal_cdf(x: f64) -> f64 {
    let t = 1.0 / (1.0 + B0 * x.abs());
    let d = INV_SQRT_2PI * (-x * x / 2.0).exp();
    let tail = d * t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));

    if x > 0.0 { 1.0 - tail } else { tail }
}

/// Normal density at `x`. `std_dev` must be positive.
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * PI).sqrt())
}

/// Normal approximation to a binomial proportion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalApprox {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalApprox {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    pub fn is_degenerate(&self) -> bool {
        self.std_dev <= 0.0
    }

    pub fn pdf(&self, x: f64) -> f64 {
        normal_pdf(x, self.mean, self.std_dev)
    }

    pub fn peak(&self) -> f64 {
        self.pdf(self.mean)
    }

    pub fn lower(&self, sigmas: f64) -> f64 {
        self.mean - sigmas * self.std_dev
    }

    pub fn upper(&self, sigmas: f64) -> f64 {
        self.mean + sigmas * self.std_dev
    }
}
