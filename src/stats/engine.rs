use crate::model::{ConfidenceInterval, ConfidenceLevel, Degeneracy, TrialResult, VariantStats};

use super::normal::normal_cdf;
use super::validate::ValidTrial;

/// Runs the two-proportion z-test for a validated trial.
///
/// Undefined quantities are reported as `None` together with the matching
/// [`Degeneracy`]; the record never carries NaN or infinities.
pub fn compute(trial: &ValidTrial) -> TrialResult {
    let input = trial.input();
    let level = input.confidence_level;

    let variant_a = variant_stats(input.visitors_a, input.conversions_a, level);
    let variant_b = variant_stats(input.visitors_b, input.conversions_b, level);

    let rate_a = variant_a.conversion_rate;
    let rate_b = variant_b.conversion_rate;
    let difference = rate_b - rate_a;
    let standard_error_diff =
        (variant_a.standard_error.powi(2) + variant_b.standard_error.powi(2)).sqrt();

    let mut degeneracies = Vec::new();

    let relative_uplift = if rate_a > 0.0 {
        Some(difference / rate_a)
    } else {
        degeneracies.push(Degeneracy::ZeroBaselineRate);
        None
    };

    let z_score = if standard_error_diff > 0.0 {
        Some(difference / standard_error_diff)
    } else {
        degeneracies.push(Degeneracy::ZeroStandardError);
        None
    };

    let p_value = z_score.map(two_tailed_p_value);
    let power = z_score.map(|z| power(z, level.critical_z()));
    let significant = p_value.is_some_and(|p| p < level.alpha());

    TrialResult {
        confidence_level: level,
        variant_a,
        variant_b,
        standard_error_diff,
        relative_uplift,
        absolute_uplift: difference,
        z_score,
        p_value,
        power,
        significant,
        degeneracies,
    }
}

fn variant_stats(visitors: u64, conversions: u64, level: ConfidenceLevel) -> VariantStats {
    let n = visitors as f64;
    let rate = conversions as f64 / n;
    let standard_error = (rate * (1.0 - rate) / n).sqrt();
    let half_width = level.critical_z() * standard_error;

    VariantStats {
        visitors,
        conversions,
        conversion_rate: rate,
        standard_error,
        confidence_interval: ConfidenceInterval {
            lower: (rate - half_width) * 100.0,
            upper: (rate + half_width) * 100.0,
        },
    }
}

/// `2 * (1 - Φ(|z|))`, clamped to `[0, 1]`; the polynomial CDF sits a hair
/// under one half at zero.
pub(super) fn two_tailed_p_value(z: f64) -> f64 {
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

pub(super) fn power(z: f64, critical_z: f64) -> f64 {
    let shift = z.abs();
    (1.0 - normal_cdf(critical_z - shift) + normal_cdf(-critical_z - shift)).clamp(0.0, 1.0)
}
