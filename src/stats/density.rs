use crate::error::StatsError;
use crate::model::{DensityPoint, DensitySample, TrialResult, VariantStats};

use super::normal::NormalApprox;

/// Number of intervals between the first and last sample.
pub const DENSITY_STEPS: usize = 100;
pub const DEFAULT_DISPLAY_HEIGHT: f64 = 60.0;
const SPREAD_SIGMAS: f64 = 4.0;

/// Samples both curves over the union of their ±4σ ranges.
///
/// The taller peak is scaled to `display_height`. A variant with zero
/// variance is drawn as a full-height spike at the grid point closest to its
/// mean and does not take part in the scaling.
pub fn sample_density(
    a: NormalApprox,
    b: NormalApprox,
    display_height: f64,
) -> Result<DensitySample, StatsError> {
    if a.is_degenerate() && b.is_degenerate() {
        return Err(StatsError::DegenerateDensity);
    }

    let lower = a.lower(SPREAD_SIGMAS).min(b.lower(SPREAD_SIGMAS));
    let upper = a.upper(SPREAD_SIGMAS).max(b.upper(SPREAD_SIGMAS));
    let step = (upper - lower) / DENSITY_STEPS as f64;

    let tallest = [a, b]
        .iter()
        .filter(|curve| !curve.is_degenerate())
        .map(NormalApprox::peak)
        .fold(0.0_f64, f64::max);
    let scale = display_height / tallest;

    let spike_a = spike_index(&a, lower, step);
    let spike_b = spike_index(&b, lower, step);

    let points = (0..=DENSITY_STEPS)
        .map(|i| {
            let x = lower + i as f64 * step;
            DensityPoint {
                x: x * 100.0,
                density_a: plotted(&a, spike_a, i, x, scale, display_height),
                density_b: plotted(&b, spike_b, i, x, scale, display_height),
            }
        })
        .collect();

    Ok(DensitySample {
        lower,
        upper,
        step,
        scale,
        points,
    })
}

pub fn sample_result_density(
    result: &TrialResult,
    display_height: f64,
) -> Result<DensitySample, StatsError> {
    sample_density(
        approximation(&result.variant_a),
        approximation(&result.variant_b),
        display_height,
    )
}

fn approximation(variant: &VariantStats) -> NormalApprox {
    NormalApprox::new(variant.conversion_rate, variant.standard_error)
}

fn spike_index(curve: &NormalApprox, lower: f64, step: f64) -> Option<usize> {
    if !curve.is_degenerate() {
        return None;
    }
    let offset = ((curve.mean - lower) / step).round().max(0.0) as usize;
    Some(offset.min(DENSITY_STEPS))
}

fn plotted(
    curve: &NormalApprox,
    spike: Option<usize>,
    index: usize,
    x: f64,
    scale: f64,
    display_height: f64,
) -> f64 {
    match spike {
        Some(at) if at == index => display_height,
        Some(_) => 0.0,
        None => curve.pdf(x) * scale,
    }
}
