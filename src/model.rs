use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

const LEVEL_TOLERANCE: f64 = 1e-9;

/// Confidence levels offered by the calculator. The set is closed because the
/// critical z-values come from a fixed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum ConfidenceLevel {
    Ninety,
    #[default]
    NinetyFive,
    NinetyNine,
}

impl ConfidenceLevel {
    pub const ALL: [Self; 3] = [Self::Ninety, Self::NinetyFive, Self::NinetyNine];

    pub fn fraction(self) -> f64 {
        match self {
            Self::Ninety => 0.90,
            Self::NinetyFive => 0.95,
            Self::NinetyNine => 0.99,
        }
    }

    pub fn critical_z(self) -> f64 {
        match self {
            Self::Ninety => 1.645,
            Self::NinetyFive => 1.96,
            Self::NinetyNine => 2.576,
        }
    }

    /// Significance threshold the p-value is compared against.
    pub fn alpha(self) -> f64 {
        1.0 - self.fraction()
    }

    pub fn percent(self) -> u32 {
        match self {
            Self::Ninety => 90,
            Self::NinetyFive => 95,
            Self::NinetyNine => 99,
        }
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = StatsError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|level| (level.fraction() - value).abs() < LEVEL_TOLERANCE)
            .ok_or(StatsError::UnsupportedConfidenceLevel(value))
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.fraction()
    }
}

impl FromStr for ConfidenceLevel {
    type Err = StatsError;

    /// Accepts fractions (`0.95`) and percentages (`95`, `95%`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (number, is_percent) = match trimmed.strip_suffix('%') {
            Some(stripped) => (stripped.trim(), true),
            None => (trimmed, false),
        };

        let value = number
            .parse::<f64>()
            .map_err(|_| StatsError::InvalidValue {
                field: "confidence_level",
                value: raw.to_string(),
            })?;

        if is_percent || value > 1.0 {
            Self::try_from(value / 100.0)
        } else {
            Self::try_from(value)
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Raw counts for both variants as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialInput {
    pub visitors_a: u64,
    pub conversions_a: u64,
    pub visitors_b: u64,
    pub conversions_b: u64,
    pub confidence_level: ConfidenceLevel,
}

impl Default for TrialInput {
    fn default() -> Self {
        Self {
            visitors_a: 1000,
            conversions_a: 35,
            visitors_b: 1000,
            conversions_b: 58,
            confidence_level: ConfidenceLevel::NinetyFive,
        }
    }
}

impl TrialInput {
    /// Same trial with the variants exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            visitors_a: self.visitors_b,
            conversions_a: self.conversions_b,
            visitors_b: self.visitors_a,
            conversions_b: self.conversions_a,
            confidence_level: self.confidence_level,
        }
    }
}

/// Percent bounds of a Wald interval. The lower bound may fall below zero
/// for small rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariantStats {
    pub visitors: u64,
    pub conversions: u64,
    /// Fraction in `[0, 1]`.
    pub conversion_rate: f64,
    pub standard_error: f64,
    pub confidence_interval: ConfidenceInterval,
}

impl VariantStats {
    pub fn conversion_rate_percent(&self) -> f64 {
        self.conversion_rate * 100.0
    }
}

/// Arithmetic edge cases that leave some result fields undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degeneracy {
    /// Variant A converted nobody, so relative uplift has no baseline.
    ZeroBaselineRate,
    /// Both rates sit at 0 or 1, so the difference has no spread.
    ZeroStandardError,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBaselineRate => {
                write!(f, "variant A has a 0% conversion rate; relative uplift is undefined")
            }
            Self::ZeroStandardError => write!(
                f,
                "standard error of the difference is zero; z-score, p-value and power are undefined"
            ),
        }
    }
}

/// Everything derived from one [`TrialInput`]. Uplifts and power are
/// fractions; interval bounds are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub confidence_level: ConfidenceLevel,
    pub variant_a: VariantStats,
    pub variant_b: VariantStats,
    pub standard_error_diff: f64,
    pub relative_uplift: Option<f64>,
    pub absolute_uplift: f64,
    pub z_score: Option<f64>,
    pub p_value: Option<f64>,
    pub power: Option<f64>,
    pub significant: bool,
    pub degeneracies: Vec<Degeneracy>,
}

/// Power below this is too weak to rely on a negative result.
pub const ADEQUATE_POWER: f64 = 0.8;

impl TrialResult {
    pub fn is_degenerate(&self) -> bool {
        !self.degeneracies.is_empty()
    }

    pub fn intervals_overlap(&self) -> bool {
        self.variant_a
            .confidence_interval
            .overlaps(&self.variant_b.confidence_interval)
    }

    pub fn has_adequate_power(&self) -> bool {
        self.power.is_some_and(|power| power >= ADEQUATE_POWER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    /// Conversion rate in percent.
    pub x: f64,
    pub density_a: f64,
    pub density_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensitySample {
    /// Range bounds and step as fractions, not percentages.
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
    /// Multiply a raw density by this to get the plotted value.
    pub scale: f64,
    pub points: Vec<DensityPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub report_version: u32,
    pub generated_at: String,
    pub input: TrialInput,
    pub result: TrialResult,
}
