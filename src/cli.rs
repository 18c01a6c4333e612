use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::{ConfidenceLevel, TrialInput};
use crate::stats::DEFAULT_DISPLAY_HEIGHT;

#[derive(Parser, Debug)]
#[command(
    name = "abtest",
    version,
    about = "A/B test significance calculator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the z-test and print the result tables.
    Calculate(CalculateArgs),
    /// Sample both conversion-rate distributions for charting.
    Density(DensityArgs),
    /// Read `field=value` changes from stdin and recompute after each one.
    Session(SessionArgs),
    /// Copy a build directory into the static hosting directory.
    Deploy(DeployArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TrialArgs {
    #[arg(long, default_value_t = 1000)]
    pub visitors_a: u64,

    #[arg(long, default_value_t = 35)]
    pub conversions_a: u64,

    #[arg(long, default_value_t = 1000)]
    pub visitors_b: u64,

    #[arg(long, default_value_t = 58)]
    pub conversions_b: u64,

    /// 0.90, 0.95 or 0.99 (percentages such as `95%` are accepted).
    #[arg(long, default_value = "0.95")]
    pub confidence_level: ConfidenceLevel,

    /// JSON file holding a full trial input; overrides the count flags.
    #[arg(long)]
    pub input_path: Option<PathBuf>,
}

impl TrialArgs {
    pub fn to_input(&self) -> TrialInput {
        TrialInput {
            visitors_a: self.visitors_a,
            conversions_a: self.conversions_a,
            visitors_b: self.visitors_b,
            conversions_b: self.conversions_b,
            confidence_level: self.confidence_level,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub trial: TrialArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Also write the JSON report to this path.
    #[arg(long)]
    pub output_path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum DensityFormat {
    Tsv,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct DensityArgs {
    #[command(flatten)]
    pub trial: TrialArgs,

    #[arg(long, default_value_t = DEFAULT_DISPLAY_HEIGHT)]
    pub display_height: f64,

    #[arg(long, value_enum, default_value_t = DensityFormat::Tsv)]
    pub format: DensityFormat,
}

#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    #[command(flatten)]
    pub trial: TrialArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    #[arg(long, default_value = "build")]
    pub source: PathBuf,

    #[arg(long, default_value = "docs")]
    pub target: PathBuf,
}
