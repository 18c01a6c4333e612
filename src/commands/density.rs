use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use tracing::info;

use super::load_input;
use crate::cli::{DensityArgs, DensityFormat};
use crate::model::DensitySample;
use crate::stats::{compute, sample_result_density, validate};

pub fn run(args: DensityArgs) -> Result<()> {
    if !(args.display_height.is_finite() && args.display_height > 0.0) {
        bail!(
            "display height must be a positive number, got {}",
            args.display_height
        );
    }

    let input = load_input(&args.trial)?;
    let result = compute(&validate(&input).context("trial input rejected")?);
    let sample = sample_result_density(&result, args.display_height)
        .context("failed to sample conversion-rate densities")?;

    info!(
        points = sample.points.len(),
        lower = sample.lower,
        upper = sample.upper,
        "density sampled"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    match args.format {
        DensityFormat::Json => {
            serde_json::to_writer_pretty(&mut output, &sample)
                .context("failed to serialize density json output")?;
            writeln!(output)?;
        }
        DensityFormat::Tsv => write_tsv(&mut output, &sample)?,
    }
    output.flush()?;

    Ok(())
}

pub fn write_tsv<W: Write>(output: &mut W, sample: &DensitySample) -> io::Result<()> {
    writeln!(output, "x_percent\tdensity_a\tdensity_b")?;
    for point in &sample.points {
        writeln!(
            output,
            "{:.4}\t{:.6}\t{:.6}",
            point.x, point.density_a, point.density_b
        )?;
    }
    Ok(())
}
