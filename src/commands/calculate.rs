use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::load_input;
use super::report::{build_report, write_text_report};
use crate::cli::CalculateArgs;
use crate::stats::{compute, validate};
use crate::util::write_json_pretty;

pub fn run(args: CalculateArgs) -> Result<()> {
    let input = load_input(&args.trial)?;
    let trial = validate(&input).context("trial input rejected")?;
    let result = compute(&trial);

    info!(
        visitors_a = input.visitors_a,
        conversions_a = input.conversions_a,
        visitors_b = input.visitors_b,
        conversions_b = input.conversions_b,
        confidence_level = %input.confidence_level,
        significant = result.significant,
        "trial computed"
    );
    for degeneracy in &result.degeneracies {
        warn!(degeneracy = ?degeneracy, "{degeneracy}");
    }

    let report = build_report(input, result);

    if let Some(output_path) = &args.output_path {
        write_json_pretty(output_path, &report)?;
        info!(path = %output_path.display(), "wrote report");
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &report)
            .context("failed to serialize report json output")?;
        writeln!(output)?;
    } else {
        write_text_report(&mut output, &report.result)?;
    }
    output.flush()?;

    Ok(())
}
