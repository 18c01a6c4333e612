use std::io::{self, Write};

use crate::model::{ADEQUATE_POWER, Report, TrialInput, TrialResult, VariantStats};
use crate::util::now_utc_string;

const REPORT_VERSION: u32 = 1;
const UNDEFINED: &str = "n/a";

pub fn build_report(input: TrialInput, result: TrialResult) -> Report {
    Report {
        report_version: REPORT_VERSION,
        generated_at: now_utc_string(),
        input,
        result,
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

fn format_optional(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map(render).unwrap_or_else(|| UNDEFINED.to_string())
}

pub fn headline(result: &TrialResult) -> &'static str {
    if result.significant {
        "Significant result!"
    } else {
        "Result not significant"
    }
}

/// One sentence comparing B against A, as shown above the result tables.
pub fn comparison_sentence(result: &TrialResult) -> String {
    let rate_a = format_percent(result.variant_a.conversion_rate_percent());
    let rate_b = format_percent(result.variant_b.conversion_rate_percent());

    let comparison = match result.relative_uplift {
        Some(uplift) => {
            let direction = if uplift >= 0.0 { "higher" } else { "lower" };
            format!(
                "Variant B's conversion rate ({rate_b}) was {} {direction} than variant A's ({rate_a}).",
                format_percent((uplift * 100.0).abs())
            )
        }
        None => format!(
            "Variant B converted at {rate_b} against a variant A rate of {rate_a}; relative uplift is undefined."
        ),
    };

    let verdict = if result.significant {
        format!(
            " You can be {} confident this result comes from the change and not from chance.",
            result.confidence_level
        )
    } else {
        " This result is not statistically significant and could be due to chance.".to_string()
    };

    comparison + &verdict
}

/// Compact form used by the interactive session.
pub fn summary_line(result: &TrialResult) -> String {
    format!(
        "rate_a={} rate_b={} uplift={} z={} p={} power={} significant={}",
        format_percent(result.variant_a.conversion_rate_percent()),
        format_percent(result.variant_b.conversion_rate_percent()),
        format_optional(result.relative_uplift, |value| format_percent(value * 100.0)),
        format_optional(result.z_score, |value| format!("{value:.2}")),
        format_optional(result.p_value, |value| format!("{value:.4}")),
        format_optional(result.power, |value| format_percent(value * 100.0)),
        result.significant,
    )
}

pub fn write_text_report<W: Write>(output: &mut W, result: &TrialResult) -> io::Result<()> {
    let level = result.confidence_level;

    writeln!(output, "{}", headline(result))?;
    writeln!(output, "{}", comparison_sentence(result))?;
    for degeneracy in &result.degeneracies {
        writeln!(output, "warning: {degeneracy}")?;
    }
    writeln!(output)?;

    writeln!(output, "Variants ({level} confidence intervals)")?;
    writeln!(
        output,
        "\tvariant\tvisitors\tconversions\trate\tci_lower\tci_upper\tstd_error"
    )?;
    write_variant_row(output, "A", &result.variant_a)?;
    write_variant_row(output, "B", &result.variant_b)?;
    writeln!(output)?;

    writeln!(output, "Statistics")?;
    writeln!(
        output,
        "\trelative_uplift: {}",
        format_optional(result.relative_uplift, |value| format_percent(value * 100.0))
    )?;
    writeln!(
        output,
        "\tabsolute_uplift: {}",
        format_percent(result.absolute_uplift * 100.0)
    )?;
    writeln!(
        output,
        "\tstd_error_diff: {:.6}",
        result.standard_error_diff
    )?;
    writeln!(
        output,
        "\tz_score: {}",
        format_optional(result.z_score, |value| format!("{value:.4}"))
    )?;
    writeln!(
        output,
        "\tp_value: {}",
        format_optional(result.p_value, |value| format!("{value:.6}"))
    )?;
    writeln!(
        output,
        "\tpower: {}",
        format_optional(result.power, |value| format_percent(value * 100.0))
    )?;
    writeln!(
        output,
        "\tsignificance: {}",
        if result.significant {
            "significant"
        } else {
            "not significant"
        }
    )?;
    writeln!(output)?;

    writeln!(output, "Interpretation")?;
    writeln!(
        output,
        "\tA p-value below {:.2} indicates a statistically significant difference at {level} confidence.",
        level.alpha()
    )?;
    let power_note = if result.has_adequate_power() {
        "reaches"
    } else {
        "does not reach"
    };
    writeln!(
        output,
        "\tPower {power_note} {}, the level needed to reliably detect real differences.",
        format_percent(ADEQUATE_POWER * 100.0)
    )?;
    let overlap_note = if result.intervals_overlap() {
        "The confidence intervals overlap."
    } else {
        "The confidence intervals do not overlap, which is strong evidence of a real difference."
    };
    writeln!(output, "\t{overlap_note}")?;

    Ok(())
}

fn write_variant_row<W: Write>(output: &mut W, name: &str, variant: &VariantStats) -> io::Result<()> {
    writeln!(
        output,
        "\t{name}\t{}\t{}\t{}\t{}\t{}\t{:.6}",
        variant.visitors,
        variant.conversions,
        format_percent(variant.conversion_rate_percent()),
        format_percent(variant.confidence_interval.lower),
        format_percent(variant.confidence_interval.upper),
        variant.standard_error,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfidenceLevel;
    use crate::stats::{compute, validate};

    fn result_for(input: TrialInput) -> TrialResult {
        compute(&validate(&input).expect("valid input"))
    }

    fn render(result: &TrialResult) -> String {
        let mut buffer = Vec::new();
        write_text_report(&mut buffer, result).expect("render");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn text_report_lists_rates_and_statistics() {
        let text = render(&result_for(TrialInput::default()));

        assert!(text.starts_with("Significant result!\n"));
        assert!(text.contains("was 65.71% higher than variant A's (3.50%)"));
        assert!(text.contains("You can be 95% confident"));
        assert!(text.contains("\tA\t1000\t35\t3.50%\t2.36%\t4.64%\t0.005812"));
        assert!(text.contains("\tz_score: 2.4461"));
        assert!(text.contains("\tp_value: 0.014"));
        assert!(text.contains("\tabsolute_uplift: 2.30%"));
        assert!(text.contains("A p-value below 0.05"));
        assert!(text.contains("does not reach 80.00%"));
        assert!(text.contains("The confidence intervals overlap."));
    }

    #[test]
    fn lower_variant_b_reads_as_lower() {
        let result = result_for(TrialInput::default().swapped());
        let sentence = comparison_sentence(&result);

        assert!(sentence.contains("39.66% lower"), "{sentence}");
    }

    #[test]
    fn undefined_values_render_as_placeholder() {
        let result = result_for(TrialInput {
            visitors_a: 100,
            conversions_a: 0,
            visitors_b: 100,
            conversions_b: 0,
            confidence_level: ConfidenceLevel::Ninety,
        });
        let text = render(&result);

        assert!(text.starts_with("Result not significant\n"));
        assert!(text.contains("relative uplift is undefined"));
        assert!(text.contains("\tz_score: n/a"));
        assert!(text.contains("\tp_value: n/a"));
        assert!(text.contains("\tpower: n/a"));
        assert!(text.contains("warning: standard error of the difference is zero"));
    }

    #[test]
    fn summary_line_is_single_line() {
        let line = summary_line(&result_for(TrialInput::default()));

        assert!(!line.contains('\n'));
        assert!(line.contains("uplift=65.71%"));
        assert!(line.ends_with("significant=true"));
    }

    #[test]
    fn wide_gap_reports_non_overlapping_intervals() {
        let result = result_for(TrialInput {
            visitors_a: 10_000,
            conversions_a: 300,
            visitors_b: 10_000,
            conversions_b: 600,
            confidence_level: ConfidenceLevel::NinetyNine,
        });

        assert!(!result.intervals_overlap());
        assert!(result.has_adequate_power());
        assert!(render(&result).contains("do not overlap"));
    }
}
