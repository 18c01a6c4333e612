use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::load_input;
use super::report::summary_line;
use crate::cli::SessionArgs;
use crate::session::Session;

pub fn run(args: SessionArgs) -> Result<()> {
    let input = load_input(&args.trial)?;
    let mut session = Session::new(input).context("initial trial input rejected")?;

    let stdin = io::stdin();
    let mut output = io::BufWriter::new(io::stdout().lock());
    let (accepted, rejected) = drive(&mut session, stdin.lock(), &mut output)?;

    info!(accepted, rejected, "session closed");
    Ok(())
}

/// Feeds each non-blank, non-comment line to the session. Returns the counts of
/// accepted and rejected changes.
pub fn drive<R: BufRead, W: Write>(
    session: &mut Session,
    reader: R,
    output: &mut W,
) -> Result<(usize, usize)> {
    let mut accepted = 0;
    let mut rejected = 0;

    writeln!(output, "{}", summary_line(session.result()))?;
    output.flush()?;

    for line in reader.lines() {
        let line = line.context("failed to read session input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match session.apply_line(trimmed) {
            Ok(result) => {
                accepted += 1;
                writeln!(output, "{}", summary_line(result))?;
            }
            Err(err) => {
                rejected += 1;
                warn!(
                    line = trimmed,
                    field = err.field().unwrap_or_default(),
                    error = %err,
                    "change rejected"
                );
            }
        }
        output.flush()?;
    }

    Ok((accepted, rejected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrialInput;

    #[test]
    fn drive_prints_a_summary_per_accepted_change() {
        let mut session = Session::new(TrialInput::default()).expect("defaults are valid");
        let script = "# tweak B\nconversions_b=36\n\nvisitors_a=0\nconfidence_level=90%\n";

        let mut buffer = Vec::new();
        let (accepted, rejected) =
            drive(&mut session, script.as_bytes(), &mut buffer).expect("drive");
        let text = String::from_utf8(buffer).expect("utf8");

        assert_eq!((accepted, rejected), (2, 1));
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).is_some_and(|line| line.contains("rate_b=3.60%")));
        assert_eq!(session.input().visitors_a, 1000);
    }
}
