pub mod calculate;
pub mod density;
pub mod deploy;
pub mod report;
pub mod session;

use anyhow::Result;
use tracing::info;

use crate::cli::TrialArgs;
use crate::model::TrialInput;
use crate::util::read_json;

/// Resolves the trial from `--input-path` when given, else from the flags.
pub fn load_input(args: &TrialArgs) -> Result<TrialInput> {
    match &args.input_path {
        Some(path) => {
            let input: TrialInput = read_json(path)?;
            info!(path = %path.display(), "loaded trial input");
            Ok(input)
        }
        None => Ok(args.to_input()),
    }
}
