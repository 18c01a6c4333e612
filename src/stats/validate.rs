use crate::error::StatsError;
use crate::model::TrialInput;

/// A [`TrialInput`] that passed [`validate`]. Only this type reaches the
/// engine, so computation never sees zero visitors or impossible counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidTrial(TrialInput);

impl ValidTrial {
    pub fn input(&self) -> &TrialInput {
        &self.0
    }

    pub fn into_inner(self) -> TrialInput {
        self.0
    }
}

pub fn validate(input: &TrialInput) -> Result<ValidTrial, StatsError> {
    check_variant("visitors_a", "conversions_a", input.visitors_a, input.conversions_a)?;
    check_variant("visitors_b", "conversions_b", input.visitors_b, input.conversions_b)?;
    Ok(ValidTrial(*input))
}

fn check_variant(
    visitors_field: &'static str,
    conversions_field: &'static str,
    visitors: u64,
    conversions: u64,
) -> Result<(), StatsError> {
    if visitors == 0 {
        return Err(StatsError::validation(
            visitors_field,
            "visitor count must be positive",
        ));
    }

    if conversions > visitors {
        return Err(StatsError::validation(
            conversions_field,
            format!("{conversions} conversions exceed {visitors} visitors"),
        ));
    }

    Ok(())
}
