use std::str::FromStr;

use tracing::debug;

use crate::error::StatsError;
use crate::model::{ConfidenceLevel, TrialInput, TrialResult};
use crate::stats::{compute, validate};

/// Editable trial fields, named as they appear in JSON input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    VisitorsA,
    ConversionsA,
    VisitorsB,
    ConversionsB,
    ConfidenceLevel,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VisitorsA => "visitors_a",
            Self::ConversionsA => "conversions_a",
            Self::VisitorsB => "visitors_b",
            Self::ConversionsB => "conversions_b",
            Self::ConfidenceLevel => "confidence_level",
        }
    }
}

impl FromStr for Field {
    type Err = StatsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "visitors_a" => Ok(Self::VisitorsA),
            "conversions_a" => Ok(Self::ConversionsA),
            "visitors_b" => Ok(Self::VisitorsB),
            "conversions_b" => Ok(Self::ConversionsB),
            "confidence_level" | "confidence" => Ok(Self::ConfidenceLevel),
            other => Err(StatsError::UnknownField(other.to_string())),
        }
    }
}

/// Current input and the result derived from it.
///
/// Every accepted change recomputes the whole result. A rejected change
/// leaves both untouched.
#[derive(Debug, Clone)]
pub struct Session {
    input: TrialInput,
    result: TrialResult,
}

impl Session {
    pub fn new(input: TrialInput) -> Result<Self, StatsError> {
        let result = compute(&validate(&input)?);
        Ok(Self { input, result })
    }

    pub fn input(&self) -> &TrialInput {
        &self.input
    }

    pub fn result(&self) -> &TrialResult {
        &self.result
    }

    /// Replaces the whole input.
    pub fn replace(&mut self, input: TrialInput) -> Result<&TrialResult, StatsError> {
        let valid = validate(&input)?;
        self.result = compute(&valid);
        self.input = valid.into_inner();
        debug!(
            significant = self.result.significant,
            degenerate = self.result.is_degenerate(),
            "recomputed trial"
        );
        Ok(&self.result)
    }

    /// Parses `raw` into `field` and recomputes.
    pub fn set(&mut self, field: Field, raw: &str) -> Result<&TrialResult, StatsError> {
        let mut next = self.input;
        match field {
            Field::VisitorsA => next.visitors_a = parse_count(field, raw)?,
            Field::ConversionsA => next.conversions_a = parse_count(field, raw)?,
            Field::VisitorsB => next.visitors_b = parse_count(field, raw)?,
            Field::ConversionsB => next.conversions_b = parse_count(field, raw)?,
            Field::ConfidenceLevel => next.confidence_level = raw.parse::<ConfidenceLevel>()?,
        }
        self.replace(next)
    }

    /// Applies a `field=value` line.
    pub fn apply_line(&mut self, line: &str) -> Result<&TrialResult, StatsError> {
        let (name, value) = line
            .split_once('=')
            .ok_or_else(|| StatsError::UnknownField(line.trim().to_string()))?;
        let field = name.parse::<Field>()?;
        self.set(field, value)
    }
}

fn parse_count(field: Field, raw: &str) -> Result<u64, StatsError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| StatsError::InvalidValue {
            field: field.as_str(),
            value: raw.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_from_form_defaults() {
        let session = Session::new(TrialInput::default()).expect("defaults are valid");
        assert_eq!(session.input().visitors_a, 1000);
        assert!(session.result().significant);
    }

    #[test]
    fn accepted_change_recomputes_everything() {
        let mut session = Session::new(TrialInput::default()).expect("defaults are valid");

        let result = session.apply_line("conversions_b=36").expect("valid change");
        assert!(!result.significant);
        assert_eq!(session.input().conversions_b, 36);
        assert_eq!(session.result().variant_b.conversions, 36);
    }

    #[test]
    fn rejected_change_keeps_previous_state() {
        let mut session = Session::new(TrialInput::default()).expect("defaults are valid");
        let before = session.result().clone();

        let err = session.apply_line("visitors_a=0").unwrap_err();
        assert_eq!(err.field(), Some("visitors_a"));

        let err = session.apply_line("conversions_a=abc").unwrap_err();
        assert!(matches!(err, StatsError::InvalidValue { field: "conversions_a", .. }));

        let err = session.apply_line("conversions_a=-3").unwrap_err();
        assert_eq!(err.field(), Some("conversions_a"));

        assert_eq!(session.input(), &TrialInput::default());
        assert_eq!(session.result(), &before);
    }

    #[test]
    fn confidence_level_accepts_percent_and_fraction() {
        let mut session = Session::new(TrialInput::default()).expect("defaults are valid");

        session.apply_line("confidence_level = 99%").expect("99% is supported");
        assert_eq!(session.input().confidence_level, ConfidenceLevel::NinetyNine);

        session.apply_line("confidence=0.9").expect("0.9 is supported");
        assert_eq!(session.input().confidence_level, ConfidenceLevel::Ninety);

        let err = session.apply_line("confidence_level=0.8").unwrap_err();
        assert!(matches!(err, StatsError::UnsupportedConfidenceLevel(_)));
        assert_eq!(session.input().confidence_level, ConfidenceLevel::Ninety);
    }

    #[test]
    fn unknown_fields_are_reported() {
        let mut session = Session::new(TrialInput::default()).expect("defaults are valid");

        assert_eq!(
            session.apply_line("theme=dark").unwrap_err(),
            StatsError::UnknownField("theme".to_string())
        );
        assert!(matches!(
            session.apply_line("no separator").unwrap_err(),
            StatsError::UnknownField(_)
        ));
    }

    #[test]
    fn field_names_accept_dashes() {
        assert_eq!("Visitors-B".parse::<Field>(), Ok(Field::VisitorsB));
    }
}
