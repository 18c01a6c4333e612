use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },
    #[error("unsupported confidence level {0}; expected one of 0.90, 0.95, 0.99")]
    UnsupportedConfidenceLevel(f64),
    #[error("both variants have zero variance; no density curve can be drawn")]
    DegenerateDensity,
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("invalid value for {field}: `{value}`")]
    InvalidValue { field: &'static str, value: String },
}

impl StatsError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Field the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } | Self::InvalidValue { field, .. } => Some(*field),
            Self::UnsupportedConfidenceLevel(_) => Some("confidence_level"),
            Self::UnknownField(name) => Some(name.as_str()),
            Self::DegenerateDensity => None,
        }
    }
}
