use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoanError {
    /// malformed or out-of-range loan terms, rejected before any schedule exists
    #[error("invalid loan terms: {field}: {message}")]
    InvalidTerms {
        field: &'static str,
        message: String,
    },

    /// arithmetic inconsistency while building a schedule
    #[error("schedule computation error: {message}")]
    ScheduleComputation {
        message: String,
    },

    /// a portfolio total left the decimal range; the loan is excluded
    #[error("aggregation overflow: {message}")]
    AggregationOverflow {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid payment: {message}")]
    InvalidPayment {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LoanError {
    pub(crate) fn invalid_terms(field: &'static str, message: impl Into<String>) -> Self {
        LoanError::InvalidTerms {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn computation(message: impl Into<String>) -> Self {
        LoanError::ScheduleComputation {
            message: message.into(),
        }
    }

    /// true for errors caused by the caller's input rather than the engine
    pub fn is_invalid_terms(&self) -> bool {
        matches!(self, LoanError::InvalidTerms { .. })
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
