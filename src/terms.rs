use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::AmortizationMethod;

/// loan terms as entered by the borrower, immutable once the loan exists
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanTerms {
    pub borrower_name: String,
    pub principal_amount: Money,
    /// monthly rate as a fraction; built from a percentage via [`Rate::from_percentage`]
    pub monthly_interest_rate: Rate,
    pub term_months: u32,
    pub start_date: NaiveDate,
    pub first_payment_due_date: NaiveDate,
    pub amortization_method: AmortizationMethod,
}

impl LoanTerms {
    pub fn builder() -> LoanTermsBuilder {
        LoanTermsBuilder::new()
    }

    /// check every field, failing on the first violation
    pub fn validate(&self, config: &EngineConfig) -> Result<()> {
        if self.borrower_name.trim().is_empty() {
            return Err(LoanError::invalid_terms("borrower_name", "must not be empty"));
        }

        if !self.principal_amount.is_positive() {
            return Err(LoanError::invalid_terms(
                "principal_amount",
                format!("must be greater than zero, got {}", self.principal_amount),
            ));
        }

        let places = config.currency.decimal_places;
        if !self.principal_amount.fits_precision(places) {
            return Err(LoanError::invalid_terms(
                "principal_amount",
                format!("{} has more than {} decimal places", self.principal_amount, places),
            ));
        }

        if self.monthly_interest_rate.is_negative() {
            return Err(LoanError::invalid_terms(
                "monthly_interest_rate",
                format!("must not be negative, got {}", self.monthly_interest_rate),
            ));
        }

        if self.term_months == 0 {
            return Err(LoanError::invalid_terms("term_months", "must be at least one month"));
        }

        if self.term_months > config.schedule.max_term_months {
            return Err(LoanError::invalid_terms(
                "term_months",
                format!(
                    "{} exceeds the maximum of {} months",
                    self.term_months, config.schedule.max_term_months
                ),
            ));
        }

        if self.first_payment_due_date < self.start_date {
            return Err(LoanError::invalid_terms(
                "first_payment_due_date",
                format!(
                    "{} precedes start date {}",
                    self.first_payment_due_date, self.start_date
                ),
            ));
        }

        Ok(())
    }
}

/// builder for loan terms
#[derive(Debug, Default)]
pub struct LoanTermsBuilder {
    borrower_name: Option<String>,
    principal_amount: Option<Money>,
    monthly_interest_rate: Option<Rate>,
    term_months: Option<u32>,
    start_date: Option<NaiveDate>,
    first_payment_due_date: Option<NaiveDate>,
    amortization_method: Option<AmortizationMethod>,
}

impl LoanTermsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn borrower(mut self, name: impl Into<String>) -> Self {
        self.borrower_name = Some(name.into());
        self
    }

    pub fn principal(mut self, amount: Money) -> Self {
        self.principal_amount = Some(amount);
        self
    }

    pub fn monthly_rate(mut self, rate: Rate) -> Self {
        self.monthly_interest_rate = Some(rate);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn first_payment_due(mut self, date: NaiveDate) -> Self {
        self.first_payment_due_date = Some(date);
        self
    }

    pub fn method(mut self, method: AmortizationMethod) -> Self {
        self.amortization_method = Some(method);
        self
    }

    /// Build the terms. The first due date defaults to one month after the
    /// start date and the method defaults to SAC. Values are validated
    /// against the default configuration.
    pub fn build(self) -> Result<LoanTerms> {
        let borrower_name = self
            .borrower_name
            .ok_or_else(|| LoanError::invalid_terms("borrower_name", "required"))?;

        let principal_amount = self
            .principal_amount
            .ok_or_else(|| LoanError::invalid_terms("principal_amount", "required"))?;

        let monthly_interest_rate = self
            .monthly_interest_rate
            .ok_or_else(|| LoanError::invalid_terms("monthly_interest_rate", "required"))?;

        let term_months = self
            .term_months
            .ok_or_else(|| LoanError::invalid_terms("term_months", "required"))?;

        let start_date = self
            .start_date
            .ok_or_else(|| LoanError::invalid_terms("start_date", "required"))?;

        let first_payment_due_date = match self.first_payment_due_date {
            Some(date) => date,
            None => start_date
                .checked_add_months(chrono::Months::new(1))
                .ok_or_else(|| LoanError::InvalidDate {
                    message: format!("no month follows {}", start_date),
                })?,
        };

        let terms = LoanTerms {
            borrower_name,
            principal_amount,
            monthly_interest_rate,
            term_months,
            start_date,
            first_payment_due_date,
            amortization_method: self.amortization_method.unwrap_or(AmortizationMethod::Sac),
        };

        terms.validate(&EngineConfig::default())?;
        Ok(terms)
    }
}
