use rust_decimal::Decimal;
use tracing::debug;

use crate::amortization::{calendar, Installment, Schedule};
use crate::config::EngineConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::parallel::maybe_parallel_map;
use crate::terms::LoanTerms;
use crate::types::AmortizationMethod;

/// Turns loan terms into an amortization schedule.
///
/// Every installment is rounded to the currency's minor unit. The final
/// installment takes whatever principal is left, so the schedule always
/// amortizes to exactly zero; its principal (and total) therefore differ
/// from the regular amount by the accumulated rounding residue. For PRICE
/// that difference is at most one minor unit times `sum((1 + r)^j)` for
/// `j` in `0..n`.
///
/// Amounts that leave the `Decimal` range fail with
/// [`LoanError::ScheduleComputation`] instead of panicking.
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    config: EngineConfig,
}

impl ScheduleGenerator {
    /// generator for a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// generate the full schedule, validating the terms first
    pub fn generate(&self, terms: &LoanTerms) -> Result<Schedule> {
        terms.validate(&self.config)?;

        let currency = &self.config.currency;
        let principal = terms.principal_amount;
        let rate = terms.monthly_interest_rate;
        let term = terms.term_months;
        let due_dates = calendar::monthly_due_dates(terms.first_payment_due_date, term)?;

        // SAC: constant principal portion; PRICE: constant total payment
        let level = match terms.amortization_method {
            AmortizationMethod::Sac => currency.round(principal / Decimal::from(term)),
            AmortizationMethod::Price => currency.round(annuity_payment(principal, rate, term)?),
        };

        let tolerance = self.config.schedule.residue_tolerance;
        let mut installments = Vec::with_capacity(term as usize);
        let mut balance = principal;

        for (position, due_date) in due_dates.into_iter().enumerate() {
            let index = position as u32 + 1;
            let interest = balance.interest_at(rate).ok_or_else(|| {
                LoanError::computation(format!(
                    "interest on {} at {} overflows in installment {}",
                    balance, rate, index
                ))
            })?;
            let interest_portion = currency.round(interest);

            let regular_principal = match terms.amortization_method {
                AmortizationMethod::Sac => level,
                AmortizationMethod::Price => (level - interest_portion).max(Money::ZERO),
            };

            let principal_portion = if index == term {
                let residue = balance - regular_principal;
                if let Some(tolerance) = tolerance.filter(|t| residue.abs() > *t) {
                    return Err(LoanError::computation(format!(
                        "rounding residue {} exceeds tolerance {} for {} loan of {} over {} months",
                        residue, tolerance, terms.amortization_method, principal, term
                    )));
                }
                balance
            } else {
                regular_principal.min(balance)
            };

            let total_payment = principal_portion.checked_add(interest_portion).ok_or_else(|| {
                LoanError::computation(format!("installment {} total overflows", index))
            })?;
            balance -= principal_portion;

            installments.push(Installment {
                index,
                due_date,
                principal_portion,
                interest_portion,
                total_payment,
                remaining_principal_after: balance,
            });
        }

        let schedule = Schedule {
            principal,
            method: terms.amortization_method,
            installments,
        };

        schedule.verify(terms, currency)?;

        debug!(
            method = %terms.amortization_method,
            principal = %principal,
            rate = %rate,
            term_months = term,
            total_interest = %schedule.total_interest(),
            "generated amortization schedule"
        );

        Ok(schedule)
    }

    /// total of the first installment, shown as the estimated payment when
    /// previewing a loan (the fixed payment for PRICE, the largest one for SAC)
    pub fn estimate_payment(&self, terms: &LoanTerms) -> Result<Money> {
        let schedule = self.generate(terms)?;
        schedule
            .first()
            .map(|i| i.total_payment)
            .ok_or_else(|| LoanError::computation("schedule has no installments"))
    }

    /// generate schedules for many loans; results keep the input order
    pub fn generate_many(&self, terms: &[LoanTerms]) -> Vec<Result<Schedule>> {
        maybe_parallel_map(terms, self.config.parallel_threshold, |t| self.generate(t))
    }
}

/// Constant payment for the french (PRICE) system.
///
/// Uses the discount form `P * r / (1 - (1 + r)^-n)`, equal to
/// `P * r(1+r)^n / ((1+r)^n - 1)`, which cannot overflow for long terms.
fn annuity_payment(principal: Money, rate: Rate, months: u32) -> Result<Money> {
    if rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let r = rate.as_decimal();
    let discount = Decimal::ONE
        .checked_add(r)
        .and_then(|growth| Decimal::ONE.checked_div(growth))
        .ok_or_else(|| LoanError::computation(format!("discount factor overflows for rate {}", rate)))?;

    let mut discount_n = Decimal::ONE;
    for _ in 0..months {
        discount_n *= discount;
    }

    let denominator = Decimal::ONE - discount_n;
    if denominator.is_zero() {
        return Err(LoanError::computation(format!(
            "annuity factor vanished for rate {} over {} months",
            rate, months
        )));
    }

    r.checked_div(denominator)
        .and_then(|factor| principal.checked_mul(factor))
        .ok_or_else(|| {
            LoanError::computation(format!(
                "payment on {} at {} over {} months overflows",
                principal, rate, months
            ))
        })
}
