pub mod calendar;
pub mod generator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CurrencyConfig;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::terms::LoanTerms;
use crate::types::AmortizationMethod;

pub use generator::ScheduleGenerator;

/// one scheduled installment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based position in the schedule
    pub index: u32,
    pub due_date: NaiveDate,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub total_payment: Money,
    pub remaining_principal_after: Money,
}

/// amortization schedule for one loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub principal: Money,
    pub method: AmortizationMethod,
    pub installments: Vec<Installment>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Installment> {
        self.installments.iter()
    }

    /// installment by its 1-based index
    pub fn installment(&self, index: u32) -> Option<&Installment> {
        let position = index.checked_sub(1)?;
        self.installments.get(position as usize)
    }

    pub fn first(&self) -> Option<&Installment> {
        self.installments.first()
    }

    pub fn last(&self) -> Option<&Installment> {
        self.installments.last()
    }

    /// outstanding principal once `index` installments are paid
    pub fn balance_after(&self, index: u32) -> Money {
        self.installment(index)
            .map(|i| i.remaining_principal_after)
            .unwrap_or(self.principal)
    }

    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.last().map(|i| i.due_date)
    }

    /// first installment due on or after `as_of`
    pub fn next_due(&self, as_of: NaiveDate) -> Option<&Installment> {
        self.installments.iter().find(|i| i.due_date >= as_of)
    }

    pub fn total_principal(&self) -> Money {
        self.installments.iter().map(|i| i.principal_portion).sum()
    }

    pub fn total_interest(&self) -> Money {
        self.installments.iter().map(|i| i.interest_portion).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.installments.iter().map(|i| i.total_payment).sum()
    }

    /// Check the schedule against the terms it claims to amortize.
    ///
    /// Fails with [`LoanError::ScheduleComputation`] on the first broken
    /// invariant: length, indexing, monthly due dates, per-row arithmetic,
    /// non-increasing balance, exact amortization to zero. A verified
    /// schedule's totals fit a `Decimal`, so the `total_*` sums cannot overflow.
    pub fn verify(&self, terms: &LoanTerms, currency: &CurrencyConfig) -> Result<()> {
        if self.len() != terms.term_months as usize {
            return Err(LoanError::computation(format!(
                "schedule has {} installments, term is {} months",
                self.len(),
                terms.term_months
            )));
        }

        if self.principal != terms.principal_amount || self.method != terms.amortization_method {
            return Err(LoanError::computation(
                "schedule principal or method differs from the loan terms",
            ));
        }

        let due_dates = calendar::monthly_due_dates(terms.first_payment_due_date, terms.term_months)?;
        let mut balance = terms.principal_amount;
        let mut paid = Money::ZERO;

        for (position, (installment, expected_due)) in self.installments.iter().zip(due_dates).enumerate() {
            let index = position as u32 + 1;
            if installment.index != index {
                return Err(LoanError::computation(format!(
                    "installment at position {} carries index {}",
                    index, installment.index
                )));
            }

            if installment.due_date != expected_due {
                return Err(LoanError::computation(format!(
                    "installment {} due {}, expected {}",
                    index, installment.due_date, expected_due
                )));
            }

            let amounts = [
                installment.principal_portion,
                installment.interest_portion,
                installment.total_payment,
                installment.remaining_principal_after,
            ];
            if amounts.iter().any(|m| m.is_negative() || !m.fits_precision(currency.decimal_places)) {
                return Err(LoanError::computation(format!(
                    "installment {} has a negative or unrounded amount",
                    index
                )));
            }

            let row_total = installment.principal_portion.checked_add(installment.interest_portion);
            if row_total != Some(installment.total_payment) {
                return Err(LoanError::computation(format!(
                    "installment {} total {} is not principal {} plus interest {}",
                    index,
                    installment.total_payment,
                    installment.principal_portion,
                    installment.interest_portion
                )));
            }

            paid = paid.checked_add(installment.total_payment).ok_or_else(|| {
                LoanError::computation(format!(
                    "total paid overflows at installment {}",
                    index
                ))
            })?;

            balance -= installment.principal_portion;
            if installment.remaining_principal_after != balance {
                return Err(LoanError::computation(format!(
                    "installment {} leaves {} outstanding, expected {}",
                    index, installment.remaining_principal_after, balance
                )));
            }
        }

        if !balance.is_zero() {
            return Err(LoanError::computation(format!(
                "schedule leaves {} unamortized",
                balance
            )));
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Installment;
    type IntoIter = std::slice::Iter<'a, Installment>;

    fn into_iter(self) -> Self::IntoIter {
        self.installments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::decimal::Rate;
    use rust_decimal_macros::dec;

    fn terms() -> LoanTerms {
        LoanTerms {
            borrower_name: "Ana".to_string(),
            principal_amount: Money::from_major(1_000),
            monthly_interest_rate: Rate::from_percentage(dec!(1)),
            term_months: 3,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            first_payment_due_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            amortization_method: AmortizationMethod::Sac,
        }
    }

    fn schedule() -> Schedule {
        ScheduleGenerator::default().generate(&terms()).unwrap()
    }

    #[test]
    fn test_lookup_helpers() {
        let schedule = schedule();
        assert_eq!(schedule.len(), 3);
        assert!(schedule.installment(0).is_none());
        assert!(schedule.installment(4).is_none());
        assert_eq!(schedule.installment(2).unwrap().index, 2);
        assert_eq!(schedule.balance_after(0), Money::from_major(1_000));
        assert_eq!(schedule.balance_after(1), Money::from_str_exact("666.67").unwrap());
        assert_eq!(schedule.balance_after(3), Money::ZERO);
        assert_eq!(
            schedule.final_due_date(),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
    }

    #[test]
    fn test_totals() {
        let schedule = schedule();
        // 10.00 + 6.67 + 3.33
        assert_eq!(schedule.total_interest(), Money::from_major(20));
        assert_eq!(schedule.total_principal(), Money::from_major(1_000));
        assert_eq!(schedule.total_paid(), Money::from_major(1_020));
    }

    #[test]
    fn test_next_due_includes_due_today() {
        let schedule = schedule();
        let on_due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(schedule.next_due(on_due).unwrap().index, 2);

        let after_last = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(schedule.next_due(after_last).is_none());
    }

    #[test]
    fn test_verify_detects_tampering() {
        let currency = EngineConfig::default().currency;
        let terms = terms();

        let mut truncated = schedule();
        truncated.installments.pop();
        assert!(truncated.verify(&terms, &currency).is_err());

        let mut skewed = schedule();
        skewed.installments[1].interest_portion += Money::CENT;
        assert!(matches!(
            skewed.verify(&terms, &currency),
            Err(LoanError::ScheduleComputation { .. })
        ));

        let mut unbalanced = schedule();
        unbalanced.installments[2].principal_portion -= Money::CENT;
        unbalanced.installments[2].total_payment -= Money::CENT;
        assert!(unbalanced.verify(&terms, &currency).is_err());

        assert!(schedule().verify(&terms, &currency).is_ok());
    }
}
