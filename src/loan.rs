use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amortization::{Installment, Schedule, ScheduleGenerator};
use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::PaymentStatus;
use crate::terms::LoanTerms;
use crate::types::LoanId;

/// A loan as handed over by the loan repository: terms plus schedule.
///
/// The engine only reads records; status is derived on demand by
/// [`crate::portfolio::PortfolioAggregator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: LoanId,
    pub terms: LoanTerms,
    pub schedule: Schedule,
}

impl LoanRecord {
    /// generate the schedule for new terms under a fresh id
    pub fn originate(terms: LoanTerms, generator: &ScheduleGenerator) -> Result<Self> {
        Self::with_id(Uuid::new_v4(), terms, generator)
    }

    pub fn with_id(id: LoanId, terms: LoanTerms, generator: &ScheduleGenerator) -> Result<Self> {
        let schedule = generator.generate(&terms)?;
        Ok(Self { id, terms, schedule })
    }

    pub fn borrower_name(&self) -> &str {
        &self.terms.borrower_name
    }

    pub fn principal(&self) -> Money {
        self.terms.principal_amount
    }

    /// re-check a stored record: valid terms and a schedule that matches them
    pub fn verify(&self, generator: &ScheduleGenerator) -> Result<()> {
        self.terms.validate(generator.config())?;
        self.schedule.verify(&self.terms, &generator.config().currency)
    }

    /// next installment due on or after `as_of`
    pub fn next_installment(&self, as_of: NaiveDate) -> Option<&Installment> {
        self.schedule.next_due(as_of)
    }

    /// amount of the next installment, `None` once every installment has fallen due
    pub fn next_payment_amount(&self, as_of: NaiveDate) -> Option<Money> {
        self.next_installment(as_of).map(|i| i.total_payment)
    }

    /// installments past their due date (plus grace) and not settled
    pub fn past_due_installments<'a, P>(
        &'a self,
        as_of: NaiveDate,
        grace_period_days: u32,
        payments: &'a P,
    ) -> impl Iterator<Item = &'a Installment> + 'a
    where
        P: PaymentStatus + ?Sized,
    {
        self.schedule.iter().filter(move |installment| {
            is_past_due(installment.due_date, as_of, grace_period_days)
                && !payments.is_installment_paid(self.id, installment)
        })
    }

    /// sum owed on unpaid past-due installments
    pub fn amount_past_due<P>(&self, as_of: NaiveDate, grace_period_days: u32, payments: &P) -> Money
    where
        P: PaymentStatus + ?Sized,
    {
        self.past_due_installments(as_of, grace_period_days, payments)
            .map(|i| i.total_payment)
            .sum()
    }

    /// scheduled principal still outstanding once every installment due before `as_of` is paid
    pub fn scheduled_balance(&self, as_of: NaiveDate) -> Money {
        self.schedule
            .iter()
            .filter(|i| i.due_date < as_of)
            .last()
            .map(|i| i.remaining_principal_after)
            .unwrap_or(self.terms.principal_amount)
    }
}

/// strictly before `as_of` once the grace period is added
pub(crate) fn is_past_due(due_date: NaiveDate, as_of: NaiveDate, grace_period_days: u32) -> bool {
    match due_date.checked_add_days(chrono::Days::new(grace_period_days as u64)) {
        Some(deadline) => deadline < as_of,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::types::AmortizationMethod;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record() -> LoanRecord {
        let terms = LoanTerms {
            borrower_name: "Beatriz Lima".to_string(),
            principal_amount: Money::from_major(3_000),
            monthly_interest_rate: Rate::from_percentage(dec!(1)),
            term_months: 3,
            start_date: date(2024, 1, 5),
            first_payment_due_date: date(2024, 2, 5),
            amortization_method: AmortizationMethod::Sac,
        };
        LoanRecord::originate(terms, &ScheduleGenerator::default()).unwrap()
    }

    #[test]
    fn test_next_installment() {
        let loan = record();
        assert_eq!(loan.next_installment(date(2024, 1, 20)).unwrap().index, 1);
        assert_eq!(loan.next_installment(date(2024, 3, 5)).unwrap().index, 2);
        assert_eq!(
            loan.next_payment_amount(date(2024, 3, 6)),
            Some(Money::from_major(1_010))
        );
        assert_eq!(loan.next_payment_amount(date(2024, 4, 6)), None);
    }

    #[test]
    fn test_past_due_respects_grace_and_payments() {
        let loan = record();
        let as_of = date(2024, 3, 8);

        let unpaid: Vec<u32> = loan
            .past_due_installments(as_of, 0, &crate::payments::NoPayments)
            .map(|i| i.index)
            .collect();
        assert_eq!(unpaid, vec![1, 2]);

        let within_grace: Vec<u32> = loan
            .past_due_installments(as_of, 5, &crate::payments::NoPayments)
            .map(|i| i.index)
            .collect();
        assert_eq!(within_grace, vec![1]);

        let first_paid = |_: LoanId, index: u32| index == 1;
        assert_eq!(
            loan.amount_past_due(as_of, 0, &first_paid),
            Money::from_major(1_020)
        );
    }

    #[test]
    fn test_due_today_is_not_past_due() {
        assert!(!is_past_due(date(2024, 2, 5), date(2024, 2, 5), 0));
        assert!(is_past_due(date(2024, 2, 5), date(2024, 2, 6), 0));
        assert!(!is_past_due(date(2024, 2, 5), date(2024, 2, 6), 1));
    }

    #[test]
    fn test_scheduled_balance() {
        let loan = record();
        assert_eq!(loan.scheduled_balance(date(2024, 2, 5)), Money::from_major(3_000));
        assert_eq!(loan.scheduled_balance(date(2024, 2, 6)), Money::from_major(2_000));
        assert_eq!(loan.scheduled_balance(date(2025, 1, 1)), Money::ZERO);
    }

    #[test]
    fn test_verify_round_trips_through_json() {
        let generator = ScheduleGenerator::default();
        let loan = record();
        let json = serde_json::to_string(&loan).unwrap();
        let restored: LoanRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, loan);
        assert!(restored.verify(&generator).is_ok());

        let mut tampered = restored;
        tampered.terms.term_months = 4;
        assert!(tampered.verify(&generator).is_err());
    }
}
