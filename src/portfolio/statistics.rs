use serde::Serialize;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{LoanId, LoanStatus};

/// portfolio statistics, recomputed on demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct PortfolioStatistics {
    pub total_loans: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub paid_off_loans: usize,
    /// principal of every loan regardless of status
    pub total_principal: Money,
    /// interest portion of the next installment, summed over active loans
    pub monthly_income: Money,
    /// overdue loans as a fraction of all loans
    pub overdue_rate: Rate,
}

impl PortfolioStatistics {
    /// Fold one loan into the totals.
    ///
    /// Leaves the statistics untouched and fails with
    /// [`LoanError::AggregationOverflow`] when a running total would overflow.
    pub(crate) fn include(
        &mut self,
        principal: Money,
        status: LoanStatus,
        next_interest: Option<Money>,
    ) -> Result<()> {
        let total_principal = self.total_principal.checked_add(principal).ok_or_else(|| {
            LoanError::AggregationOverflow {
                message: format!("total principal {} plus {} overflows", self.total_principal, principal),
            }
        })?;

        let monthly_income = match (status, next_interest) {
            (LoanStatus::Active, Some(interest)) => {
                self.monthly_income.checked_add(interest).ok_or_else(|| {
                    LoanError::AggregationOverflow {
                        message: format!("monthly income {} plus {} overflows", self.monthly_income, interest),
                    }
                })?
            }
            _ => self.monthly_income,
        };

        self.total_loans += 1;
        self.total_principal = total_principal;
        self.monthly_income = monthly_income;

        match status {
            LoanStatus::Active => self.active_loans += 1,
            LoanStatus::Overdue => self.overdue_loans += 1,
            LoanStatus::PaidOff => self.paid_off_loans += 1,
        }

        self.overdue_rate = Rate::ratio(self.overdue_loans, self.total_loans);
        Ok(())
    }
}

/// derived status for one loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanStatusEntry {
    pub loan_id: LoanId,
    pub borrower_name: String,
    pub status: LoanStatus,
    /// total of the next installment due, if any remains
    pub next_payment: Option<Money>,
}

/// a loan left out of the statistics and why
#[derive(Debug)]
pub struct LoanFailure {
    pub loan_id: LoanId,
    pub borrower_name: String,
    pub error: LoanError,
}

/// aggregation result: statistics over valid loans plus per-loan failures
#[derive(Debug, Default)]
pub struct PortfolioReport {
    pub statistics: PortfolioStatistics,
    pub statuses: Vec<LoanStatusEntry>,
    pub failures: Vec<LoanFailure>,
}

impl PortfolioReport {
    /// true when every loan contributed to the statistics
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn status_of(&self, loan_id: LoanId) -> Option<LoanStatus> {
        self.statuses
            .iter()
            .find(|entry| entry.loan_id == loan_id)
            .map(|entry| entry.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_statistics_are_zero() {
        let stats = PortfolioStatistics::default();
        assert_eq!(stats.total_loans, 0);
        assert_eq!(stats.total_principal, Money::ZERO);
        assert_eq!(stats.monthly_income, Money::ZERO);
        assert_eq!(stats.overdue_rate, Rate::ZERO);
    }

    #[test]
    fn test_include_counts_by_status() {
        let mut stats = PortfolioStatistics::default();
        stats.include(Money::from_major(1_000), LoanStatus::Active, Some(Money::from_major(10))).unwrap();
        stats.include(Money::from_major(2_000), LoanStatus::Overdue, Some(Money::from_major(40))).unwrap();
        stats.include(Money::from_major(500), LoanStatus::PaidOff, None).unwrap();
        stats.include(Money::from_major(700), LoanStatus::Active, None).unwrap();

        assert_eq!(stats.total_loans, 4);
        assert_eq!(stats.active_loans, 2);
        assert_eq!(stats.overdue_loans, 1);
        assert_eq!(stats.paid_off_loans, 1);
        assert_eq!(stats.total_principal, Money::from_major(4_200));
        // overdue interest is not income
        assert_eq!(stats.monthly_income, Money::from_major(10));
        assert_eq!(stats.overdue_rate.as_decimal(), dec!(0.25));
    }

    #[test]
    fn test_include_rejects_overflow_without_partial_update() {
        let max = Money::from_decimal(rust_decimal::Decimal::MAX);
        let mut stats = PortfolioStatistics::default();
        stats.include(max, LoanStatus::Active, Some(Money::ONE)).unwrap();

        let result = stats.include(Money::ONE, LoanStatus::Overdue, None);
        assert!(matches!(result, Err(LoanError::AggregationOverflow { .. })));

        let result = stats.include(Money::ZERO, LoanStatus::Active, Some(max));
        assert!(matches!(result, Err(LoanError::AggregationOverflow { .. })));

        assert_eq!(stats.total_loans, 1);
        assert_eq!(stats.overdue_loans, 0);
        assert_eq!(stats.total_principal, max);
        assert_eq!(stats.monthly_income, Money::ONE);
    }
}
