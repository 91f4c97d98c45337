use chrono::NaiveDate;
use serde::Serialize;

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::loan::LoanRecord;
use crate::payments::PaymentStatus;
use crate::portfolio::PortfolioAggregator;
use crate::types::LoanStatus;

/// loans whose borrower name contains `query`, ignoring case; an empty query matches all
pub fn filter_by_borrower<'a>(loans: &'a [LoanRecord], query: &str) -> Vec<&'a LoanRecord> {
    let needle = query.trim().to_lowercase();
    loans
        .iter()
        .filter(|loan| needle.is_empty() || loan.borrower_name().to_lowercase().contains(&needle))
        .collect()
}

/// totals shown under a (possibly filtered) loan list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct LoanListSummary {
    pub count: usize,
    pub total_principal: Money,
    pub active: usize,
}

impl LoanListSummary {
    /// fails with [`LoanError::AggregationOverflow`] when the principal total overflows
    pub fn summarize<P>(
        loans: &[&LoanRecord],
        aggregator: &PortfolioAggregator,
        as_of: NaiveDate,
        payments: &P,
    ) -> Result<Self>
    where
        P: PaymentStatus + ?Sized,
    {
        loans.iter().try_fold(Self::default(), |mut summary, loan| {
            summary.total_principal = summary
                .total_principal
                .checked_add(loan.principal())
                .ok_or_else(|| LoanError::AggregationOverflow {
                    message: format!("loan list principal overflows at {}", loan.id),
                })?;
            summary.count += 1;
            if aggregator.derive_status(loan, as_of, payments) == LoanStatus::Active {
                summary.active += 1;
            }
            Ok(summary)
        })
    }
}
