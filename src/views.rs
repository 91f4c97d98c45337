//! serializable views handed to the presentation layer
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::Installment;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::loan::LoanRecord;
use crate::portfolio::{PortfolioReport, PortfolioStatistics};
use crate::types::{AmortizationMethod, LoanId, LoanStatus};

/// dashboard statistics, field names as the dashboard expects them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStatsView {
    pub total_loans: usize,
    pub active_loans: usize,
    pub total_principal: Money,
    pub monthly_income: Money,
    pub overdue_loans: usize,
    /// overdue share as a percentage
    pub overdue_rate: rust_decimal::Decimal,
}

impl DashboardStatsView {
    pub fn from_statistics(stats: &PortfolioStatistics) -> Self {
        Self {
            total_loans: stats.total_loans,
            active_loans: stats.active_loans,
            total_principal: stats.total_principal,
            monthly_income: stats.monthly_income,
            overdue_loans: stats.overdue_loans,
            overdue_rate: stats.overdue_rate.as_percentage().round_dp(2),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// one row of the loan list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub borrower_name: String,
    pub principal_amount: Money,
    pub interest_rate: Rate,
    pub loan_term_months: u32,
    pub start_date: NaiveDate,
    pub first_payment_due_date: NaiveDate,
    pub loan_type: AmortizationMethod,
    pub status: LoanStatus,
    pub next_payment_amount: Option<Money>,
}

impl LoanView {
    pub fn new(loan: &LoanRecord, status: LoanStatus, as_of: NaiveDate) -> Self {
        Self {
            id: loan.id,
            borrower_name: loan.terms.borrower_name.clone(),
            principal_amount: loan.terms.principal_amount,
            interest_rate: loan.terms.monthly_interest_rate,
            loan_term_months: loan.terms.term_months,
            start_date: loan.terms.start_date,
            first_payment_due_date: loan.terms.first_payment_due_date,
            loan_type: loan.terms.amortization_method,
            status,
            next_payment_amount: loan.next_payment_amount(as_of),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentView {
    pub payment_number: u32,
    pub due_date: NaiveDate,
    pub principal: Money,
    pub interest: Money,
    pub total: Money,
    pub outstanding_balance: Money,
}

impl From<&Installment> for InstallmentView {
    fn from(installment: &Installment) -> Self {
        Self {
            payment_number: installment.index,
            due_date: installment.due_date,
            principal: installment.principal_portion,
            interest: installment.interest_portion,
            total: installment.total_payment,
            outstanding_balance: installment.remaining_principal_after,
        }
    }
}

/// per-loan error line for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanErrorView {
    pub loan_id: LoanId,
    pub borrower_name: String,
    pub error: String,
}

/// statistics plus data-quality errors in one payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub stats: DashboardStatsView,
    pub errors: Vec<LoanErrorView>,
}

impl DashboardView {
    pub fn from_report(report: &PortfolioReport) -> Self {
        Self {
            stats: DashboardStatsView::from_statistics(&report.statistics),
            errors: report
                .failures
                .iter()
                .map(|failure| LoanErrorView {
                    loan_id: failure.loan_id,
                    borrower_name: failure.borrower_name.clone(),
                    error: failure.error.to_string(),
                })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
