pub mod search;
pub mod statistics;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{info, warn};

use crate::amortization::ScheduleGenerator;
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::loan::LoanRecord;
use crate::parallel::maybe_parallel_map;
use crate::payments::PaymentStatus;
use crate::terms::LoanTerms;
use crate::types::{LoanId, LoanStatus};

pub use search::{filter_by_borrower, LoanListSummary};
pub use statistics::{LoanFailure, LoanStatusEntry, PortfolioReport, PortfolioStatistics};

/// Derives loan status and portfolio statistics.
///
/// Stateless apart from its configuration; every call depends only on its
/// arguments, so one aggregator can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PortfolioAggregator {
    generator: ScheduleGenerator,
}

/// per-loan outcome computed before folding into the statistics
struct Evaluation {
    status: LoanStatus,
    next_interest: Option<Money>,
    next_payment: Option<Money>,
}

impl PortfolioAggregator {
    /// aggregator for a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            generator: ScheduleGenerator::new(config)?,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.generator.config()
    }

    pub fn generator(&self) -> &ScheduleGenerator {
        &self.generator
    }

    /// Status of one loan as of a calendar date, in priority order:
    ///
    /// 1. `PaidOff` when the schedule is non-empty, every installment is due
    ///    on or before `as_of` and the payment source reports no outstanding
    ///    balance;
    /// 2. `Overdue` when an installment due before `as_of` (plus grace) is unpaid;
    /// 3. `Active` otherwise.
    ///
    /// The record is not verified here; a record without installments is
    /// never paid off. [`PortfolioAggregator::aggregate`] verifies first.
    pub fn derive_status<P>(&self, loan: &LoanRecord, as_of: NaiveDate, payments: &P) -> LoanStatus
    where
        P: PaymentStatus + ?Sized,
    {
        let all_due = !loan.schedule.is_empty() && loan.schedule.iter().all(|i| i.due_date <= as_of);
        let balance_cleared = payments
            .outstanding_balance(loan.id)
            .map_or(true, |balance| balance.is_zero());

        if all_due && balance_cleared {
            return LoanStatus::PaidOff;
        }

        let grace = self.config().status.grace_period_days;
        if loan.past_due_installments(as_of, grace, payments).next().is_some() {
            return LoanStatus::Overdue;
        }

        LoanStatus::Active
    }

    /// status as of today's UTC date from the time provider
    pub fn derive_status_now<P>(&self, loan: &LoanRecord, time: &SafeTimeProvider, payments: &P) -> LoanStatus
    where
        P: PaymentStatus + ?Sized,
    {
        self.derive_status(loan, time.now().date_naive(), payments)
    }

    /// Aggregate stored loan records.
    ///
    /// Records that fail verification, or whose amounts would overflow the
    /// portfolio totals, are excluded from the statistics and listed in
    /// `failures`; the aggregation itself never fails.
    pub fn aggregate<P>(&self, loans: &[LoanRecord], as_of: NaiveDate, payments: &P) -> PortfolioReport
    where
        P: PaymentStatus + Sync + ?Sized,
    {
        let evaluations = maybe_parallel_map(loans, self.config().parallel_threshold, |loan| {
            loan.verify(&self.generator)
                .map(|()| self.evaluate(loan, as_of, payments))
        });

        let mut report = PortfolioReport::default();

        for (loan, evaluation) in loans.iter().zip(evaluations) {
            let included = evaluation.and_then(|evaluation| {
                report
                    .statistics
                    .include(loan.principal(), evaluation.status, evaluation.next_interest)?;
                Ok(evaluation)
            });

            match included {
                Ok(evaluation) => {
                    report.statuses.push(LoanStatusEntry {
                        loan_id: loan.id,
                        borrower_name: loan.terms.borrower_name.clone(),
                        status: evaluation.status,
                        next_payment: evaluation.next_payment,
                    });
                }
                Err(error) => report.failures.push(excluded(loan.id, &loan.terms, error)),
            }
        }

        info!(
            %as_of,
            total_loans = report.statistics.total_loans,
            active_loans = report.statistics.active_loans,
            overdue_loans = report.statistics.overdue_loans,
            total_principal = %report.statistics.total_principal,
            monthly_income = %report.statistics.monthly_income,
            failures = report.failures.len(),
            "aggregated loan portfolio"
        );

        report
    }

    /// Aggregate loans given only by their terms, generating each schedule first.
    pub fn aggregate_terms<P>(
        &self,
        loans: &[(LoanId, LoanTerms)],
        as_of: NaiveDate,
        payments: &P,
    ) -> PortfolioReport
    where
        P: PaymentStatus + Sync + ?Sized,
    {
        let generated = maybe_parallel_map(loans, self.config().parallel_threshold, |(id, terms)| {
            self.generator
                .generate(terms)
                .map(|schedule| LoanRecord {
                    id: *id,
                    terms: terms.clone(),
                    schedule,
                })
        });

        let mut records = Vec::with_capacity(loans.len());
        let mut failures = Vec::new();
        for ((id, terms), result) in loans.iter().zip(generated) {
            match result {
                Ok(record) => records.push(record),
                Err(error) => failures.push(excluded(*id, terms, error)),
            }
        }

        let mut report = self.aggregate(&records, as_of, payments);
        failures.append(&mut report.failures);
        report.failures = failures;
        report
    }

    /// aggregate as of today's UTC date from the time provider
    pub fn aggregate_now<P>(&self, loans: &[LoanRecord], time: &SafeTimeProvider, payments: &P) -> PortfolioReport
    where
        P: PaymentStatus + Sync + ?Sized,
    {
        self.aggregate(loans, time.now().date_naive(), payments)
    }

    fn evaluate<P>(&self, loan: &LoanRecord, as_of: NaiveDate, payments: &P) -> Evaluation
    where
        P: PaymentStatus + ?Sized,
    {
        let next = loan.next_installment(as_of);
        Evaluation {
            status: self.derive_status(loan, as_of, payments),
            next_interest: next.map(|i| i.interest_portion),
            next_payment: next.map(|i| i.total_payment),
        }
    }
}

fn excluded(loan_id: LoanId, terms: &LoanTerms, error: LoanError) -> LoanFailure {
    warn!(%loan_id, borrower = %terms.borrower_name, %error, "loan excluded from portfolio statistics");
    LoanFailure {
        loan_id,
        borrower_name: terms.borrower_name.clone(),
        error,
    }
}
