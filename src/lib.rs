pub mod amortization;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod loan;
pub mod parallel;
pub mod payments;
pub mod portfolio;
pub mod terms;
pub mod types;
pub mod views;

// re-export key types
pub use amortization::{Installment, Schedule, ScheduleGenerator};
pub use config::{CurrencyConfig, EngineConfig, ScheduleConfig, StatusConfig};
pub use decimal::{Money, Rate, RoundingMode};
pub use errors::{LoanError, Result};
pub use loan::LoanRecord;
pub use payments::{NoPayments, PaymentLedger, PaymentRecord, PaymentStatus};
pub use portfolio::{
    filter_by_borrower, LoanFailure, LoanListSummary, LoanStatusEntry, PortfolioAggregator,
    PortfolioReport, PortfolioStatistics,
};
pub use terms::{LoanTerms, LoanTermsBuilder};
pub use types::{AmortizationMethod, LoanId, LoanStatus};
pub use views::{DashboardStatsView, DashboardView, InstallmentView, LoanView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
