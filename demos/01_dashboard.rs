//! dashboard - aggregate a small portfolio and print the json payload
use loan_portfolio_engine::chrono::NaiveDate;
use loan_portfolio_engine::{
    AmortizationMethod, DashboardView, Decimal, LoanRecord, LoanTerms, Money, PaymentLedger,
    PaymentRecord, PortfolioAggregator, Rate,
};

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date")?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let aggregator = PortfolioAggregator::default();
    let generator = aggregator.generator();

    let on_time = LoanRecord::originate(
        LoanTerms::builder()
            .borrower("Ana Costa")
            .principal(Money::from_major(5_000))
            .monthly_rate(Rate::from_percentage(Decimal::new(25, 1)))
            .term_months(12)
            .start_date(date(2024, 1, 5)?)
            .method(AmortizationMethod::Sac)
            .build()?,
        generator,
    )?;

    let late = LoanRecord::originate(
        LoanTerms::builder()
            .borrower("Bruno Dias")
            .principal(Money::from_major(8_000))
            .monthly_rate(Rate::from_percentage(Decimal::from(3)))
            .term_months(6)
            .start_date(date(2024, 1, 20)?)
            .method(AmortizationMethod::Price)
            .build()?,
        generator,
    )?;

    // ana paid her first two installments, bruno paid nothing
    let mut ledger = PaymentLedger::new();
    for loan in [&on_time, &late] {
        ledger.register(loan.id, loan.principal());
    }
    for installment in on_time.schedule.iter().take(2) {
        ledger.record(PaymentRecord {
            loan_id: on_time.id,
            installment_index: installment.index,
            payment_date: installment.due_date,
            amount_paid: installment.total_payment,
            principal_paid: installment.principal_portion,
            interest_paid: installment.interest_portion,
            notes: None,
        })?;
    }

    let report = aggregator.aggregate(&[on_time, late], date(2024, 3, 20)?, &ledger);
    for entry in &report.statuses {
        println!("{:<12} {}", entry.borrower_name, entry.status);
    }

    println!("{}", DashboardView::from_report(&report).to_json_pretty()?);

    Ok(())
}
