//! time control - watch a loan's status change as the clock moves
use loan_portfolio_engine::chrono::{Duration, NaiveDate, TimeZone, Utc};
use loan_portfolio_engine::{
    LoanRecord, LoanTerms, Money, NoPayments, PortfolioAggregator, Rate, SafeTimeProvider,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== status over time ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let aggregator = PortfolioAggregator::default();
    let loan = LoanRecord::originate(
        LoanTerms::builder()
            .borrower("Carla Nunes")
            .principal(Money::from_major(3_000))
            .monthly_rate(Rate::ZERO)
            .term_months(3)
            .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?)
            .build()?,
        aggregator.generator(),
    )?;

    for _ in 0..5 {
        println!(
            "{}: {}",
            time.now().format("%Y-%m-%d"),
            aggregator.derive_status_now(&loan, &time, &NoPayments)
        );
        controller.advance(Duration::days(31));
    }

    Ok(())
}
