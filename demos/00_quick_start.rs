//! quick start - generate a schedule and preview the payment
use loan_portfolio_engine::{AmortizationMethod, LoanTerms, Money, Rate, ScheduleGenerator};
use loan_portfolio_engine::chrono::NaiveDate;
use loan_portfolio_engine::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 10).ok_or("bad date")?;

    // R$10,000 at 2% a month over 10 months
    let terms = LoanTerms::builder()
        .borrower("Maria Silva")
        .principal(Money::from_major(10_000))
        .monthly_rate(Rate::from_percentage(Decimal::from(2)))
        .term_months(10)
        .start_date(start)
        .method(AmortizationMethod::Price)
        .build()?;

    let generator = ScheduleGenerator::default();
    println!("estimated payment: R${}", generator.estimate_payment(&terms)?);

    let schedule = generator.generate(&terms)?;
    println!("\n #  due         principal   interest    total       balance");
    for i in &schedule {
        println!(
            "{:>2}  {}  {:>10}  {:>10}  {:>10}  {:>10}",
            i.index, i.due_date, i.principal_portion, i.interest_portion, i.total_payment,
            i.remaining_principal_after
        );
    }
    println!("\ntotal interest: R${}", schedule.total_interest());

    Ok(())
}
