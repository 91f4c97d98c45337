use chrono::{Months, NaiveDate};

use crate::errors::{LoanError, Result};

/// `anchor` moved forward by whole months, clamped to the end of shorter months
pub fn add_months(anchor: NaiveDate, months: u32) -> Result<NaiveDate> {
    anchor
        .checked_add_months(Months::new(months))
        .ok_or_else(|| LoanError::InvalidDate {
            message: format!("{} plus {} months is out of range", anchor, months),
        })
}

/// due dates for `count` monthly installments starting at `first_due`
///
/// Every date is computed from the anchor rather than from the previous
/// date, so a 31st anchor returns to the 31st after passing through February.
pub fn monthly_due_dates(first_due: NaiveDate, count: u32) -> Result<Vec<NaiveDate>> {
    (0..count).map(|offset| add_months(first_due, offset)).collect()
}
