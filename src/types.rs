use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// amortization method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmortizationMethod {
    /// constant amortization: equal principal, declining payment
    #[serde(rename = "SAC")]
    Sac,
    /// french amortization: equal payment, growing principal share
    #[serde(rename = "PRICE")]
    Price,
}

impl fmt::Display for AmortizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmortizationMethod::Sac => write!(f, "SAC"),
            AmortizationMethod::Price => write!(f, "PRICE"),
        }
    }
}

/// loan status derived from the schedule and an as-of date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// installments still ahead, none past due and unpaid
    Active,
    /// at least one past-due installment is unpaid
    Overdue,
    /// every installment has fallen due
    PaidOff,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Overdue => "overdue",
            LoanStatus::PaidOff => "paid_off",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&AmortizationMethod::Sac).unwrap(), "\"SAC\"");
        assert_eq!(serde_json::to_string(&AmortizationMethod::Price).unwrap(), "\"PRICE\"");
        assert_eq!(serde_json::to_string(&LoanStatus::PaidOff).unwrap(), "\"paid_off\"");

        let method: AmortizationMethod = serde_json::from_str("\"PRICE\"").unwrap();
        assert_eq!(method, AmortizationMethod::Price);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(LoanStatus::Overdue.to_string(), "overdue");
        assert_eq!(AmortizationMethod::Sac.to_string(), "SAC");
    }
}
