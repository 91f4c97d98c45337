use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::Installment;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::payments::PaymentStatus;
use crate::types::LoanId;

/// a payment received against one installment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub loan_id: LoanId,
    /// installment number the payment settles
    pub installment_index: u32,
    pub payment_date: NaiveDate,
    pub amount_paid: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PaymentRecord {
    pub fn validate(&self) -> Result<()> {
        if self.installment_index == 0 {
            return Err(LoanError::InvalidPayment {
                message: "installment numbers start at 1".to_string(),
            });
        }

        if !self.amount_paid.is_positive() {
            return Err(LoanError::InvalidPayment {
                message: format!("amount must be positive, got {}", self.amount_paid),
            });
        }

        if self.principal_paid.is_negative() || self.interest_paid.is_negative() {
            return Err(LoanError::InvalidPayment {
                message: "principal and interest shares cannot be negative".to_string(),
            });
        }

        let allocated = self.principal_paid.checked_add(self.interest_paid);
        if allocated.map_or(true, |allocated| allocated > self.amount_paid) {
            return Err(LoanError::InvalidPayment {
                message: format!(
                    "principal {} plus interest {} exceeds amount {}",
                    self.principal_paid, self.interest_paid, self.amount_paid
                ),
            });
        }

        Ok(())
    }
}

/// In-memory payment history per loan.
///
/// An installment counts as paid once the amounts recorded against it cover
/// its total payment; partial payments leave it unpaid. Outstanding balances
/// are only reported for loans registered with [`PaymentLedger::register`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentLedger {
    records: HashMap<LoanId, Vec<PaymentRecord>>,
    principals: HashMap<LoanId, Money>,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// track the principal of a loan so its outstanding balance can be reported
    pub fn register(&mut self, loan_id: LoanId, principal: Money) {
        self.principals.insert(loan_id, principal);
    }

    /// store a validated payment; a loan's recorded total must stay within the decimal range
    pub fn record(&mut self, payment: PaymentRecord) -> Result<()> {
        payment.validate()?;
        if self.total_paid(payment.loan_id).checked_add(payment.amount_paid).is_none() {
            return Err(LoanError::InvalidPayment {
                message: format!("total paid on loan {} overflows", payment.loan_id),
            });
        }
        self.records.entry(payment.loan_id).or_default().push(payment);
        Ok(())
    }

    pub fn payments_for(&self, loan_id: LoanId) -> &[PaymentRecord] {
        self.records.get(&loan_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// sum of amounts recorded against one installment
    pub fn amount_paid_for(&self, loan_id: LoanId, installment_index: u32) -> Money {
        self.payments_for(loan_id)
            .iter()
            .filter(|p| p.installment_index == installment_index)
            .map(|p| p.amount_paid)
            .sum()
    }

    pub fn total_paid(&self, loan_id: LoanId) -> Money {
        self.payments_for(loan_id).iter().map(|p| p.amount_paid).sum()
    }

    pub fn principal_paid(&self, loan_id: LoanId) -> Money {
        self.payments_for(loan_id).iter().map(|p| p.principal_paid).sum()
    }

    pub fn interest_paid(&self, loan_id: LoanId) -> Money {
        self.payments_for(loan_id).iter().map(|p| p.interest_paid).sum()
    }

    /// forget a loan and its payments
    pub fn remove(&mut self, loan_id: LoanId) {
        self.records.remove(&loan_id);
        self.principals.remove(&loan_id);
    }
}

impl PaymentStatus for PaymentLedger {
    fn is_installment_paid(&self, loan_id: LoanId, installment: &Installment) -> bool {
        self.amount_paid_for(loan_id, installment.index) >= installment.total_payment
    }

    fn outstanding_balance(&self, loan_id: LoanId) -> Option<Money> {
        let principal = self.principals.get(&loan_id)?;
        let balance = principal
            .checked_sub(self.principal_paid(loan_id))
            .map_or(Money::ZERO, |balance| balance.max(Money::ZERO));
        Some(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn payment(loan_id: LoanId, index: u32, amount: i64, principal: i64) -> PaymentRecord {
        PaymentRecord {
            loan_id,
            installment_index: index,
            payment_date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            amount_paid: Money::from_major(amount),
            principal_paid: Money::from_major(principal),
            interest_paid: Money::from_major(amount - principal),
            notes: None,
        }
    }

    fn installment(index: u32, total: i64) -> Installment {
        Installment {
            index,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            principal_portion: Money::from_major(total),
            interest_portion: Money::ZERO,
            total_payment: Money::from_major(total),
            remaining_principal_after: Money::ZERO,
        }
    }

    #[test]
    fn test_partial_payment_does_not_settle() {
        let loan_id = Uuid::new_v4();
        let mut ledger = PaymentLedger::new();
        ledger.record(payment(loan_id, 1, 600, 500)).unwrap();

        assert!(!ledger.is_installment_paid(loan_id, &installment(1, 1_200)));

        ledger.record(payment(loan_id, 1, 600, 500)).unwrap();
        assert!(ledger.is_installment_paid(loan_id, &installment(1, 1_200)));
        assert!(!ledger.is_installment_paid(loan_id, &installment(2, 1_200)));
    }

    #[test]
    fn test_outstanding_balance_requires_registration() {
        let loan_id = Uuid::new_v4();
        let mut ledger = PaymentLedger::new();
        ledger.record(payment(loan_id, 1, 1_200, 1_000)).unwrap();
        assert_eq!(ledger.outstanding_balance(loan_id), None);

        ledger.register(loan_id, Money::from_major(10_000));
        assert_eq!(ledger.outstanding_balance(loan_id), Some(Money::from_major(9_000)));
        assert_eq!(ledger.total_paid(loan_id), Money::from_major(1_200));
        assert_eq!(ledger.interest_paid(loan_id), Money::from_major(200));
    }

    #[test]
    fn test_outstanding_balance_never_negative() {
        let loan_id = Uuid::new_v4();
        let mut ledger = PaymentLedger::new();
        ledger.register(loan_id, Money::from_major(100));
        ledger.record(payment(loan_id, 1, 150, 150)).unwrap();
        assert_eq!(ledger.outstanding_balance(loan_id), Some(Money::ZERO));
    }

    #[test]
    fn test_invalid_records_rejected() {
        let loan_id = Uuid::new_v4();
        let mut ledger = PaymentLedger::new();

        assert!(ledger.record(payment(loan_id, 0, 100, 100)).is_err());
        assert!(ledger.record(payment(loan_id, 1, 0, 0)).is_err());

        let mut overstated = payment(loan_id, 1, 100, 80);
        overstated.interest_paid = Money::from_major(30);
        assert!(matches!(
            ledger.record(overstated),
            Err(LoanError::InvalidPayment { .. })
        ));

        assert!(ledger.payments_for(loan_id).is_empty());
    }

    #[test]
    fn test_remove_forgets_loan() {
        let loan_id = Uuid::new_v4();
        let mut ledger = PaymentLedger::new();
        ledger.register(loan_id, Money::from_major(100));
        ledger.record(payment(loan_id, 1, 50, 50)).unwrap();
        ledger.remove(loan_id);
        assert_eq!(ledger.outstanding_balance(loan_id), None);
        assert_eq!(ledger.total_paid(loan_id), Money::ZERO);
    }

    #[test]
    fn test_overflowing_payments_rejected() {
        let loan_id = Uuid::new_v4();
        let mut ledger = PaymentLedger::new();
        let max = Money::from_decimal(rust_decimal::Decimal::MAX);

        let mut whole = payment(loan_id, 1, 1, 1);
        whole.amount_paid = max;
        whole.principal_paid = max;
        whole.interest_paid = Money::ZERO;
        ledger.record(whole.clone()).unwrap();
        assert!(matches!(ledger.record(whole), Err(LoanError::InvalidPayment { .. })));

        let mut split = payment(Uuid::new_v4(), 1, 1, 1);
        split.amount_paid = max;
        split.principal_paid = max;
        split.interest_paid = max;
        assert!(matches!(ledger.record(split), Err(LoanError::InvalidPayment { .. })));

        assert_eq!(ledger.total_paid(loan_id), max);
        ledger.register(loan_id, -max);
        assert_eq!(ledger.outstanding_balance(loan_id), Some(Money::ZERO));
    }
}
