pub mod ledger;

use crate::amortization::Installment;
use crate::decimal::Money;
use crate::types::LoanId;

pub use ledger::{PaymentLedger, PaymentRecord};

/// Payment state supplied by the caller.
///
/// The engine never records payments itself. Status derivation asks this
/// trait whether an installment has been settled and whether an outstanding
/// balance is known for a loan.
pub trait PaymentStatus {
    fn is_installment_paid(&self, loan_id: LoanId, installment: &Installment) -> bool;

    /// balance recorded outside the schedule, if any
    fn outstanding_balance(&self, _loan_id: LoanId) -> Option<Money> {
        None
    }
}

/// no payment information: every installment is unpaid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPayments;

impl PaymentStatus for NoPayments {
    fn is_installment_paid(&self, _loan_id: LoanId, _installment: &Installment) -> bool {
        false
    }
}

/// any `(loan id, installment index) -> paid` predicate
impl<F> PaymentStatus for F
where
    F: Fn(LoanId, u32) -> bool,
{
    fn is_installment_paid(&self, loan_id: LoanId, installment: &Installment) -> bool {
        self(loan_id, installment.index)
    }
}
