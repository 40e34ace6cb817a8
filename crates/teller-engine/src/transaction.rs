//! Balance transactions.
//!
//! A transaction is validated against the current balance, explicitly
//! confirmed, and only then applied and persisted. The ordering is
//! fixed: validate → confirm → apply. Confirming before validating
//! would let an operator approve an amount later revealed to be invalid.

use crate::error::InvalidAmount;

/// Direction of a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Adds the amount to the balance.
    Deposit,
    /// Subtracts the amount; must not drive the balance negative.
    Withdraw,
}

/// A validated-amount balance change, not yet applied.
///
/// # Example
///
/// ```
/// use teller_engine::Transaction;
///
/// let tx = Transaction::withdraw(40.0).expect("positive amount");
/// assert!(tx.validate(100.0).is_ok());
/// assert!(tx.validate(30.0).is_err());
/// assert_eq!(tx.apply(100.0), 60.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    kind: TransactionKind,
    amount: f64,
}

impl Transaction {
    /// Creates a deposit.
    ///
    /// # Errors
    ///
    /// [`InvalidAmount::NotPositive`] when `amount <= 0`.
    pub fn deposit(amount: f64) -> Result<Self, InvalidAmount> {
        Self::new(TransactionKind::Deposit, amount)
    }

    /// Creates a withdrawal.
    ///
    /// # Errors
    ///
    /// [`InvalidAmount::NotPositive`] when `amount <= 0`.
    pub fn withdraw(amount: f64) -> Result<Self, InvalidAmount> {
        Self::new(TransactionKind::Withdraw, amount)
    }

    fn new(kind: TransactionKind, amount: f64) -> Result<Self, InvalidAmount> {
        if amount > 0.0 {
            Ok(Self { kind, amount })
        } else {
            Err(InvalidAmount::NotPositive(amount))
        }
    }

    /// Returns the direction of this transaction.
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Returns the (positive) amount.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Checks the transaction against the current balance.
    ///
    /// Runs before the confirm gate: a withdrawal that would drive the
    /// balance negative is rejected before the operator is ever asked to
    /// confirm it.
    ///
    /// # Errors
    ///
    /// [`InvalidAmount::ExceedsBalance`] for a withdrawal larger than
    /// the balance. Deposits always validate.
    pub fn validate(&self, balance: f64) -> Result<(), InvalidAmount> {
        if self.kind == TransactionKind::Withdraw && self.amount > balance {
            return Err(InvalidAmount::ExceedsBalance {
                amount: self.amount,
                balance,
            });
        }
        Ok(())
    }

    /// Returns the amount with its sign (negative for withdrawals).
    #[must_use]
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            TransactionKind::Withdraw => -self.amount,
        }
    }

    /// Returns the balance after this transaction.
    ///
    /// Callers must [`validate`](Self::validate) first; `apply` does not
    /// re-check.
    #[must_use]
    pub fn apply(&self, balance: f64) -> f64 {
        balance + self.signed_amount()
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TransactionKind::Deposit => write!(f, "deposit {}", self.amount),
            TransactionKind::Withdraw => write!(f, "withdraw {}", self.amount),
        }
    }
}
