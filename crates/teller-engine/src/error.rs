//! Operation error taxonomy.
//!
//! Every failure is either user-correctable (the caller re-prompts and
//! retries) or a data-integrity failure (the program cannot safely
//! continue). There are no retries inside the engine.

use teller_auth::AccessDenied;
use teller_store::StoreError;
use thiserror::Error;

/// A transaction amount was rejected before any mutation.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum InvalidAmount {
    /// Amounts must be strictly positive.
    #[error("amount must be positive, got {0}")]
    NotPositive(f64),

    /// A withdrawal may not drive the balance negative.
    #[error("amount {amount} exceeds current balance {balance}")]
    ExceedsBalance { amount: f64, balance: f64 },
}

/// Errors from the gated CRUD and transaction operations.
#[derive(Debug, Error)]
pub enum OpError {
    /// The session lacks the required capability. No load was performed.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),

    /// Lookup by unique key found nothing. Surfaced as a message; the
    /// operation ends without mutation and the program continues.
    #[error("no record found for key '{0}'")]
    KeyNotFound(String),

    /// The add flow found the key among the freshly loaded records.
    /// Surfaced as a message; the caller re-prompts.
    #[error("a record with key '{0}' already exists")]
    DuplicateKey(String),

    /// The key field was empty; keys must be non-empty.
    #[error("record key must not be empty")]
    EmptyKey,

    /// A transaction amount failed validation. Never silently clamped.
    #[error(transparent)]
    InvalidAmount(#[from] InvalidAmount),

    /// The target user holds the full-access sentinel and is shielded
    /// from the user-management flows.
    #[error("user '{0}' holds full access and cannot be updated or removed")]
    ProtectedUser(String),

    /// Username/password pair matched no live user.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The backing store failed (malformed record or I/O).
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OpError {
    /// Returns `true` when the program cannot safely continue.
    ///
    /// Only a corrupt store is fatal; everything else is surfaced to the
    /// operator and the main loop goes on.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_fatal())
    }
}
