//! Bank client record.

use crate::codec::{parse_field, Record};
use crate::error::DecodeError;

/// One bank client.
///
/// Wire layout (five fields):
///
/// ```text
/// accountNumber /##/ pin /##/ name /##/ phoneNumber /##/ balance
/// ```
///
/// The account number is the unique key and is immutable after creation.
/// The balance is kept non-negative by the transaction rules (a withdraw
/// exceeding the balance is rejected before mutation); the data model
/// itself does not re-enforce it. The tombstone flag never reaches the
/// wire — tombstoned records are dropped at the next full rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    /// Unique key, non-empty, immutable after creation.
    pub account_number: String,
    /// Positive PIN code.
    pub pin: u32,
    /// Free text; must not contain the separator token.
    pub name: String,
    /// Free text; must not contain the separator token.
    pub phone_number: String,
    /// Current balance.
    pub balance: f64,
    /// Tombstone flag (in-memory only).
    pub is_deleted: bool,
}

impl Client {
    /// Creates a live (non-tombstoned) client record.
    #[must_use]
    pub fn new(
        account_number: impl Into<String>,
        pin: u32,
        name: impl Into<String>,
        phone_number: impl Into<String>,
        balance: f64,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            pin,
            name: name.into(),
            phone_number: phone_number.into(),
            balance,
            is_deleted: false,
        }
    }
}

impl Record for Client {
    const FIELD_COUNT: usize = 5;

    fn key(&self) -> &str {
        &self.account_number
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.account_number.clone(),
            self.pin.to_string(),
            self.name.clone(),
            self.phone_number.clone(),
            self.balance.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, DecodeError> {
        Ok(Self {
            account_number: fields[0].to_string(),
            pin: parse_field("pin", fields[1])?,
            name: fields[2].to_string(),
            phone_number: fields[3].to_string(),
            balance: parse_field("balance", fields[4])?,
            is_deleted: false,
        })
    }
}
