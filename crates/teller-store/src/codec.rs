//! Delimited line codec.
//!
//! Converts a typed record to and from one line of delimiter-separated
//! text. Field order is fixed per record type; numeric fields use their
//! canonical decimal text form.
//!
//! # No escaping
//!
//! A field value containing [`SEPARATOR`] is a contract violation by the
//! caller and is **not** handled: the embedded token corrupts the parse
//! on reload. The separator was chosen to be unlikely in free text.
//!
//! # Empty fields
//!
//! Splitting preserves field positions even when a field is empty, so an
//! empty phone number does not shift the fields after it. (The legacy
//! files this format descends from were written by a splitter that
//! dropped empty segments; that was a latent field-shifting bug, fixed
//! here.)

use crate::error::DecodeError;
use std::str::FromStr;

/// Literal token joining fields on the wire.
///
/// Multi-character on purpose: single punctuation characters appear too
/// often in names and phone numbers.
pub const SEPARATOR: &str = " /##/ ";

/// A record that can live in a [`FileStore`](crate::FileStore).
///
/// Implementors supply a fixed field layout, a unique key, and a
/// tombstone flag. The tombstone is in-memory state only — it is never
/// written to the wire; tombstoned records are simply dropped when the
/// file is rewritten.
pub trait Record: Sized {
    /// Number of wire fields for this record type.
    const FIELD_COUNT: usize;

    /// The unique-key field (account number, username).
    fn key(&self) -> &str;

    /// Returns `true` when the record is tombstoned.
    fn is_deleted(&self) -> bool;

    /// Sets or clears the tombstone flag.
    fn set_deleted(&mut self, deleted: bool);

    /// Serializes the record into wire fields, in order.
    fn to_fields(&self) -> Vec<String>;

    /// Rebuilds a record from wire fields.
    ///
    /// Callers guarantee `fields.len() == Self::FIELD_COUNT`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when a numeric field does not parse.
    fn from_fields(fields: &[&str]) -> Result<Self, DecodeError>;
}

/// Encodes a record as one line of text.
///
/// # Example
///
/// ```
/// use teller_store::{encode, Client};
///
/// let client = Client::new("A1", 1234, "Jo", "555", 100.0);
/// assert_eq!(encode(&client), "A1 /##/ 1234 /##/ Jo /##/ 555 /##/ 100");
/// ```
#[must_use]
pub fn encode<R: Record>(record: &R) -> String {
    record.to_fields().join(SEPARATOR)
}

/// Decodes one line of text into a record.
///
/// # Errors
///
/// Returns [`DecodeError::FieldCount`] when the line does not split into
/// exactly [`Record::FIELD_COUNT`] fields, or [`DecodeError::InvalidNumber`]
/// when a numeric field fails to parse.
pub fn decode<R: Record>(line: &str) -> Result<R, DecodeError> {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    if fields.len() != R::FIELD_COUNT {
        return Err(DecodeError::FieldCount {
            expected: R::FIELD_COUNT,
            found: fields.len(),
        });
    }
    R::from_fields(&fields)
}

/// Parses one numeric wire field, naming the field on failure.
pub(crate) fn parse_field<T: FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Client, User};
    use teller_auth::Permissions;

    #[test]
    fn client_roundtrip() {
        let client = Client::new("A1", 1234, "Jo Smith", "555-0100", 100.5);
        let decoded: Client = decode(&encode(&client)).expect("decode");

        assert_eq!(decoded, client);
    }

    #[test]
    fn user_roundtrip_with_sentinel() {
        let user = User::new("admin", 9999, Permissions::FULL_ACCESS);
        let line = encode(&user);
        assert_eq!(line, "admin /##/ 9999 /##/ -1");

        let decoded: User = decode(&line).expect("decode");
        assert_eq!(decoded, user);
    }

    #[test]
    fn empty_field_keeps_its_position() {
        // Empty phone number must not shift the balance field.
        let client = Client::new("A1", 1234, "Jo", "", 75.0);
        let decoded: Client = decode(&encode(&client)).expect("decode");

        assert_eq!(decoded.phone_number, "");
        assert_eq!(decoded.balance, 75.0);
    }

    #[test]
    fn too_few_fields_is_malformed() {
        let err = decode::<Client>("A1 /##/ 1234 /##/ Jo").expect_err("3 of 5 fields");
        assert_eq!(
            err,
            DecodeError::FieldCount {
                expected: 5,
                found: 3
            }
        );
    }

    #[test]
    fn too_many_fields_is_malformed() {
        let line = "u /##/ 1 /##/ 2 /##/ 3";
        let err = decode::<User>(line).expect_err("4 of 3 fields");
        assert!(matches!(err, DecodeError::FieldCount { expected: 3, found: 4 }));
    }

    #[test]
    fn non_numeric_pin_is_malformed() {
        let err =
            decode::<Client>("A1 /##/ abc /##/ Jo /##/ 555 /##/ 100").expect_err("bad pin");
        assert!(matches!(
            err,
            DecodeError::InvalidNumber { field: "pin", .. }
        ));
    }

    #[test]
    fn non_numeric_balance_is_malformed() {
        let err = decode::<Client>("A1 /##/ 1234 /##/ Jo /##/ 555 /##/ lots")
            .expect_err("bad balance");
        assert!(matches!(
            err,
            DecodeError::InvalidNumber {
                field: "balance",
                ..
            }
        ));
    }

    #[test]
    fn empty_line_is_malformed() {
        let err = decode::<Client>("").expect_err("empty line");
        assert!(matches!(err, DecodeError::FieldCount { found: 1, .. }));
    }

    #[test]
    fn fractional_balance_roundtrip() {
        let client = Client::new("B2", 1, "x", "y", 0.25);
        let decoded: Client = decode(&encode(&client)).expect("decode");
        assert_eq!(decoded.balance, 0.25);
    }
}
