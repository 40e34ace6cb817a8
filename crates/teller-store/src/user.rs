//! System user record.

use crate::codec::{parse_field, Record};
use crate::error::DecodeError;
use teller_auth::Permissions;

/// One system user.
///
/// Wire layout (three fields):
///
/// ```text
/// username /##/ password /##/ permissions
/// ```
///
/// The password is stored and compared in plaintext. This is a known
/// weakness of the stored-file format, kept for compatibility; it is not
/// silently "fixed" because hashing would change the file contract.
/// Permissions are the decimal integer form of the bitmask; `-1` is the
/// full-access sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique key.
    pub username: String,
    /// Positive numeric password, plaintext on the wire.
    pub password: u32,
    /// Granted capability set.
    pub permissions: Permissions,
    /// Tombstone flag (in-memory only).
    pub is_deleted: bool,
}

impl User {
    /// Creates a live (non-tombstoned) user record.
    #[must_use]
    pub fn new(username: impl Into<String>, password: u32, permissions: Permissions) -> Self {
        Self {
            username: username.into(),
            password,
            permissions,
            is_deleted: false,
        }
    }

    /// Returns `true` iff this user holds the full-access sentinel.
    ///
    /// Administrators can never be updated or removed through the
    /// user-management flow.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.permissions.is_administrator()
    }
}

impl Record for User {
    const FIELD_COUNT: usize = 3;

    fn key(&self) -> &str {
        &self.username
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.password.to_string(),
            self.permissions.stored().to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, DecodeError> {
        let bits: i32 = parse_field("permissions", fields[2])?;
        Ok(Self {
            username: fields[0].to_string(),
            password: parse_field("password", fields[1])?,
            permissions: Permissions::from_stored(bits),
            is_deleted: false,
        })
    }
}
