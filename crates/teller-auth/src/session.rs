//! Session types (identity + resolved permissions).

use crate::{AccessDenied, Permissions};
use serde::{Deserialize, Serialize};

/// An authenticated actor: username plus the permission set resolved at
/// login.
///
/// A session is an immutable value type passed explicitly into every
/// gated operation. It has no expiry; it lives for the duration of the
/// interactive main loop and is dropped on logout.
///
/// # Why No Default?
///
/// **DO NOT implement `Default` for Session.** A session requires an
/// identity resolved against the user store; there is no sensible
/// default actor. Always construct with [`Session::new`].
///
/// # Example
///
/// ```
/// use teller_auth::{Permissions, Session};
///
/// let session = Session::new("admin", Permissions::FULL_ACCESS);
/// assert!(session.has_capability(Permissions::MANAGE_USERS));
/// assert!(session.is_administrator());
///
/// let teller = Session::new("jo", Permissions::TRANSACTIONS);
/// assert!(teller.require(Permissions::TRANSACTIONS, "deposit").is_ok());
/// assert!(teller.require(Permissions::MANAGE_USERS, "manage users").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The acting user's name.
    username: String,
    /// Permission set resolved at login.
    permissions: Permissions,
}

impl Session {
    /// Creates a session for `username` with the given permission set.
    #[must_use]
    pub fn new(username: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            username: username.into(),
            permissions,
        }
    }

    /// Returns the acting user's name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the resolved permission set.
    #[must_use]
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Returns `true` when the session holds `capability`.
    #[must_use]
    pub fn has_capability(&self, capability: Permissions) -> bool {
        self.permissions.has_capability(capability)
    }

    /// Returns `true` iff the session holds the full-access sentinel.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.permissions.is_administrator()
    }

    /// Gate for a named operation.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when the session does not hold
    /// `capability`. The check is pure; a refusal performs no I/O.
    pub fn require(
        &self,
        capability: Permissions,
        operation: &str,
    ) -> Result<(), AccessDenied> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            Err(AccessDenied {
                operation: operation.to_string(),
                required: capability,
                available: self.permissions,
            })
        }
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@[{}]", self.username, self.permissions)
    }
}
