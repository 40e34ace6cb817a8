//! Capability-based permission bitmask.
//!
//! Each user record carries an integer permission mask. Individual
//! capabilities occupy non-overlapping bit positions; the reserved value
//! `-1` is the full-access sentinel.
//!
//! # Sentinel vs. composed bits
//!
//! `FULL_ACCESS` is **not** the OR of the seven capability bits (that
//! would be `127`). It is the all-ones `i32` pattern, so it satisfies
//! every capability check without special-casing, while remaining
//! distinguishable from a user who was granted every bit individually.
//! Only the sentinel identifies the administrator.
//!
//! # Example
//!
//! ```
//! use teller_auth::Permissions;
//!
//! let admin = Permissions::FULL_ACCESS;
//! assert!(admin.has_capability(Permissions::TRANSACTIONS));
//! assert!(admin.is_administrator());
//!
//! let composed = Permissions::ADD_CLIENT
//!     | Permissions::LIST_CLIENTS
//!     | Permissions::UPDATE_CLIENT
//!     | Permissions::REMOVE_CLIENT
//!     | Permissions::FIND_CLIENT
//!     | Permissions::TRANSACTIONS
//!     | Permissions::MANAGE_USERS;
//! assert!(composed.has_capability(Permissions::MANAGE_USERS));
//! assert!(!composed.is_administrator());
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Operation categories a user can be granted.
    ///
    /// | Capability | Gates |
    /// |------------|-------|
    /// | [`ADD_CLIENT`](Self::ADD_CLIENT) | adding new client records |
    /// | [`LIST_CLIENTS`](Self::LIST_CLIENTS) | listing all clients |
    /// | [`UPDATE_CLIENT`](Self::UPDATE_CLIENT) | updating client data |
    /// | [`REMOVE_CLIENT`](Self::REMOVE_CLIENT) | tombstoning clients |
    /// | [`FIND_CLIENT`](Self::FIND_CLIENT) | lookup by account number |
    /// | [`TRANSACTIONS`](Self::TRANSACTIONS) | deposits and withdrawals |
    /// | [`MANAGE_USERS`](Self::MANAGE_USERS) | the user-management flows |
    ///
    /// The backing type is `i32` so the `-1` sentinel is the all-ones
    /// pattern and `(p & c) == c` holds for every capability `c`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Permissions: i32 {
        /// Add new client records.
        const ADD_CLIENT    = 1;
        /// List all client records.
        const LIST_CLIENTS  = 2;
        /// Update existing client records.
        const UPDATE_CLIENT = 4;
        /// Tombstone client records.
        const REMOVE_CLIENT = 8;
        /// Look up a client by account number.
        const FIND_CLIENT   = 16;
        /// Deposit and withdraw against client balances.
        const TRANSACTIONS  = 32;
        /// Manage user records and their permissions.
        const MANAGE_USERS  = 64;
        /// Reserved sentinel: every capability, including administrative
        /// ones, granted. Distinct from the OR of the bits above.
        const FULL_ACCESS   = -1;
    }
}

impl Permissions {
    /// The seven individual capabilities, in menu order.
    pub const CAPABILITIES: [Self; 7] = [
        Self::ADD_CLIENT,
        Self::LIST_CLIENTS,
        Self::UPDATE_CLIENT,
        Self::REMOVE_CLIENT,
        Self::FIND_CLIENT,
        Self::TRANSACTIONS,
        Self::MANAGE_USERS,
    ];

    /// Returns `true` when this set holds `capability`.
    ///
    /// Evaluates `(self & capability) == capability`. The full-access
    /// sentinel is all ones, so it satisfies every capability without a
    /// special case.
    #[must_use]
    pub fn has_capability(self, capability: Self) -> bool {
        self.contains(capability)
    }

    /// Returns `true` iff this is the full-access sentinel exactly.
    ///
    /// A user granted every capability bit individually is *not* an
    /// administrator; only the sentinel marks the protected account.
    #[must_use]
    pub fn is_administrator(self) -> bool {
        self == Self::FULL_ACCESS
    }

    /// Reconstructs a permission set from its stored integer form.
    ///
    /// The exact bit pattern is preserved, including the `-1` sentinel
    /// and any bits this build does not know about.
    #[must_use]
    pub fn from_stored(bits: i32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// Returns the integer form written to the user file.
    #[must_use]
    pub fn stored(self) -> i32 {
        self.bits()
    }

    /// Returns a human-readable list of held capability names.
    ///
    /// The sentinel reports as `FULL_ACCESS` rather than enumerating
    /// every bit it implies.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        if self.is_administrator() {
            return vec!["FULL_ACCESS"];
        }
        let mut names = Vec::new();
        if self.contains(Self::ADD_CLIENT) {
            names.push("ADD_CLIENT");
        }
        if self.contains(Self::LIST_CLIENTS) {
            names.push("LIST_CLIENTS");
        }
        if self.contains(Self::UPDATE_CLIENT) {
            names.push("UPDATE_CLIENT");
        }
        if self.contains(Self::REMOVE_CLIENT) {
            names.push("REMOVE_CLIENT");
        }
        if self.contains(Self::FIND_CLIENT) {
            names.push("FIND_CLIENT");
        }
        if self.contains(Self::TRANSACTIONS) {
            names.push("TRANSACTIONS");
        }
        if self.contains(Self::MANAGE_USERS) {
            names.push("MANAGE_USERS");
        }
        names
    }
}

impl std::fmt::Display for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}
