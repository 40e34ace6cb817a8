//! Login against the user store.
//!
//! Authentication is an exact match on the username/password pair over
//! the freshly loaded user file. A refusal never reveals which of the
//! two was wrong.

use crate::error::OpError;
use teller_auth::{Permissions, Session};
use teller_store::{FileStore, User};
use tracing::{info, warn};

/// Username seeded when the user store starts empty.
pub const BOOTSTRAP_USERNAME: &str = "admin";
/// Password seeded alongside [`BOOTSTRAP_USERNAME`].
pub const BOOTSTRAP_PASSWORD: u32 = 9999;

/// Resolves a username/password pair into a [`Session`].
///
/// Usernames compare exactly (case-sensitive, no trimming beyond what
/// the prompt layer already did). The resolved permission set is frozen
/// into the session; later edits to the user file do not affect it.
///
/// # Errors
///
/// [`OpError::InvalidCredentials`] when no live user matches both
/// fields. Store errors propagate as usual.
pub fn authenticate(
    store: &FileStore<User>,
    username: &str,
    password: u32,
) -> Result<Session, OpError> {
    let users = store.load_all()?;

    let matched = users
        .iter()
        .find(|u| u.username == username && u.password == password);

    match matched {
        Some(user) => {
            info!(%username, permissions = %user.permissions, "login succeeded");
            Ok(Session::new(&user.username, user.permissions))
        }
        None => {
            warn!(%username, "login failed");
            Err(OpError::InvalidCredentials)
        }
    }
}

/// Seeds the bootstrap administrator when the user store is empty.
///
/// Without this a fresh installation would have no way to log in. The
/// seeded user is `admin` / `9999` with the full-access sentinel.
/// Returns `true` when a user was seeded.
///
/// # Errors
///
/// Store errors from the initial load or the append.
pub fn ensure_bootstrap_admin(store: &FileStore<User>) -> Result<bool, OpError> {
    let users = store.load_all()?;
    if !users.is_empty() {
        return Ok(false);
    }

    let admin = User::new(BOOTSTRAP_USERNAME, BOOTSTRAP_PASSWORD, Permissions::FULL_ACCESS);
    warn!(
        username = BOOTSTRAP_USERNAME,
        "user store is empty, seeding bootstrap administrator"
    );
    store.append(&admin)?;
    Ok(true)
}
