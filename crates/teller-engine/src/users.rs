//! User management, gated behind a single capability.
//!
//! All five flows require [`Permissions::MANAGE_USERS`]. Full-access
//! users are shielded: they can be listed and found, but update and
//! remove refuse to touch them.

use crate::error::OpError;
use teller_auth::{Permissions, Session};
use teller_store::{FileStore, User};
use tracing::{debug, info};

/// Replacement data for a user update.
///
/// The username is the immutable key; password and permissions are
/// replaced wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserUpdate {
    pub password: u32,
    pub permissions: Permissions,
}

/// Permission-gated operations over the user store.
#[derive(Debug, Clone)]
pub struct UserOps {
    store: FileStore<User>,
}

impl UserOps {
    /// Creates the management layer over a user store.
    #[must_use]
    pub fn new(store: FileStore<User>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &FileStore<User> {
        &self.store
    }

    /// Adds a new user after checking username uniqueness.
    ///
    /// # Errors
    ///
    /// [`OpError::EmptyKey`] for an empty username,
    /// [`OpError::DuplicateKey`] when the username already exists.
    pub fn add(&self, session: &Session, user: User) -> Result<(), OpError> {
        session.require(Permissions::MANAGE_USERS, "add user")?;

        if user.username.is_empty() {
            return Err(OpError::EmptyKey);
        }

        let users = self.store.load_all()?;
        if FileStore::find_index(&users, &user.username).is_some() {
            return Err(OpError::DuplicateKey(user.username));
        }

        info!(username = %user.username, permissions = %user.permissions, "adding user");
        self.store.append(&user)?;
        Ok(())
    }

    /// Returns every user in the store, in file order.
    pub fn list(&self, session: &Session) -> Result<Vec<User>, OpError> {
        session.require(Permissions::MANAGE_USERS, "list users")?;
        Ok(self.store.load_all()?)
    }

    /// Looks up one user by username.
    ///
    /// # Errors
    ///
    /// [`OpError::KeyNotFound`] when no user matches.
    pub fn find(&self, session: &Session, username: &str) -> Result<User, OpError> {
        session.require(Permissions::MANAGE_USERS, "find user")?;

        let users = self.store.load_all()?;
        let index = FileStore::find_index(&users, username)
            .ok_or_else(|| OpError::KeyNotFound(username.to_string()))?;
        Ok(users[index].clone())
    }

    /// Updates a user's password and permissions in place.
    ///
    /// `decide` receives the current record and returns the replacement
    /// data, or `None` to abort without mutation. The username never
    /// changes.
    ///
    /// Returns the updated record, or `None` when the caller declined.
    ///
    /// # Errors
    ///
    /// [`OpError::KeyNotFound`] when no user matches,
    /// [`OpError::ProtectedUser`] when the target holds full access.
    pub fn update(
        &self,
        session: &Session,
        username: &str,
        decide: impl FnOnce(&User) -> Option<UserUpdate>,
    ) -> Result<Option<User>, OpError> {
        session.require(Permissions::MANAGE_USERS, "update user")?;

        let mut users = self.store.load_all()?;
        let index = FileStore::find_index(&users, username)
            .ok_or_else(|| OpError::KeyNotFound(username.to_string()))?;

        if users[index].is_administrator() {
            return Err(OpError::ProtectedUser(username.to_string()));
        }

        let Some(update) = decide(&users[index]) else {
            debug!(%username, "user update declined");
            return Ok(None);
        };

        let user = &mut users[index];
        user.password = update.password;
        user.permissions = update.permissions;
        let updated = user.clone();

        info!(%username, permissions = %updated.permissions, "updating user");
        self.store.persist_all(&users)?;
        Ok(Some(updated))
    }

    /// Tombstones a user behind a confirm gate.
    ///
    /// `confirm` receives the located record and returns the decision;
    /// declining aborts with no mutation and no persist.
    ///
    /// # Errors
    ///
    /// [`OpError::KeyNotFound`] when no user matches,
    /// [`OpError::ProtectedUser`] when the target holds full access.
    pub fn remove(
        &self,
        session: &Session,
        username: &str,
        confirm: impl FnOnce(&User) -> bool,
    ) -> Result<crate::RemoveOutcome, OpError> {
        session.require(Permissions::MANAGE_USERS, "remove user")?;

        let mut users = self.store.load_all()?;
        let index = FileStore::find_index(&users, username)
            .ok_or_else(|| OpError::KeyNotFound(username.to_string()))?;

        if users[index].is_administrator() {
            return Err(OpError::ProtectedUser(username.to_string()));
        }

        if !confirm(&users[index]) {
            debug!(%username, "user removal declined");
            return Ok(crate::RemoveOutcome::Aborted);
        }

        users[index].is_deleted = true;
        info!(%username, "removing user");
        self.store.persist_all(&users)?;
        Ok(crate::RemoveOutcome::Removed)
    }
}
