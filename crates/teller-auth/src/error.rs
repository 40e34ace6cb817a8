//! Access denied error type.

use crate::Permissions;
use thiserror::Error;

/// An operation was refused because the acting session lacks a capability.
///
/// Refusal happens before any file is opened: a denied operation performs
/// no load, no mutation, and no persist.
///
/// # Example
///
/// ```
/// use teller_auth::{AccessDenied, Permissions};
///
/// let err = AccessDenied {
///     operation: "remove client".to_string(),
///     required: Permissions::REMOVE_CLIENT,
///     available: Permissions::FIND_CLIENT,
/// };
///
/// assert!(err.to_string().contains("remove client"));
/// ```
#[derive(Debug, Error)]
#[error("access denied: '{operation}' requires {required}, held: {available}")]
pub struct AccessDenied {
    /// The operation that was attempted.
    pub operation: String,
    /// The capability the operation requires.
    pub required: Permissions,
    /// The permissions the session actually holds.
    pub available: Permissions,
}
