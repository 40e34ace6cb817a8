//! Permission primitives for the teller console.
//!
//! This crate is the leaf of the workspace dependency graph: it defines
//! the permission bitmask, the session value type, and the access-denied
//! error that the store and engine layers build on.
//!
//! # Permission Model
//!
//! ```text
//! Allowed = Session(WHO) ∩ Permissions(WHAT)
//! ```
//!
//! | Layer | Type | Controls |
//! |-------|------|----------|
//! | [`Permissions`] | Bitflags | Which operation categories are granted |
//! | [`Session`] | Struct | Who is acting, with which permission set |
//!
//! # Design Principles
//!
//! - **Sessions are explicit** — every gated operation takes `&Session`;
//!   there is no process-wide "current user".
//! - **The sentinel is out of band** — [`Permissions::FULL_ACCESS`] is the
//!   all-ones bit pattern (`-1`), distinct from the OR of the individual
//!   capability bits. Only the sentinel marks an administrator.
//! - **Deny is side-effect free** — [`Session::require`] performs no I/O;
//!   a refused operation never touches the backing files.

pub mod error;
pub mod permission;
pub mod session;

pub use error::AccessDenied;
pub use permission::Permissions;
pub use session::Session;
