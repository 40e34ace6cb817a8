//! Permission-gated operations over the teller record stores.
//!
//! This crate owns the semantics the console collaborator drives:
//!
//! - [`ClientOps`] — add/list/find/update/remove and the transaction
//!   flows over the client store;
//! - [`UserOps`] — the user-management flows, administrator-protected;
//! - [`auth`] — login against the user store;
//! - [`Transaction`] — validate-then-confirm-then-apply balance changes;
//! - [`config`] — layered TOML/env configuration.
//!
//! # Operation shape
//!
//! Every operation takes the acting [`Session`] explicitly and follows
//! the same cycle: permission gate (side-effect free refusal) → fresh
//! full-file load → locate/mutate/append → full-file persist. Nothing is
//! cached between operations.
//!
//! # Crate layout
//!
//! ```text
//! teller-auth   (Permissions, Session, AccessDenied)
//!     ↑
//! teller-store  (codec, Client, User, FileStore)
//!     ↑
//! teller-engine ◄── THIS CRATE
//!     ↑
//! teller-cli    (menus, prompts, tracing setup)
//! ```

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod transaction;
pub mod users;

pub use auth::{authenticate, ensure_bootstrap_admin};
pub use clients::{ClientOps, ClientUpdate, RemoveOutcome, TransactionOutcome};
pub use config::{ConfigError, ConfigLoader, TellerConfig};
pub use error::{InvalidAmount, OpError};
pub use transaction::{Transaction, TransactionKind};
pub use users::{UserOps, UserUpdate};

// Convenience re-exports for the CLI layer.
pub use teller_auth::{AccessDenied, Permissions, Session};
pub use teller_store::{Client, FileStore, StoreError, User};
