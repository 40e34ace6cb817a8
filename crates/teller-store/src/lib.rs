//! File-backed record storage for the teller console.
//!
//! Records live in flat text files, one record per line, fields joined
//! by the literal separator token ` /##/ `:
//!
//! ```text
//! CLIENTS.txt   A1 /##/ 1234 /##/ Jo /##/ 555 /##/ 100
//! USERS.txt     admin /##/ 9999 /##/ -1
//! ```
//!
//! # Persistence model
//!
//! Every operation loads the *entire* file into a fresh in-memory list
//! and, if it mutates, rewrites the *entire* file at the end. There is
//! no caching across operations, no incremental update, and no locking:
//! concurrent external modification of the backing files is unsafe (last
//! writer wins). This is acceptable for a single interactive operator
//! and is a documented constraint, not something this crate solves.
//!
//! Soft deletion uses a tombstone flag: a tombstoned record is dropped at
//! the next full rewrite and is invisible to every subsequent load.

pub mod client;
pub mod codec;
pub mod error;
pub mod store;
pub mod user;

pub use client::Client;
pub use codec::{decode, encode, Record, SEPARATOR};
pub use error::{DecodeError, StoreError};
pub use store::FileStore;
pub use user::User;
