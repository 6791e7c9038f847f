//! # da0-store
//!
//! Persistence for the da0 governance client.
//!
//! The client talks to its data through the [`GovernanceStore`] capability,
//! which covers exactly the three tables it reads and appends to: `daos`,
//! `proposals` and `votes`.  Two backends implement it:
//!
//! - [`RemoteStore`]: the hosted REST backend (PostgREST-style query
//!   strings, `apikey` authentication).
//! - [`LocalStore`]: a SQLite [`Database`] with the same schema, the same
//!   `(proposal_id, voter_address)` uniqueness rule and the same counter
//!   triggers, used for offline development and tests.

pub mod database;
pub mod local;
pub mod migrations;
pub mod organizations;
pub mod proposals;
pub mod remote;
pub mod seed;
pub mod store;
pub mod votes;

mod error;

#[cfg(test)]
pub(crate) mod fixtures;

pub use database::Database;
pub use error::{Result, StoreError};
pub use local::LocalStore;
pub use remote::RemoteStore;
pub use store::GovernanceStore;
