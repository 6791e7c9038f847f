//! # da0-shared
//!
//! Domain types shared by the da0 governance client and its storage layer:
//! organizations, proposals, votes, wallet addresses, chain identifiers and
//! the pure derivations computed from them (vote tallies, proposal drafts).

pub mod constants;
pub mod draft;
pub mod error;
pub mod models;
pub mod tally;
pub mod types;

pub use error::{AddressError, DraftError};
pub use models::*;
pub use types::*;
