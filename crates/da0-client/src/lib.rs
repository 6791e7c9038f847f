//! # da0-client
//!
//! Governance client for DAOs on Base: browse organizations and proposals,
//! sign in with a wallet signature, vote and create proposals.
//!
//! The [`App`](state::App) root owns one [`SessionManager`](session::SessionManager)
//! and one [`GovernanceStore`](da0_store::GovernanceStore); the view
//! handlers in [`commands`] take both by reference.

pub mod commands;
pub mod config;
pub mod display;
pub mod events;
pub mod routes;
pub mod rpc_wallet;
pub mod session;
pub mod state;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.  `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("da0_client=debug,da0_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
