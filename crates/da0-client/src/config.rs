//! Client configuration loaded from environment variables.
//!
//! With nothing set the client runs against a local SQLite database seeded
//! with the demo organizations, and without a wallet.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use da0_shared::constants::RECENT_PROPOSALS_LIMIT;
use da0_store::{Database, GovernanceStore, LocalStore, RemoteStore};

use crate::rpc_wallet::RpcWallet;
use crate::wallet::WalletBridge;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the hosted backend.  When set, the remote store is used.
    /// Env: `DA0_BACKEND_URL`
    pub backend_url: Option<String>,

    /// Public API key sent with every backend request.
    /// Env: `DA0_BACKEND_KEY`
    /// Default: empty
    pub backend_key: String,

    /// SQLite file of the local backend.
    /// Env: `DA0_DB_PATH`
    /// Default: `da0.db` in the platform data directory.
    pub db_path: Option<PathBuf>,

    /// JSON-RPC endpoint of a wallet.  Unset means no wallet.
    /// Env: `DA0_WALLET_RPC_URL`
    pub wallet_rpc_url: Option<String>,

    /// How often the RPC wallet is polled for account and network changes.
    /// Env: `DA0_WALLET_POLL_SECS`
    /// Default: `2`
    pub wallet_poll_interval: Duration,

    /// Number of proposals on the home page.
    /// Env: `DA0_RECENT_PROPOSALS`
    /// Default: `5`
    pub recent_proposals: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            backend_key: String::new(),
            db_path: None,
            wallet_rpc_url: None,
            wallet_poll_interval: Duration::from_secs(2),
            recent_proposals: RECENT_PROPOSALS_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("DA0_BACKEND_URL") {
            config.backend_url = Some(url);
        }

        if let Some(key) = var("DA0_BACKEND_KEY") {
            config.backend_key = key;
        }

        if let Some(path) = var("DA0_DB_PATH") {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(url) = var("DA0_WALLET_RPC_URL") {
            config.wallet_rpc_url = Some(url);
        }

        if let Some(val) = var("DA0_WALLET_POLL_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.wallet_poll_interval = Duration::from_secs(secs),
                _ => warn!(value = %val, "Invalid DA0_WALLET_POLL_SECS, using default"),
            }
        }

        if let Some(val) = var("DA0_RECENT_PROPOSALS") {
            match val.parse::<usize>() {
                Ok(n) => config.recent_proposals = n,
                Err(_) => warn!(value = %val, "Invalid DA0_RECENT_PROPOSALS, using default"),
            }
        }

        config
    }

    /// Open the configured persistence backend.
    pub fn build_store(&self) -> da0_store::Result<Arc<dyn GovernanceStore>> {
        if let Some(url) = &self.backend_url {
            info!(url = %url, "Using hosted backend");
            return Ok(Arc::new(RemoteStore::new(url, &self.backend_key)?));
        }

        let db = match &self.db_path {
            Some(path) => Database::open_at(path)?,
            None => Database::new()?,
        };
        info!(path = ?db.path(), "Using local database");
        db.seed_demo_organizations()?;

        Ok(Arc::new(LocalStore::new(db)))
    }

    /// Connect the configured wallet, if any.  Must run inside a Tokio
    /// runtime: the RPC wallet starts its poller immediately.
    pub fn build_wallet(&self) -> Option<Arc<dyn WalletBridge>> {
        let url = self.wallet_rpc_url.as_deref()?;
        let wallet: Arc<dyn WalletBridge> = RpcWallet::start(url, self.wallet_poll_interval);
        Some(wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ClientConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.recent_proposals, 5);
        assert_eq!(config.wallet_poll_interval, Duration::from_secs(2));
        assert!(config.build_wallet().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DA0_BACKEND_URL", "https://abc.supabase.co"),
            ("DA0_BACKEND_KEY", "anon"),
            ("DA0_WALLET_RPC_URL", "http://127.0.0.1:1248"),
            ("DA0_WALLET_POLL_SECS", "5"),
            ("DA0_RECENT_PROPOSALS", "10"),
        ]);
        assert_eq!(config.backend_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(config.backend_key, "anon");
        assert_eq!(config.wallet_poll_interval, Duration::from_secs(5));
        assert_eq!(config.recent_proposals, 10);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("DA0_WALLET_POLL_SECS", "0"),
            ("DA0_RECENT_PROPOSALS", "many"),
            ("DA0_BACKEND_URL", "  "),
        ]);
        assert_eq!(config.wallet_poll_interval, Duration::from_secs(2));
        assert_eq!(config.recent_proposals, 5);
        assert!(config.backend_url.is_none());
    }

    #[test]
    fn test_local_store_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            db_path: Some(dir.path().join("da0.db")),
            ..ClientConfig::default()
        };
        let store = config.build_store().unwrap();
        assert_eq!(store.backend_tag(), "sqlite");
    }

    #[test]
    fn test_remote_store_selected() {
        let config = ClientConfig {
            backend_url: Some("https://abc.supabase.co".into()),
            ..ClientConfig::default()
        };
        assert_eq!(config.build_store().unwrap().backend_tag(), "remote");
    }
}
