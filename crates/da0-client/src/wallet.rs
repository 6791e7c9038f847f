//! Wallet bridge capability.
//!
//! The client only ever needs five RPC methods and two event streams from a
//! wallet.  Anything that cannot provide them is treated as "no wallet".

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

use da0_shared::constants::{
    NATIVE_CURRENCY_DECIMALS, NATIVE_CURRENCY_NAME, NATIVE_CURRENCY_SYMBOL, TARGET_CHAIN_NAME,
    TARGET_EXPLORER_URL, TARGET_RPC_URL,
};
use da0_shared::{Address, ChainId};

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED: i64 = 4001;

/// EIP-1193 / MetaMask: the requested chain has not been added to the wallet.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

/// JSON-RPC internal error, also used for transport failures.
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Wallet error {code}: {message}")]
pub struct WalletError {
    pub code: i64,
    pub message: String,
}

impl WalletError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED, "User rejected the request.")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == UNRECOGNIZED_CHAIN
    }
}

/// Notifications pushed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The active account list changed (`accountsChanged`).
    AccountsChanged(Vec<String>),
    /// The active network changed (`chainChanged`).
    ChainChanged(ChainId),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters of `wallet_addEthereumChain`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl AddChainParams {
    /// Registration parameters of the target network.
    pub fn target() -> Self {
        Self {
            chain_id: ChainId::target(),
            chain_name: TARGET_CHAIN_NAME.to_string(),
            native_currency: NativeCurrency {
                name: NATIVE_CURRENCY_NAME.to_string(),
                symbol: NATIVE_CURRENCY_SYMBOL.to_string(),
                decimals: NATIVE_CURRENCY_DECIMALS,
            },
            rpc_urls: vec![TARGET_RPC_URL.to_string()],
            block_explorer_urls: vec![TARGET_EXPLORER_URL.to_string()],
        }
    }
}

/// The wallet as seen by the session manager.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// `eth_requestAccounts`: may prompt the user.
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// `personal_sign`: returns the signature hex string.
    async fn personal_sign(&self, message: &str, account: &Address) -> Result<String, WalletError>;

    /// `eth_chainId`.  Never prompts.
    async fn chain_id(&self) -> Result<ChainId, WalletError>;

    /// `wallet_switchEthereumChain`.
    async fn switch_chain(&self, chain_id: &ChainId) -> Result<(), WalletError>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, params: &AddChainParams) -> Result<(), WalletError>;

    /// Subscribe to `accountsChanged` / `chainChanged`.  Dropping the
    /// receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_chain_params_shape() {
        let json = serde_json::to_value(AddChainParams::target()).unwrap();
        assert_eq!(json["chainId"], "0x2105");
        assert_eq!(json["chainName"], "Base Mainnet");
        assert_eq!(json["nativeCurrency"]["symbol"], "ETH");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
        assert_eq!(json["rpcUrls"][0], "https://mainnet.base.org");
        assert_eq!(json["blockExplorerUrls"][0], "https://basescan.org");
    }

    #[test]
    fn test_error_codes() {
        assert!(WalletError::user_rejected().is_user_rejection());
        assert!(WalletError::new(4902, "Unrecognized chain ID").is_unrecognized_chain());
        assert!(!WalletError::internal("boom").is_unrecognized_chain());
    }
}
