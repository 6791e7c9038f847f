//! [`WalletBridge`] over a wallet's JSON-RPC endpoint.
//!
//! Desktop signers expose the EIP-1193 provider over HTTP.  HTTP has no
//! push channel, so `accountsChanged` and `chainChanged` are synthesised by
//! polling `eth_accounts` and `eth_chainId`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use da0_shared::{Address, ChainId};

use crate::wallet::{AddChainParams, WalletBridge, WalletError, WalletEvent};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Last values seen by the poller.
#[derive(Debug, Default)]
struct Observed {
    accounts: Option<Vec<String>>,
    chain_id: Option<ChainId>,
}

pub struct RpcWallet {
    client: Client,
    url: String,
    next_id: AtomicU64,
    events: broadcast::Sender<WalletEvent>,
    observed: Mutex<Observed>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl RpcWallet {
    pub fn new(url: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client: Client::new(),
            url: url.to_string(),
            next_id: AtomicU64::new(1),
            events,
            observed: Mutex::new(Observed::default()),
            poller: Mutex::new(None),
        }
    }

    /// Create the bridge and start polling every `interval`.  The poller
    /// stops once the last `Arc` is dropped.
    pub fn start(url: &str, interval: Duration) -> Arc<Self> {
        let wallet = Arc::new(Self::new(url));
        let weak = Arc::downgrade(&wallet);
        let handle = tokio::spawn(poll_loop(weak, interval));

        if let Ok(mut guard) = wallet.poller.lock() {
            *guard = Some(handle);
        }

        info!(url = %url, interval_secs = interval.as_secs(), "Wallet RPC bridge started");
        wallet
    }

    /// Send one JSON-RPC request and return its `result`.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = request_body(id, method, params);

        debug!(method, id, "wallet rpc");

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::internal(format!("wallet unreachable: {e}")))?;

        let parsed: RpcResponse = resp
            .json()
            .await
            .map_err(|e| WalletError::internal(format!("invalid wallet response: {e}")))?;

        into_result(parsed)
    }

    /// Compare the wallet's current accounts and chain with the last poll
    /// and emit an event for each difference.  The first poll only records.
    pub async fn poll_once(&self) {
        let accounts = match self.request("eth_accounts", json!([])).await {
            Ok(v) => serde_json::from_value::<Vec<String>>(v).ok(),
            Err(e) => {
                debug!(error = %e, "eth_accounts poll failed");
                None
            }
        };
        let chain_id = self.chain_id().await.ok();

        let events = match self.observed.lock() {
            Ok(mut observed) => diff_observed(&mut observed, accounts, chain_id),
            Err(_) => return,
        };

        for event in events {
            debug!(?event, "wallet change detected");
            let _ = self.events.send(event);
        }
    }
}

impl Drop for RpcWallet {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.poller.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

async fn poll_loop(wallet: Weak<RpcWallet>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let Some(wallet) = wallet.upgrade() else {
            break;
        };
        wallet.poll_once().await;
    }
    debug!("wallet poller stopped");
}

fn request_body(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

fn into_result(resp: RpcResponse) -> Result<Value, WalletError> {
    if let Some(err) = resp.error {
        return Err(WalletError::new(err.code, err.message));
    }
    Ok(resp.result.unwrap_or(Value::Null))
}

/// Update `observed` and return the resulting change events.  Failed polls
/// (`None`) leave the previous value in place.
fn diff_observed(
    observed: &mut Observed,
    accounts: Option<Vec<String>>,
    chain_id: Option<ChainId>,
) -> Vec<WalletEvent> {
    let mut events = Vec::new();

    if let Some(accounts) = accounts {
        match observed.accounts.replace(accounts.clone()) {
            Some(previous) if previous != accounts => {
                events.push(WalletEvent::AccountsChanged(accounts));
            }
            _ => {}
        }
    }

    if let Some(chain_id) = chain_id {
        match observed.chain_id.replace(chain_id.clone()) {
            Some(previous) if previous != chain_id => {
                events.push(WalletEvent::ChainChanged(chain_id));
            }
            _ => {}
        }
    }

    events
}

#[async_trait]
impl WalletBridge for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        let value = self.request("eth_requestAccounts", json!([])).await?;
        serde_json::from_value(value)
            .map_err(|e| WalletError::internal(format!("unexpected accounts payload: {e}")))
    }

    async fn personal_sign(&self, message: &str, account: &Address) -> Result<String, WalletError> {
        let value = self
            .request("personal_sign", json!([message, account.as_str()]))
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WalletError::internal("signature is not a string"))
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        let value = self.request("eth_chainId", json!([])).await?;
        value
            .as_str()
            .map(|s| ChainId(s.to_string()))
            .ok_or_else(|| WalletError::internal("chain id is not a string"))
    }

    async fn switch_chain(&self, chain_id: &ChainId) -> Result<(), WalletError> {
        self.request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": chain_id.as_str() }]),
        )
        .await?;
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), WalletError> {
        let params = serde_json::to_value(params)
            .map_err(|e| WalletError::internal(format!("chain params: {e}")))?;
        if let Err(e) = self.request("wallet_addEthereumChain", json!([params])).await {
            warn!(error = %e, "wallet_addEthereumChain rejected");
            return Err(e);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}
