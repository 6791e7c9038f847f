//! Test doubles shared by the client tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, oneshot};

use da0_shared::{
    Address, ChainId, NewProposal, NewVote, Organization, OrganizationId, ProposalId,
    ProposalRecord, Vote,
};
use da0_store::{GovernanceStore, LocalStore};

use crate::session::SessionManager;
use crate::wallet::{AddChainParams, WalletBridge, WalletError, WalletEvent};

pub const ALICE: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";
pub const BOB: &str = "0x1111111111111111111111111111111111111111";

/// Wallet whose answers are set up front by the test.
pub struct ScriptedWallet {
    pub accounts: Mutex<Result<Vec<String>, WalletError>>,
    pub sign: Mutex<Result<String, WalletError>>,
    pub chain: Mutex<Result<ChainId, WalletError>>,
    pub switch: Mutex<Result<(), WalletError>>,
    pub add: Mutex<Result<(), WalletError>>,
    calls: Mutex<Vec<String>>,
    signed: Mutex<Vec<(String, String)>>,
    sign_gate: Mutex<Option<oneshot::Receiver<()>>>,
    events: broadcast::Sender<WalletEvent>,
}

impl ScriptedWallet {
    pub fn on_chain(accounts: &[&str], chain: &str) -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            accounts: Mutex::new(Ok(accounts.iter().map(|a| a.to_string()).collect())),
            sign: Mutex::new(Ok("0xsignature".to_string())),
            chain: Mutex::new(Ok(ChainId(chain.to_string()))),
            switch: Mutex::new(Ok(())),
            add: Mutex::new(Ok(())),
            calls: Mutex::new(Vec::new()),
            signed: Mutex::new(Vec::new()),
            sign_gate: Mutex::new(None),
            events,
        })
    }

    pub fn on_target(accounts: &[&str]) -> Arc<Self> {
        Self::on_chain(accounts, "0x2105")
    }

    /// RPC methods called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// `(message, account)` pairs passed to `personal_sign`.
    pub fn signed_by(&self) -> Vec<(String, String)> {
        self.signed.lock().unwrap().clone()
    }

    /// Make the next `personal_sign` wait until the returned sender fires.
    pub fn hold_signature(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.sign_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub async fn wait_for_call(&self, method: &str) {
        for _ in 0..500 {
            if self.calls().iter().any(|c| c == method) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("{method} was never called");
    }

    pub fn emit(&self, event: WalletEvent) {
        let _ = self.events.send(event);
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }
}

#[async_trait]
impl WalletBridge for ScriptedWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.record("eth_requestAccounts");
        self.accounts.lock().unwrap().clone()
    }

    async fn personal_sign(&self, message: &str, account: &Address) -> Result<String, WalletError> {
        self.record("personal_sign");
        let gate = self.sign_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let result = self.sign.lock().unwrap().clone();
        if result.is_ok() {
            self.signed
                .lock()
                .unwrap()
                .push((message.to_string(), account.as_str().to_string()));
        }
        result
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        self.record("eth_chainId");
        self.chain.lock().unwrap().clone()
    }

    async fn switch_chain(&self, _chain_id: &ChainId) -> Result<(), WalletError> {
        self.record("wallet_switchEthereumChain");
        self.switch.lock().unwrap().clone()
    }

    async fn add_chain(&self, _params: &AddChainParams) -> Result<(), WalletError> {
        self.record("wallet_addEthereumChain");
        self.add.lock().unwrap().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

/// A session manager over `wallet`, already authenticated when the wallet
/// script allows it.
pub async fn connected(wallet: &Arc<ScriptedWallet>) -> Arc<SessionManager> {
    let manager = SessionManager::new(Some(wallet.clone() as Arc<dyn WalletBridge>));
    manager.init().await;
    manager.connect().await;
    manager
}

/// In-memory store with the demo organizations.
pub fn seeded_store() -> LocalStore {
    let store = LocalStore::open_in_memory().unwrap();
    store
        .with_db(|db| db.seed_demo_organizations())
        .unwrap();
    store
}

/// Store that can pause the next organization read, for racing loads.
pub struct GatedStore {
    inner: LocalStore,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    held: AtomicBool,
}

impl GatedStore {
    pub fn new(inner: LocalStore) -> Self {
        Self {
            inner,
            gate: Mutex::new(None),
            held: AtomicBool::new(false),
        }
    }

    pub fn hold_next_organization(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub async fn wait_until_held(&self) {
        for _ in 0..500 {
            if self.held.load(Ordering::SeqCst) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("organization read was never held");
    }
}

#[async_trait]
impl GovernanceStore for GatedStore {
    fn backend_tag(&self) -> &'static str {
        "gated"
    }

    async fn list_organizations(&self) -> da0_store::Result<Vec<Organization>> {
        self.inner.list_organizations().await
    }

    async fn get_organization(&self, id: &OrganizationId) -> da0_store::Result<Organization> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.held.store(true, Ordering::SeqCst);
            let _ = gate.await;
        }
        self.inner.get_organization(id).await
    }

    async fn get_proposal(&self, id: &ProposalId) -> da0_store::Result<ProposalRecord> {
        self.inner.get_proposal(id).await
    }

    async fn list_proposals_for(
        &self,
        dao_id: &OrganizationId,
    ) -> da0_store::Result<Vec<ProposalRecord>> {
        self.inner.list_proposals_for(dao_id).await
    }

    async fn list_recent_proposals(&self, limit: usize) -> da0_store::Result<Vec<ProposalRecord>> {
        self.inner.list_recent_proposals(limit).await
    }

    async fn insert_proposal(&self, proposal: &NewProposal) -> da0_store::Result<ProposalRecord> {
        self.inner.insert_proposal(proposal).await
    }

    async fn list_votes(&self, proposal_id: &ProposalId) -> da0_store::Result<Vec<Vote>> {
        self.inner.list_votes(proposal_id).await
    }

    async fn insert_vote(&self, vote: &NewVote) -> da0_store::Result<Vote> {
        self.inner.insert_vote(vote).await
    }
}
