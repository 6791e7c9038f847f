//! Wallet session management.
//!
//! A [`SessionManager`] owns the connection state for one running client:
//! which address completed the signature handshake, the chain the wallet
//! reports, and whether a wallet is present at all.  It is built once at the
//! application root and handed down by reference.
//!
//! State machine:
//!
//! ```text
//! Unauthenticated --connect()--> Connecting --accounts + signature--> Authenticated
//!        ^                           |                                     |
//!        +------- failure -----------+                                     |
//!        +------- disconnect() / accountsChanged --------------------------+
//! ```
//!
//! Holding an account is never enough: the session is only authenticated
//! after the wallet signed [`AUTH_MESSAGE`] for that account.  Any account
//! change drops an authenticated session so the account has to sign again.
//! During a handshake, an account change only aborts it when the account
//! being signed for is no longer granted.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use da0_shared::constants::AUTH_MESSAGE;
use da0_shared::{Address, AddressError, ChainId};

use crate::events::{emit_event, SessionEvent};
use crate::wallet::{AddChainParams, WalletBridge, WalletError, WalletEvent};

const EVENT_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionStatus {
    Unauthenticated,
    Connecting,
    Authenticated { address: Address },
}

/// Snapshot of the session as the views see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub status: SessionStatus,
    /// Last chain id reported by the wallet, fetched even when logged out.
    pub chain_id: Option<ChainId>,
    pub wallet_installed: bool,
}

impl Session {
    fn new(wallet_installed: bool) -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            chain_id: None,
            wallet_installed,
        }
    }

    /// The authenticated address, if any.
    pub fn address(&self) -> Option<&Address> {
        match &self.status {
            SessionStatus::Authenticated { address } => Some(address),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.address().is_some()
    }

    pub fn is_connecting(&self) -> bool {
        self.status == SessionStatus::Connecting
    }

    /// True iff the last observed chain id is the target network.
    pub fn is_correct_network(&self) -> bool {
        self.chain_id.as_ref().is_some_and(ChainId::is_target)
    }

    /// Authenticated and on the target network.
    pub fn can_act(&self) -> bool {
        self.is_authenticated() && self.is_correct_network()
    }
}

/// Result of [`SessionManager::switch_network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkSwitch {
    /// No wallet to ask.
    NoWallet,
    /// The wallet accepted the switch request.
    Switched,
    /// The wallet did not know the network; registration was requested.
    /// The switch itself is not retried.
    AddRequested,
    /// Registering the network failed.
    AddFailed,
    /// The switch failed for another reason (e.g. user rejection).
    Failed,
}

#[derive(Error, Debug)]
enum HandshakeError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("No accounts found")]
    NoAccounts,

    #[error("Wallet returned an invalid account: {0}")]
    InvalidAccount(#[from] AddressError),
}

struct Inner {
    session: Session,
    /// Bumped by every disconnect or invalidating account change.  A
    /// handshake only commits if the epoch it started in is still current.
    epoch: u64,
    /// Account the in-flight handshake is signing for.
    candidate: Option<Address>,
}

impl Inner {
    /// An account change leaves a running handshake alone while its
    /// candidate is still among the granted accounts.
    fn handshake_survives(&self, accounts: &[String]) -> bool {
        if !self.session.is_connecting() {
            return false;
        }
        match &self.candidate {
            Some(candidate) => accounts
                .iter()
                .any(|account| account.eq_ignore_ascii_case(candidate.as_str())),
            None => true,
        }
    }
}

pub struct SessionManager {
    bridge: Option<Arc<dyn WalletBridge>>,
    inner: Mutex<Inner>,
    events: broadcast::Sender<SessionEvent>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    /// Create a manager.  `None` means no wallet is installed.
    pub fn new(bridge: Option<Arc<dyn WalletBridge>>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let wallet_installed = bridge.is_some();

        Arc::new(Self {
            bridge,
            inner: Mutex::new(Inner {
                session: Session::new(wallet_installed),
                epoch: 0,
                candidate: None,
            }),
            events,
            listener: Mutex::new(None),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    pub fn is_correct_network(&self) -> bool {
        self.lock().session.is_correct_network()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Startup: read the chain id (no account request, so no implicit
    /// login) and start listening for wallet events.
    pub async fn init(self: &Arc<Self>) {
        let Some(bridge) = self.bridge.clone() else {
            warn!("No wallet detected");
            return;
        };

        let rx = bridge.subscribe();
        self.spawn_listener(rx);

        match bridge.chain_id().await {
            Ok(chain_id) => {
                debug!(chain_id = %chain_id, "Initial chain id");
                self.lock().session.chain_id = Some(chain_id);
            }
            Err(e) => error!(error = %e, "Initialization error"),
        }
    }

    fn spawn_listener(self: &Arc<Self>, mut rx: broadcast::Receiver<WalletEvent>) {
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let Some(manager) = weak.upgrade() else {
                            break;
                        };
                        manager.handle_wallet_event(event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Wallet event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("Wallet event listener stopped");
        });

        let mut guard = self
            .listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }

    /// Stop listening for wallet events.
    pub fn teardown(&self) {
        let mut guard = self
            .listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = guard.take() {
            handle.abort();
            debug!("Wallet event listener unsubscribed");
        }
    }

    /// Apply a wallet notification.
    pub fn handle_wallet_event(&self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                let dropped = {
                    let mut inner = self.lock();
                    if inner.handshake_survives(&accounts) {
                        debug!(
                            accounts = accounts.len(),
                            "Wallet accounts changed during connect, candidate still granted"
                        );
                        return;
                    }
                    inner.epoch += 1;
                    inner.candidate = None;
                    let was = std::mem::replace(
                        &mut inner.session.status,
                        SessionStatus::Unauthenticated,
                    );
                    matches!(was, SessionStatus::Authenticated { .. })
                };
                info!(accounts = accounts.len(), "Wallet accounts changed, session cleared");
                if dropped {
                    emit_event(&self.events, SessionEvent::Disconnected);
                }
            }
            WalletEvent::ChainChanged(chain_id) => {
                self.lock().session.chain_id = Some(chain_id.clone());
                info!(chain_id = %chain_id, "Wallet network changed, reload required");
                emit_event(&self.events, SessionEvent::ChainChanged(chain_id));
                emit_event(&self.events, SessionEvent::ReloadRequired);
            }
        }
    }

    /// Run the login handshake.  Returns whether the session ended up
    /// authenticated.  Failures are logged, never returned.
    pub async fn connect(&self) -> bool {
        let Some(bridge) = self.bridge.clone() else {
            warn!("Connect requested but no wallet is installed");
            return false;
        };

        let epoch = {
            let mut inner = self.lock();
            if inner.session.is_connecting() {
                debug!("Connect already in progress");
                return false;
            }
            inner.session.status = SessionStatus::Connecting;
            inner.epoch
        };

        let result = self.handshake(bridge.as_ref(), epoch).await;

        let mut inner = self.lock();
        if inner.epoch != epoch {
            warn!("Wallet changed during connect, discarding handshake");
            return false;
        }
        inner.candidate = None;

        match result {
            Ok((address, chain_id)) => {
                inner.session.status = SessionStatus::Authenticated {
                    address: address.clone(),
                };
                inner.session.chain_id = Some(chain_id);
                drop(inner);

                info!(address = %address, "Wallet authenticated");
                emit_event(&self.events, SessionEvent::Connected(address));
                true
            }
            Err(e) => {
                inner.session.status = SessionStatus::Unauthenticated;
                drop(inner);

                error!(error = %e, "Failed to connect or sign");
                false
            }
        }
    }

    /// Ask the wallet to move to the target network, registering it first
    /// if the wallet does not know it.
    pub async fn switch_network(&self) -> NetworkSwitch {
        let Some(bridge) = self.bridge.clone() else {
            return NetworkSwitch::NoWallet;
        };

        match bridge.switch_chain(&ChainId::target()).await {
            Ok(()) => {
                info!("Network switch requested");
                NetworkSwitch::Switched
            }
            Err(e) if e.is_unrecognized_chain() => {
                match bridge.add_chain(&AddChainParams::target()).await {
                    Ok(()) => {
                        info!("Target network registration requested");
                        NetworkSwitch::AddRequested
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to add Base network");
                        NetworkSwitch::AddFailed
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to switch network");
                NetworkSwitch::Failed
            }
        }
    }

    async fn handshake(
        &self,
        bridge: &dyn WalletBridge,
        epoch: u64,
    ) -> Result<(Address, ChainId), HandshakeError> {
        let accounts = bridge.request_accounts().await?;
        let first = accounts.first().ok_or(HandshakeError::NoAccounts)?;
        let address = Address::parse(first)?;

        {
            let mut inner = self.lock();
            if inner.epoch == epoch {
                inner.candidate = Some(address.clone());
            }
        }

        bridge.personal_sign(AUTH_MESSAGE, &address).await?;

        let chain_id = bridge.chain_id().await?;
        Ok((address, chain_id))
    }

    /// Forget the session locally.  Wallets have no disconnect RPC.
    pub fn disconnect(&self) {
        let was_authenticated = {
            let mut inner = self.lock();
            inner.epoch += 1;
            inner.candidate = None;
            let was = inner.session.is_authenticated();
            inner.session.status = SessionStatus::Unauthenticated;
            was
        };

        info!("Wallet disconnected");
        if was_authenticated {
            emit_event(&self.events, SessionEvent::Disconnected);
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.teardown();
    }
}
