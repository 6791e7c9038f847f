use tokio::sync::broadcast;

use da0_shared::{Address, ChainId};

/// Session notifications for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The signature handshake completed for this address.
    Connected(Address),
    /// The authenticated session was dropped.
    Disconnected,
    /// The wallet switched networks.
    ChainChanged(ChainId),
    /// World state depends on the network; the host must rebuild it.
    ReloadRequired,
}

pub fn emit_event(tx: &broadcast::Sender<SessionEvent>, event: SessionEvent) {
    if let Err(broadcast::error::SendError(event)) = tx.send(event) {
        tracing::trace!(?event, "No session event subscribers");
    }
}
