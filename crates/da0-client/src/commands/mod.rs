//! View command handlers.
//!
//! Each sub-module backs one screen: it loads the screen's data from a
//! [`GovernanceStore`](da0_store::GovernanceStore) and performs its actions
//! against the [`SessionManager`].  Handlers never return errors; failures
//! are logged and folded into the returned view or outcome.

pub mod create;
pub mod home;
pub mod organization;
pub mod proposal;

use da0_shared::Address;

use crate::session::{NetworkSwitch, Session, SessionManager};

/// What an action needs before it may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Authenticated on the target network.
    Ready(Address),
    NeedsConnect,
    NeedsNetwork,
}

impl Gate {
    pub fn of(session: &Session) -> Self {
        match session.address() {
            None => Gate::NeedsConnect,
            Some(_) if !session.is_correct_network() => Gate::NeedsNetwork,
            Some(address) => Gate::Ready(address.clone()),
        }
    }
}

/// Result of resolving a gate that was not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// `connect()` ran; carries whether it authenticated.
    Connect(bool),
    SwitchNetwork(NetworkSwitch),
}

/// Check the session and, if an action is not yet allowed, run the
/// wallet prompt that unblocks it.  Returns the address when ready.
pub async fn require_ready(session: &SessionManager) -> Result<Address, Prompt> {
    match Gate::of(&session.session()) {
        Gate::Ready(address) => Ok(address),
        Gate::NeedsConnect => Err(Prompt::Connect(session.connect().await)),
        Gate::NeedsNetwork => Err(Prompt::SwitchNetwork(session.switch_network().await)),
    }
}

/// Outcome of the landing page's main button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroAction {
    Prompted(Prompt),
    /// Already connected on the right network.
    Launch,
}

pub async fn hero_action(session: &SessionManager) -> HeroAction {
    match require_ready(session).await {
        Ok(_) => HeroAction::Launch,
        Err(prompt) => HeroAction::Prompted(prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{connected, ScriptedWallet, ALICE};
    use crate::wallet::WalletBridge;
    use std::sync::Arc;

    #[test]
    fn test_gate_order() {
        let mut session = Session {
            status: crate::session::SessionStatus::Unauthenticated,
            chain_id: Some(da0_shared::ChainId("0x1".into())),
            wallet_installed: true,
        };
        assert_eq!(Gate::of(&session), Gate::NeedsConnect);

        session.status = crate::session::SessionStatus::Authenticated {
            address: Address(ALICE.into()),
        };
        assert_eq!(Gate::of(&session), Gate::NeedsNetwork);

        session.chain_id = Some(da0_shared::ChainId::target());
        assert_eq!(Gate::of(&session), Gate::Ready(Address(ALICE.into())));
    }

    #[tokio::test]
    async fn test_hero_action() {
        let wallet = ScriptedWallet::on_chain(&[ALICE], "0x1");
        let session = SessionManager::new(Some(wallet.clone() as Arc<dyn WalletBridge>));
        session.init().await;

        assert_eq!(
            hero_action(&session).await,
            HeroAction::Prompted(Prompt::Connect(true))
        );
        assert_eq!(
            hero_action(&session).await,
            HeroAction::Prompted(Prompt::SwitchNetwork(NetworkSwitch::Switched))
        );

        let on_target = ScriptedWallet::on_target(&[ALICE]);
        let session = connected(&on_target).await;
        assert_eq!(hero_action(&session).await, HeroAction::Launch);
    }
}
