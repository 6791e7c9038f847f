//! Display state derived from the session.
//!
//! Labels and enabled flags for the action controls, the navigation
//! bar account badge and the warning banners.

use serde::Serialize;

use da0_shared::OrganizationId;

use crate::routes::Route;
use crate::session::Session;

pub const BANNER_NO_WALLET: &str = "No wallet detected. Please install MetaMask.";
pub const BANNER_WRONG_NETWORK: &str = "Wrong network. Please switch to Base.";

const LABEL_SWITCH: &str = "Switch to Base";
const LABEL_CONNECT_WALLET: &str = "Connect Wallet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub label: &'static str,
    pub disabled: bool,
}

/// The vote button on the proposal page.
pub fn vote_button(
    session: &Session,
    proposal_active: bool,
    voting: bool,
    has_selection: bool,
) -> ActionButton {
    let label = if voting {
        "Voting..."
    } else if !proposal_active {
        "Voting Closed"
    } else if !session.is_authenticated() {
        LABEL_CONNECT_WALLET
    } else if !session.is_correct_network() {
        LABEL_SWITCH
    } else {
        "Vote"
    };

    ActionButton {
        label,
        disabled: !proposal_active || voting || (!has_selection && session.can_act()),
    }
}

/// Choice buttons lock while an authenticated user is on the wrong
/// network.  Logged-out users may still pick a choice.
pub fn choices_selectable(session: &Session) -> bool {
    !(session.is_authenticated() && !session.is_correct_network())
}

/// The submit button of the creation form.
pub fn create_button(session: &Session, submitting: bool) -> ActionButton {
    let label = if submitting {
        "Creating..."
    } else if !session.is_authenticated() {
        LABEL_CONNECT_WALLET
    } else if !session.is_correct_network() {
        LABEL_SWITCH
    } else {
        "Create Proposal"
    };

    ActionButton {
        label,
        disabled: submitting,
    }
}

/// The landing page's main button.  Always clickable.
pub fn hero_button(session: &Session) -> ActionButton {
    let label = if !session.is_authenticated() {
        "Connect to Start"
    } else if !session.is_correct_network() {
        LABEL_SWITCH
    } else {
        "Launch App"
    };

    ActionButton {
        label,
        disabled: false,
    }
}

/// The navigation bar's connect button, shown while logged out.
pub fn connect_button(session: &Session) -> ActionButton {
    ActionButton {
        label: if session.is_connecting() {
            "Connecting..."
        } else {
            "Connect"
        },
        disabled: session.is_connecting() || !session.wallet_installed,
    }
}

/// Shortened address for the navigation bar, when authenticated.
pub fn account_badge(session: &Session) -> Option<String> {
    session.address().map(|a| a.short())
}

/// Warning banners, top first.
pub fn banners(session: &Session) -> Vec<&'static str> {
    let mut out = Vec::new();
    if session.is_authenticated() && !session.is_correct_network() {
        out.push(BANNER_WRONG_NETWORK);
    }
    if !session.wallet_installed {
        out.push(BANNER_NO_WALLET);
    }
    out
}

/// Target of the "New Proposal" link, or `None` while actions are gated.
pub fn new_proposal_link(session: &Session, dao_id: &OrganizationId) -> Option<Route> {
    session
        .can_act()
        .then(|| Route::CreateProposal(dao_id.clone()))
}
