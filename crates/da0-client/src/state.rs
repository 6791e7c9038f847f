//! Application root.
//!
//! [`App`] owns the store, the wallet bridge and the single
//! [`SessionManager`], and is handed to every view by reference.  A network
//! change reported by the wallet rebuilds the session through
//! [`App::reload`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use da0_store::GovernanceStore;

use crate::commands::create::{load_create_form, CreateProposalPage};
use crate::commands::home::{load_home, HomeView};
use crate::commands::organization::{load_organization, OrganizationView};
use crate::commands::proposal::{load_proposal, ProposalPage};
use crate::config::ClientConfig;
use crate::events::SessionEvent;
use crate::routes::Route;
use crate::session::SessionManager;
use crate::wallet::WalletBridge;

/// Counter identifying the latest navigation.  A load only lands if no
/// newer navigation started while it was in flight.
#[derive(Debug, Default)]
pub struct Navigation {
    current: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Navigation {
    pub fn begin(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}

/// A loaded screen.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "camelCase")]
pub enum View {
    Home(HomeView),
    Organization(OrganizationView),
    Proposal(ProposalPage),
    CreateProposal(CreateProposalPage),
    /// The route's entity could not be loaded.
    NotFound { path: String },
}

pub struct App {
    pub config: ClientConfig,
    store: Arc<dyn GovernanceStore>,
    bridge: Option<Arc<dyn WalletBridge>>,
    session: RwLock<Arc<SessionManager>>,
    navigation: Navigation,
    reload_watcher: Mutex<Option<JoinHandle<()>>>,
}

impl App {
    /// Build the root, initialise its session manager and start watching
    /// for reload requests.
    pub async fn start(
        config: ClientConfig,
        store: Arc<dyn GovernanceStore>,
        bridge: Option<Arc<dyn WalletBridge>>,
    ) -> Arc<Self> {
        let session = SessionManager::new(bridge.clone());
        let events = session.subscribe();
        session.init().await;

        info!(
            backend = store.backend_tag(),
            wallet = bridge.is_some(),
            "da0 client started"
        );

        let app = Arc::new(Self {
            config,
            store,
            bridge,
            session: RwLock::new(session),
            navigation: Navigation::default(),
            reload_watcher: Mutex::new(None),
        });
        app.arm_reload_watcher(events);
        app
    }

    /// Reload on the current manager's `ReloadRequired`.  Each reload arms
    /// a new watcher on the replacement manager, replacing this one.
    fn arm_reload_watcher(self: &Arc<Self>, mut rx: broadcast::Receiver<SessionEvent>) {
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(SessionEvent::ReloadRequired) => {
                        if let Some(app) = weak.upgrade() {
                            app.reload().await;
                        }
                        break;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Reload watcher lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("Reload watcher stopped");
        });

        let mut guard = self
            .reload_watcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }

    pub fn store(&self) -> &dyn GovernanceStore {
        self.store.as_ref()
    }

    /// The current session manager.  Replaced by [`App::reload`].
    pub fn session(&self) -> Arc<SessionManager> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Rebuild all world state after a network change: the old session is
    /// torn down and a fresh, unauthenticated one takes its place.
    pub async fn reload(self: &Arc<Self>) {
        let fresh = SessionManager::new(self.bridge.clone());
        let events = fresh.subscribe();
        fresh.init().await;

        let previous = {
            let mut guard = self
                .session
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::replace(&mut *guard, fresh)
        };
        previous.teardown();
        // No await after this point; the caller can be the watcher being replaced.
        self.arm_reload_watcher(events);

        // Any in-flight view load belongs to the old world.
        self.navigation.begin();
        info!("Client state reloaded");
    }

    /// Load the screen for `route`.  Returns `None` when a newer navigation
    /// started before this one finished.
    pub async fn open(&self, route: &Route) -> Option<View> {
        let ticket = self.navigation.begin();
        debug!(route = %route, "Loading view");

        let store = self.store();
        let view = match route {
            Route::Home => Some(View::Home(
                load_home(store, self.config.recent_proposals).await,
            )),
            Route::Organization(id) => load_organization(store, id).await.map(View::Organization),
            Route::Proposal(dao, pid) => load_proposal(store, dao, pid).await.map(View::Proposal),
            Route::CreateProposal(dao) => {
                load_create_form(store, dao).await.map(View::CreateProposal)
            }
        };

        if !self.navigation.is_current(ticket) {
            debug!(route = %route, "Discarding stale view load");
            return None;
        }

        Some(view.unwrap_or_else(|| View::NotFound { path: route.path() }))
    }

    /// Stop background work.
    pub fn shutdown(&self) {
        let watcher = self
            .reload_watcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = watcher {
            handle.abort();
        }
        self.session().teardown();
        info!("da0 client stopped");
    }
}
