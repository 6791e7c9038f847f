//! Landing page: featured organizations and the latest proposals.

use serde::Serialize;
use tracing::error;

use da0_shared::tally::placeholder_results;
use da0_shared::{Organization, Proposal};
use da0_store::GovernanceStore;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    /// Largest communities first.
    pub organizations: Vec<Organization>,
    /// Newest first.  List views never load votes, so results are zeroed.
    pub recent_proposals: Vec<Proposal>,
}

/// Load the landing page.  Organizations are read first; if that fails
/// nothing else is attempted and both lists stay empty.
pub async fn load_home(store: &dyn GovernanceStore, recent_limit: usize) -> HomeView {
    let mut view = HomeView::default();

    match store.list_organizations().await {
        Ok(organizations) => view.organizations = organizations,
        Err(e) => {
            error!(error = %e, "Error fetching organizations");
            return view;
        }
    }

    match store.list_recent_proposals(recent_limit).await {
        Ok(records) => {
            view.recent_proposals = records
                .into_iter()
                .map(|r| Proposal::from_record(r, placeholder_results()))
                .collect();
        }
        Err(e) => error!(error = %e, "Error fetching recent proposals"),
    }

    view
}
