//! Organization detail page.

use serde::Serialize;
use tracing::{error, warn};

use da0_shared::tally::placeholder_results;
use da0_shared::{Organization, OrganizationId, Proposal};
use da0_store::{GovernanceStore, StoreError};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationView {
    pub organization: Organization,
    /// Newest first.
    pub proposals: Vec<Proposal>,
}

/// Load an organization and its proposals.  `None` means the organization
/// could not be read; a failed proposal read leaves the list empty.
pub async fn load_organization(
    store: &dyn GovernanceStore,
    id: &OrganizationId,
) -> Option<OrganizationView> {
    let organization = match store.get_organization(id).await {
        Ok(org) => org,
        Err(StoreError::NotFound) => {
            warn!(dao = %id, "Organization not found");
            return None;
        }
        Err(e) => {
            error!(dao = %id, error = %e, "Error fetching organization");
            return None;
        }
    };

    let proposals = match store.list_proposals_for(id).await {
        Ok(records) => records
            .into_iter()
            .map(|r| Proposal::from_record(r, placeholder_results()))
            .collect(),
        Err(e) => {
            error!(dao = %id, error = %e, "Error fetching proposals");
            Vec::new()
        }
    };

    Some(OrganizationView {
        organization,
        proposals,
    })
}
