//! Proposal creation form.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::{error, info, warn};

use da0_shared::draft::ProposalDraft;
use da0_shared::{DraftError, Organization, OrganizationId, ProposalRecord};
use da0_store::GovernanceStore;

use crate::commands::{require_ready, Prompt};
use crate::routes::Route;
use crate::session::SessionManager;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalPage {
    pub organization: Organization,
    pub draft: ProposalDraft,
}

/// Load the form for `dao_id` with an empty Yes/No draft.
pub async fn load_create_form(
    store: &dyn GovernanceStore,
    dao_id: &OrganizationId,
) -> Option<CreateProposalPage> {
    match store.get_organization(dao_id).await {
        Ok(organization) => Some(CreateProposalPage {
            organization,
            draft: ProposalDraft::new(),
        }),
        Err(e) => {
            warn!(dao = %dao_id, error = %e, "Error fetching organization for proposal form");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// Not ready to create; the wallet was prompted instead.
    Prompted(Prompt),
    /// Rejected before any write was attempted.
    Invalid(DraftError),
    /// Stored; the host should navigate to `route`.
    Created {
        route: Route,
        proposal: ProposalRecord,
    },
    Failed,
}

impl CreateOutcome {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CreateOutcome::Invalid(_) => Some("Please fill in all fields."),
            CreateOutcome::Created { .. } => Some("Proposal created successfully!"),
            CreateOutcome::Failed => Some("Failed to create proposal."),
            CreateOutcome::Prompted(_) => None,
        }
    }
}

impl CreateProposalPage {
    /// Submit the draft as a new Active proposal authored by the session's
    /// address.  The end date is one voting period after `now`, rendered in
    /// `now`'s time zone.
    pub async fn submit<Tz: TimeZone>(
        &self,
        session: &SessionManager,
        store: &dyn GovernanceStore,
        now: DateTime<Tz>,
    ) -> CreateOutcome {
        let author = match require_ready(session).await {
            Ok(address) => address,
            Err(prompt) => return CreateOutcome::Prompted(prompt),
        };

        let payload = match self
            .draft
            .to_new_proposal(self.organization.id.clone(), author, &now)
        {
            Ok(payload) => payload,
            Err(e) => {
                info!(reason = %e, "Proposal draft rejected");
                return CreateOutcome::Invalid(e);
            }
        };

        match store.insert_proposal(&payload).await {
            Ok(proposal) => {
                info!(dao = %proposal.dao_id, proposal = %proposal.id, "Proposal created");
                CreateOutcome::Created {
                    route: Route::Proposal(proposal.dao_id.clone(), proposal.id.clone()),
                    proposal,
                }
            }
            Err(e) => {
                error!(dao = %self.organization.id, error = %e, "Error creating proposal");
                CreateOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{connected, seeded_store, ScriptedWallet, ALICE};
    use chrono::Utc;
    use da0_shared::constants::DEFAULT_QUORUM;
    use da0_shared::ProposalStatus;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_with_three_choices() {
        let store = seeded_store();
        let session = connected(&ScriptedWallet::on_target(&[ALICE])).await;

        let mut form = load_create_form(&store, &"stable-base".into())
            .await
            .unwrap();
        form.draft.title = "SIP-3: Add cbBTC collateral".into();
        form.draft.description = "Onboard cbBTC as collateral".into();
        form.draft.add_choice();
        assert!(form.draft.set_choice(2, "Abstain"));

        let outcome = form.submit(&session, &store, noon(2024, 12, 28)).await;
        assert_eq!(outcome.message(), Some("Proposal created successfully!"));

        let CreateOutcome::Created { route, proposal } = outcome else {
            panic!("proposal was not created");
        };
        assert_eq!(proposal.vote_count, 0);
        assert_eq!(proposal.status, ProposalStatus::Active);
        assert_eq!(proposal.quorum, DEFAULT_QUORUM);
        assert_eq!(proposal.end_date, "1/4/2025");
        assert_eq!(proposal.author.as_str(), ALICE);
        assert_eq!(proposal.choices, vec!["Yes", "No", "Abstain"]);
        assert_eq!(
            route.path(),
            format!("/dao/stable-base/proposal/{}", proposal.id)
        );

        let org = store.get_organization(&"stable-base".into()).await.unwrap();
        assert_eq!(org.proposals_count, 1);
    }

    #[tokio::test]
    async fn test_empty_fields_rejected_before_write() {
        let store = seeded_store();
        let session = connected(&ScriptedWallet::on_target(&[ALICE])).await;
        let mut form = load_create_form(&store, &"base-guild".into())
            .await
            .unwrap();

        let outcome = form.submit(&session, &store, Utc::now()).await;
        assert_eq!(outcome, CreateOutcome::Invalid(DraftError::EmptyTitle));
        assert_eq!(outcome.message(), Some("Please fill in all fields."));

        form.draft.title = "Title".into();
        form.draft.description = "Body".into();
        form.draft.add_choice();
        assert_eq!(
            form.submit(&session, &store, Utc::now()).await,
            CreateOutcome::Invalid(DraftError::EmptyChoice { index: 2 })
        );

        assert!(store
            .list_proposals_for(&"base-guild".into())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_wrong_network_prompts_switch_first() {
        let store = seeded_store();
        let session = connected(&ScriptedWallet::on_chain(&[ALICE], "0x1")).await;
        let form = load_create_form(&store, &"base-guild".into())
            .await
            .unwrap();

        // gating comes before validation
        assert!(matches!(
            form.submit(&session, &store, Utc::now()).await,
            CreateOutcome::Prompted(Prompt::SwitchNetwork(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_organization() {
        let store = seeded_store();
        assert!(load_create_form(&store, &"ghost-dao".into()).await.is_none());
    }
}
