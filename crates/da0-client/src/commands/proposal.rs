//! Proposal detail page: results, voter roster and vote submission.

use serde::Serialize;
use tracing::{error, info, warn};

use da0_shared::tally::detail_results;
use da0_shared::{NewVote, Organization, OrganizationId, Proposal, ProposalId, Vote};
use da0_store::{GovernanceStore, StoreError};

use crate::commands::{require_ready, Prompt};
use crate::session::SessionManager;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPage {
    pub organization: Organization,
    /// Results are always the fixed Yes/No pair.
    pub proposal: Proposal,
    /// Voter roster, newest first.
    pub votes: Vec<Vote>,
    pub selected: Option<usize>,
}

/// Load a proposal with its organization and votes.  Any read failure
/// yields `None` (rendered as "Proposal not found").
pub async fn load_proposal(
    store: &dyn GovernanceStore,
    dao_id: &OrganizationId,
    proposal_id: &ProposalId,
) -> Option<ProposalPage> {
    let loaded = async {
        let organization = store.get_organization(dao_id).await?;
        let record = store.get_proposal(proposal_id).await?;
        let votes = store.list_votes(proposal_id).await?;
        Ok::<_, StoreError>((organization, record, votes))
    }
    .await;

    match loaded {
        Ok((organization, record, votes)) => {
            let results = detail_results(&votes);
            Some(ProposalPage {
                organization,
                proposal: Proposal::from_record(record, results),
                votes,
                selected: None,
            })
        }
        Err(e) => {
            error!(dao = %dao_id, proposal = %proposal_id, error = %e, "Error fetching proposal context");
            None
        }
    }
}

/// Result of pressing the vote button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Not ready to vote; the wallet was prompted instead.
    Prompted(Prompt),
    Closed,
    NoChoiceSelected,
    Cast,
    AlreadyVoted,
    Failed,
}

impl VoteOutcome {
    /// Notice shown to the user, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            VoteOutcome::Cast => Some("Vote cast successfully!"),
            VoteOutcome::AlreadyVoted => Some("You have already voted on this proposal!"),
            VoteOutcome::Failed => Some("Failed to cast vote."),
            _ => None,
        }
    }
}

impl ProposalPage {
    /// Select a choice.  Returns `false` for an index with no choice.
    pub fn select_choice(&mut self, index: usize) -> bool {
        if index >= self.proposal.choices.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Submit a vote for the selected choice.
    ///
    /// Local state only changes after the write succeeded: the cached vote
    /// count goes up by one and the roster and results are re-read.
    pub async fn cast_vote(
        &mut self,
        session: &SessionManager,
        store: &dyn GovernanceStore,
    ) -> VoteOutcome {
        if !self.proposal.is_active() {
            return VoteOutcome::Closed;
        }

        let voter = match require_ready(session).await {
            Ok(address) => address,
            Err(prompt) => return VoteOutcome::Prompted(prompt),
        };

        let Some(index) = self.selected else {
            return VoteOutcome::NoChoiceSelected;
        };
        let Some(choice) = self.proposal.choices.get(index) else {
            return VoteOutcome::NoChoiceSelected;
        };

        let vote = NewVote {
            proposal_id: self.proposal.id.clone(),
            voter_address: voter,
            choice_index: index as u32,
            choice_name: choice.name.clone(),
        };

        match store.insert_vote(&vote).await {
            Ok(_) => {}
            Err(e) if e.is_unique_violation() => {
                info!(proposal = %self.proposal.id, voter = %vote.voter_address, "Duplicate vote rejected");
                return VoteOutcome::AlreadyVoted;
            }
            Err(e) => {
                error!(proposal = %self.proposal.id, error = %e, "Error casting vote");
                return VoteOutcome::Failed;
            }
        }

        self.proposal.vote_count += 1;

        match store.list_votes(&self.proposal.id).await {
            Ok(votes) => {
                self.proposal.choices = detail_results(&votes);
                self.votes = votes;
            }
            Err(e) => warn!(proposal = %self.proposal.id, error = %e, "Failed to refresh votes"),
        }

        info!(proposal = %self.proposal.id, choice = %vote.choice_name, "Vote cast");
        VoteOutcome::Cast
    }
}
