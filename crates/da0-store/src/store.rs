//! The persistence capability consumed by the client.

use async_trait::async_trait;

use da0_shared::{
    NewProposal, NewVote, Organization, OrganizationId, ProposalId, ProposalRecord, Vote,
};

use crate::error::Result;

/// Table-level operations over `daos`, `proposals` and `votes`.
///
/// Organizations are read-only.  Proposals and votes are append-only: there
/// is no update or delete path.
#[async_trait]
pub trait GovernanceStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_tag(&self) -> &'static str;

    /// All organizations, largest membership first.
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    async fn get_organization(&self, id: &OrganizationId) -> Result<Organization>;

    async fn get_proposal(&self, id: &ProposalId) -> Result<ProposalRecord>;

    /// Proposals of one organization, newest first.
    async fn list_proposals_for(&self, dao_id: &OrganizationId) -> Result<Vec<ProposalRecord>>;

    /// The `limit` most recently created proposals across all organizations.
    async fn list_recent_proposals(&self, limit: usize) -> Result<Vec<ProposalRecord>>;

    /// Insert and return the stored row (with its generated id).
    async fn insert_proposal(&self, proposal: &NewProposal) -> Result<ProposalRecord>;

    /// Votes cast on a proposal, newest first.
    async fn list_votes(&self, proposal_id: &ProposalId) -> Result<Vec<Vote>>;

    /// Append a vote.  Fails with a unique violation (see
    /// [`StoreError::is_unique_violation`](crate::StoreError::is_unique_violation))
    /// when the voter already voted on the proposal.
    async fn insert_vote(&self, vote: &NewVote) -> Result<Vote>;
}
