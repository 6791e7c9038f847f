//! [`GovernanceStore`] over the local SQLite database.

use std::sync::Mutex;

use async_trait::async_trait;

use da0_shared::{
    NewProposal, NewVote, Organization, OrganizationId, ProposalId, ProposalRecord, Vote,
};

use crate::database::Database;
use crate::error::Result;
use crate::store::GovernanceStore;

/// Local backend.  Statements are short, so the connection is guarded by a
/// plain mutex and never held across an await point.
pub struct LocalStore {
    db: Mutex<Database>,
}

impl LocalStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Run `f` against the database.
    pub fn with_db<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let guard = self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }
}

#[async_trait]
impl GovernanceStore for LocalStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.with_db(|db| db.list_organizations())
    }

    async fn get_organization(&self, id: &OrganizationId) -> Result<Organization> {
        self.with_db(|db| db.get_organization(id))
    }

    async fn get_proposal(&self, id: &ProposalId) -> Result<ProposalRecord> {
        self.with_db(|db| db.get_proposal(id))
    }

    async fn list_proposals_for(&self, dao_id: &OrganizationId) -> Result<Vec<ProposalRecord>> {
        self.with_db(|db| db.list_proposals_for(dao_id))
    }

    async fn list_recent_proposals(&self, limit: usize) -> Result<Vec<ProposalRecord>> {
        self.with_db(|db| db.list_recent_proposals(limit))
    }

    async fn insert_proposal(&self, proposal: &NewProposal) -> Result<ProposalRecord> {
        self.with_db(|db| db.insert_proposal(proposal))
    }

    async fn list_votes(&self, proposal_id: &ProposalId) -> Result<Vec<Vote>> {
        self.with_db(|db| db.list_votes(proposal_id))
    }

    async fn insert_vote(&self, vote: &NewVote) -> Result<Vote> {
        self.with_db(|db| db.insert_vote(vote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{new_proposal, new_vote, org};

    #[tokio::test]
    async fn test_store_round_trip() {
        let store = LocalStore::open_in_memory().unwrap();
        store
            .with_db(|db| db.upsert_organization(&org("base-guild", 5)))
            .unwrap();

        let proposal = store
            .insert_proposal(&new_proposal("base-guild", "BIP-7"))
            .await
            .unwrap();
        store.insert_vote(&new_vote(&proposal.id, 1, 0)).await.unwrap();

        let dup = store.insert_vote(&new_vote(&proposal.id, 1, 0)).await;
        assert!(dup.unwrap_err().is_unique_violation());

        assert_eq!(store.list_votes(&proposal.id).await.unwrap().len(), 1);
        assert_eq!(
            store.get_proposal(&proposal.id).await.unwrap().vote_count,
            1
        );
    }
}
