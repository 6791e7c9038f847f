use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

use da0_shared::{Address, NewVote, ProposalId, Vote};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::proposals::{parse_timestamp, timestamp};

impl Database {
    /// Append a vote.  A second vote by the same voter on the same proposal
    /// fails with [`StoreError::UniqueViolation`] and changes nothing.
    pub fn insert_vote(&self, vote: &NewVote) -> Result<Vote> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        self.conn()
            .execute(
                "INSERT INTO votes (id, proposal_id, voter_address, choice_index, choice_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    vote.proposal_id.0,
                    vote.voter_address.0,
                    vote.choice_index,
                    vote.choice_name,
                    timestamp(&now),
                ],
            )
            .map_err(StoreError::from_insert)?;

        Ok(Vote {
            id,
            proposal_id: vote.proposal_id.clone(),
            voter_address: vote.voter_address.clone(),
            choice_index: vote.choice_index,
            choice_name: vote.choice_name.clone(),
            created_at: now,
        })
    }

    /// Votes on a proposal, newest first.
    pub fn list_votes(&self, proposal_id: &ProposalId) -> Result<Vec<Vote>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, proposal_id, voter_address, choice_index, choice_name, created_at
             FROM votes WHERE proposal_id = ?1 ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map(params![proposal_id.0], |row| {
            let created_str: String = row.get(5)?;
            Ok(Vote {
                id: row.get(0)?,
                proposal_id: ProposalId(row.get(1)?),
                voter_address: Address(row.get(2)?),
                choice_index: row.get(3)?,
                choice_name: row.get(4)?,
                created_at: parse_timestamp(5, &created_str)?,
            })
        })?;

        let mut votes = Vec::new();
        for row in rows {
            votes.push(row?);
        }
        Ok(votes)
    }
}
