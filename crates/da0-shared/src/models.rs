//! Governance entities as stored by the backend and as displayed.
//!
//! Row structs use the backend's snake_case column names so they can be
//! deserialized straight from the REST API and bound to SQLite columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Address, OrganizationId, ProposalId, ProposalStatus};

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

/// A DAO.  Counts are cached display values maintained by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub description: String,
    /// Logo image URL.
    pub logo: String,
    pub proposals_count: i64,
    pub members_count: i64,
    /// Banner style token (a gradient class list).
    pub banner_gradient: String,
}

// ---------------------------------------------------------------------------
// Proposal
// ---------------------------------------------------------------------------

/// A proposal row as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProposalRecord {
    pub id: ProposalId,
    pub dao_id: OrganizationId,
    pub title: String,
    pub description: String,
    pub status: ProposalStatus,
    /// Human-readable end date label, never parsed.
    pub end_date: String,
    pub vote_count: i64,
    pub author: Address,
    /// Quorum threshold in percent.
    pub quorum: u32,
    /// Choice labels entered at creation time.
    #[serde(default)]
    pub choices: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting a proposal.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewProposal {
    pub dao_id: OrganizationId,
    pub title: String,
    pub description: String,
    pub author: Address,
    pub status: ProposalStatus,
    pub end_date: String,
    pub vote_count: i64,
    pub quorum: u32,
    /// Stored by the SQLite backend only; the hosted table has no such column.
    #[serde(skip_serializing)]
    pub choices: Vec<String>,
}

/// One choice with its display percentage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChoiceResult {
    pub name: String,
    pub percentage: u32,
}

/// A proposal as the views present it: the stored row plus derived results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: ProposalId,
    pub dao_id: OrganizationId,
    pub title: String,
    pub description: String,
    pub status: ProposalStatus,
    pub end_date: String,
    pub vote_count: i64,
    pub author: Address,
    pub quorum: u32,
    pub choices: Vec<ChoiceResult>,
}

impl Proposal {
    pub fn from_record(record: ProposalRecord, choices: Vec<ChoiceResult>) -> Self {
        Self {
            id: record.id,
            dao_id: record.dao_id,
            title: record.title,
            description: record.description,
            status: record.status,
            end_date: record.end_date,
            vote_count: record.vote_count,
            author: record.author,
            quorum: record.quorum,
            choices,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProposalStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Vote
// ---------------------------------------------------------------------------

/// A single voter's choice on a proposal.  At most one per (proposal, voter),
/// enforced by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub id: String,
    pub proposal_id: ProposalId,
    pub voter_address: Address,
    pub choice_index: u32,
    /// Denormalized label of the chosen option.
    pub choice_name: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting a vote.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewVote {
    pub proposal_id: ProposalId,
    pub voter_address: Address,
    pub choice_index: u32,
    pub choice_name: String,
}
