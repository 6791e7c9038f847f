use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::params;
use uuid::Uuid;

use da0_shared::{Address, NewProposal, OrganizationId, ProposalId, ProposalRecord, ProposalStatus};

use crate::database::Database;
use crate::error::{Result, StoreError};

const PROPOSAL_COLUMNS: &str = "id, dao_id, title, description, status, end_date, vote_count, \
                                author, quorum, choices, created_at";

impl Database {
    /// Insert a proposal and return the stored row.  Fails with a
    /// foreign-key error if the organization does not exist.
    pub fn insert_proposal(&self, proposal: &NewProposal) -> Result<ProposalRecord> {
        let id = ProposalId(Uuid::new_v4().to_string());
        let now = Utc::now();
        let choices = serde_json::to_string(&proposal.choices)?;

        self.conn()
            .execute(
                "INSERT INTO proposals (id, dao_id, title, description, status, end_date, vote_count, author, quorum, choices, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id.0,
                    proposal.dao_id.0,
                    proposal.title,
                    proposal.description,
                    proposal.status.as_str(),
                    proposal.end_date,
                    proposal.vote_count,
                    proposal.author.0,
                    proposal.quorum,
                    choices,
                    timestamp(&now),
                ],
            )
            .map_err(StoreError::from_insert)?;

        self.get_proposal(&id)
    }

    pub fn get_proposal(&self, id: &ProposalId) -> Result<ProposalRecord> {
        self.conn()
            .query_row(
                &format!("SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE id = ?1"),
                params![id.0],
                row_to_proposal,
            )
            .map_err(StoreError::from_query)
    }

    /// Proposals of one organization, newest first.
    pub fn list_proposals_for(&self, dao_id: &OrganizationId) -> Result<Vec<ProposalRecord>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE dao_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(params![dao_id.0], row_to_proposal)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn list_recent_proposals(&self, limit: usize) -> Result<Vec<ProposalRecord>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {PROPOSAL_COLUMNS} FROM proposals
             ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], row_to_proposal)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }
}

/// Fixed-width UTC timestamps so that text ordering is time ordering.
pub(crate) fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(col: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_proposal(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProposalRecord> {
    let status_str: String = row.get(4)?;
    let author: String = row.get(7)?;
    let choices_json: String = row.get(9)?;
    let created_str: String = row.get(10)?;

    let status = status_str.parse::<ProposalStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
    })?;
    let choices: Vec<String> = serde_json::from_str(&choices_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ProposalRecord {
        id: ProposalId(row.get(0)?),
        dao_id: OrganizationId(row.get(1)?),
        title: row.get(2)?,
        description: row.get(3)?,
        status,
        end_date: row.get(5)?,
        vote_count: row.get(6)?,
        author: Address(author),
        quorum: row.get(8)?,
        choices,
        created_at: parse_timestamp(10, &created_str)?,
    })
}
