//! v001 -- Initial schema creation.
//!
//! Creates `daos`, `proposals` and `votes`, mirroring the hosted backend,
//! plus the triggers that keep the cached counters current.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Organizations
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS daos (
    id              TEXT PRIMARY KEY NOT NULL,  -- slug, e.g. 'base-guild'
    name            TEXT NOT NULL,
    description     TEXT NOT NULL,
    logo            TEXT NOT NULL,
    proposals_count INTEGER NOT NULL DEFAULT 0,
    members_count   INTEGER NOT NULL DEFAULT 0,
    banner_gradient TEXT NOT NULL DEFAULT ''
);

-- ----------------------------------------------------------------
-- Proposals
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS proposals (
    id          TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    dao_id      TEXT NOT NULL,                  -- FK -> daos(id)
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    status      TEXT NOT NULL CHECK (status IN ('Active', 'Closed', 'Pending')),
    end_date    TEXT NOT NULL,                  -- display label
    vote_count  INTEGER NOT NULL DEFAULT 0,
    author      TEXT NOT NULL,                  -- wallet address
    quorum      INTEGER NOT NULL,
    choices     TEXT NOT NULL DEFAULT '[]',     -- JSON array of labels
    created_at  TEXT NOT NULL,                  -- RFC-3339, UTC

    FOREIGN KEY (dao_id) REFERENCES daos(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_proposals_dao_created
    ON proposals(dao_id, created_at DESC);

CREATE INDEX IF NOT EXISTS idx_proposals_created
    ON proposals(created_at DESC);

-- ----------------------------------------------------------------
-- Votes
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS votes (
    id            TEXT PRIMARY KEY NOT NULL,    -- UUID v4
    proposal_id   TEXT NOT NULL,                -- FK -> proposals(id)
    voter_address TEXT NOT NULL COLLATE NOCASE,
    choice_index  INTEGER NOT NULL,
    choice_name   TEXT NOT NULL,
    created_at    TEXT NOT NULL,

    UNIQUE (proposal_id, voter_address),
    FOREIGN KEY (proposal_id) REFERENCES proposals(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Cached counters
-- ----------------------------------------------------------------
CREATE TRIGGER IF NOT EXISTS trg_votes_count
AFTER INSERT ON votes
BEGIN
    UPDATE proposals SET vote_count = vote_count + 1 WHERE id = NEW.proposal_id;
END;

CREATE TRIGGER IF NOT EXISTS trg_proposals_count
AFTER INSERT ON proposals
BEGIN
    UPDATE daos SET proposals_count = proposals_count + 1 WHERE id = NEW.dao_id;
END;
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
