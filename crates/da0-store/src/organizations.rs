use rusqlite::params;

use da0_shared::{Organization, OrganizationId};

use crate::database::Database;
use crate::error::{Result, StoreError};

const ORG_COLUMNS: &str =
    "id, name, description, logo, proposals_count, members_count, banner_gradient";

impl Database {
    /// Insert or replace an organization.  The client never writes
    /// organizations; this exists for seeding the local backend.
    pub fn upsert_organization(&self, org: &Organization) -> Result<()> {
        self.conn().execute(
            "INSERT INTO daos (id, name, description, logo, proposals_count, members_count, banner_gradient)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                logo = excluded.logo,
                proposals_count = excluded.proposals_count,
                members_count = excluded.members_count,
                banner_gradient = excluded.banner_gradient",
            params![
                org.id.0,
                org.name,
                org.description,
                org.logo,
                org.proposals_count,
                org.members_count,
                org.banner_gradient,
            ],
        )?;
        Ok(())
    }

    pub fn get_organization(&self, id: &OrganizationId) -> Result<Organization> {
        self.conn()
            .query_row(
                &format!("SELECT {ORG_COLUMNS} FROM daos WHERE id = ?1"),
                params![id.0],
                row_to_organization,
            )
            .map_err(StoreError::from_query)
    }

    pub fn list_organizations(&self) -> Result<Vec<Organization>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {ORG_COLUMNS} FROM daos ORDER BY members_count DESC, name ASC"
        ))?;
        let rows = stmt.query_map([], row_to_organization)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn count_organizations(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM daos", [], |row| row.get(0))?)
    }
}

fn row_to_organization(row: &rusqlite::Row<'_>) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: OrganizationId(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        logo: row.get(3)?,
        proposals_count: row.get(4)?,
        members_count: row.get(5)?,
        banner_gradient: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::org;

    #[test]
    fn test_list_ordered_by_members() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_organization(&org("small", 10)).unwrap();
        db.upsert_organization(&org("large", 15_400)).unwrap();
        db.upsert_organization(&org("medium", 3_200)).unwrap();

        let ids: Vec<String> = db
            .list_organizations()
            .unwrap()
            .into_iter()
            .map(|o| o.id.0)
            .collect();
        assert_eq!(ids, vec!["large", "medium", "small"]);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .get_organization(&OrganizationId("nope".into()))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_upsert_replaces() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_organization(&org("guild", 1)).unwrap();
        db.upsert_organization(&org("guild", 2)).unwrap();

        assert_eq!(db.count_organizations().unwrap(), 1);
        let stored = db.get_organization(&OrganizationId("guild".into())).unwrap();
        assert_eq!(stored.members_count, 2);
    }
}
