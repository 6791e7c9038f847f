//! Demo organizations for an empty local database.

use da0_shared::{Organization, OrganizationId};

use crate::database::Database;
use crate::error::Result;

fn demo_organization(
    id: &str,
    name: &str,
    description: &str,
    members_count: i64,
    banner_gradient: &str,
) -> Organization {
    Organization {
        id: OrganizationId(id.to_string()),
        name: name.to_string(),
        description: description.to_string(),
        logo: format!("https://picsum.photos/seed/{id}/200"),
        proposals_count: 0,
        members_count,
        banner_gradient: banner_gradient.to_string(),
    }
}

pub fn demo_organizations() -> Vec<Organization> {
    vec![
        demo_organization(
            "base-guild",
            "Base Guild",
            "The primary governance body for the Base ecosystem community development.",
            15_400,
            "from-blue-600 to-indigo-900",
        ),
        demo_organization(
            "degen-dao",
            "Degen DAO",
            "A community-led fund for experimental projects built exclusively on Base.",
            8_200,
            "from-purple-600 to-pink-900",
        ),
        demo_organization(
            "stable-base",
            "StableBase",
            "Protocol governance for the premiere yield-bearing stablecoin on Base.",
            3_200,
            "from-emerald-600 to-teal-900",
        ),
        demo_organization(
            "blue-ocean",
            "Blue Ocean",
            "Managing liquidity incentives for the Blue Ocean decentralized exchange.",
            1_200,
            "from-sky-600 to-blue-900",
        ),
    ]
}

impl Database {
    /// Insert the demo organizations if the `daos` table is empty.
    /// Returns how many were inserted.
    pub fn seed_demo_organizations(&self) -> Result<usize> {
        if self.count_organizations()? > 0 {
            return Ok(0);
        }

        let orgs = demo_organizations();
        for org in &orgs {
            self.upsert_organization(org)?;
        }

        tracing::info!(count = orgs.len(), "seeded demo organizations");
        Ok(orgs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_only_once() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.seed_demo_organizations().unwrap(), 4);
        assert_eq!(db.seed_demo_organizations().unwrap(), 0);

        let first = &db.list_organizations().unwrap()[0];
        assert_eq!(first.id.0, "base-guild");
    }
}
