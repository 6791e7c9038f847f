use std::fmt;

use da0_shared::{OrganizationId, ProposalId};

/// Screens the client can show, addressed by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/dao/{id}`
    Organization(OrganizationId),
    /// `/dao/{id}/proposal/{pid}`
    Proposal(OrganizationId, ProposalId),
    /// `/dao/{id}/create`
    CreateProposal(OrganizationId),
}

impl Route {
    /// Parse a path.  Trailing slashes and a query string are ignored;
    /// anything else unknown yields `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["dao", id] => Some(Route::Organization((*id).into())),
            ["dao", id, "create"] => Some(Route::CreateProposal((*id).into())),
            ["dao", id, "proposal", pid] => Some(Route::Proposal((*id).into(), (*pid).into())),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Organization(id) => format!("/dao/{id}"),
            Route::Proposal(id, pid) => format!("/dao/{id}/proposal/{pid}"),
            Route::CreateProposal(id) => format!("/dao/{id}/create"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
