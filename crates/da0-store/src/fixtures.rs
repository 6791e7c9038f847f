//! Row builders shared by the store tests.

use da0_shared::{
    Address, NewProposal, NewVote, Organization, OrganizationId, ProposalId, ProposalStatus,
};

pub(crate) fn address(n: u8) -> Address {
    Address(format!("0x{}", hex_byte(n).repeat(20)))
}

fn hex_byte(n: u8) -> String {
    format!("{n:02x}")
}

pub(crate) fn org(id: &str, members: i64) -> Organization {
    Organization {
        id: OrganizationId(id.into()),
        name: id.to_uppercase(),
        description: format!("{id} governance"),
        logo: format!("https://picsum.photos/seed/{id}/200"),
        proposals_count: 0,
        members_count: members,
        banner_gradient: "from-blue-600 to-indigo-900".into(),
    }
}

pub(crate) fn new_proposal(dao_id: &str, title: &str) -> NewProposal {
    NewProposal {
        dao_id: OrganizationId(dao_id.into()),
        title: title.into(),
        description: format!("{title} description"),
        author: address(0xaa),
        status: ProposalStatus::Active,
        end_date: "1/4/2025".into(),
        vote_count: 0,
        quorum: 10,
        choices: vec!["Yes".into(), "No".into(), "Abstain".into()],
    }
}

pub(crate) fn new_vote(proposal_id: &ProposalId, voter: u8, choice_index: u32) -> NewVote {
    NewVote {
        proposal_id: proposal_id.clone(),
        voter_address: address(voter),
        choice_index,
        choice_name: if choice_index == 0 { "Yes" } else { "No" }.into(),
    }
}
