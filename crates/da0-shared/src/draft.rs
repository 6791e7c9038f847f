//! Proposal creation form state.

use chrono::{DateTime, Datelike, Duration, TimeZone};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_QUORUM, DETAIL_CHOICES, MIN_CHOICES, VOTING_PERIOD_DAYS};
use crate::error::DraftError;
use crate::models::NewProposal;
use crate::types::{Address, OrganizationId, ProposalStatus};

/// Editable proposal draft.  Starts out with a Yes/No choice pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProposalDraft {
    pub title: String,
    pub description: String,
    pub choices: Vec<String>,
}

impl Default for ProposalDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            choices: DETAIL_CHOICES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ProposalDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty choice.
    pub fn add_choice(&mut self) {
        self.choices.push(String::new());
    }

    /// Replace the text of choice `index`.  Returns `false` if out of range.
    pub fn set_choice(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.choices.get_mut(index) {
            Some(choice) => {
                *choice = value.into();
                true
            }
            None => false,
        }
    }

    /// Remove choice `index`, never going below the minimum choice count.
    pub fn remove_choice(&mut self, index: usize) -> bool {
        if self.choices.len() <= MIN_CHOICES || index >= self.choices.len() {
            return false;
        }
        self.choices.remove(index);
        true
    }

    /// Every field must be non-empty.  Whitespace counts as content.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.description.is_empty() {
            return Err(DraftError::EmptyDescription);
        }
        if self.choices.len() < MIN_CHOICES {
            return Err(DraftError::TooFewChoices { min: MIN_CHOICES });
        }
        if let Some(index) = self.choices.iter().position(|c| c.is_empty()) {
            return Err(DraftError::EmptyChoice { index });
        }
        Ok(())
    }

    /// Validate and build the insert payload: status Active, no votes,
    /// default quorum, end date one voting period after `created_at`.
    pub fn to_new_proposal<Tz: TimeZone>(
        &self,
        dao_id: OrganizationId,
        author: Address,
        created_at: &DateTime<Tz>,
    ) -> Result<NewProposal, DraftError> {
        self.validate()?;

        Ok(NewProposal {
            dao_id,
            title: self.title.clone(),
            description: self.description.clone(),
            author,
            status: ProposalStatus::Active,
            end_date: end_date_label(created_at),
            vote_count: 0,
            quorum: DEFAULT_QUORUM,
            choices: self.choices.clone(),
        })
    }
}

/// Short `M/D/YYYY` date label, one voting period after `created_at`,
/// in the caller's time zone.
pub fn end_date_label<Tz: TimeZone>(created_at: &DateTime<Tz>) -> String {
    let end = created_at.clone() + Duration::days(VOTING_PERIOD_DAYS);
    format!("{}/{}/{}", end.month(), end.day(), end.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn author() -> Address {
        Address("0x71C7656EC7ab88b098defB751B7401B5f6d8976F".into())
    }

    fn filled() -> ProposalDraft {
        ProposalDraft {
            title: "Fund the grants round".into(),
            description: "Allocate 50k USDC".into(),
            choices: vec!["Yes".into(), "No".into(), "Abstain".into()],
        }
    }

    #[test]
    fn test_default_choices() {
        assert_eq!(ProposalDraft::new().choices, vec!["Yes", "No"]);
    }

    #[test]
    fn test_remove_keeps_minimum() {
        let mut draft = ProposalDraft::new();
        assert!(!draft.remove_choice(0));
        draft.add_choice();
        assert_eq!(draft.choices.len(), 3);
        assert!(draft.remove_choice(2));
        assert_eq!(draft.choices.len(), 2);
        assert!(!draft.remove_choice(5));
    }

    #[test]
    fn test_set_choice() {
        let mut draft = ProposalDraft::new();
        assert!(draft.set_choice(1, "Reject"));
        assert_eq!(draft.choices[1], "Reject");
        assert!(!draft.set_choice(9, "nope"));
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut draft = filled();
        draft.title.clear();
        assert_eq!(draft.validate(), Err(DraftError::EmptyTitle));

        let mut draft = filled();
        draft.description.clear();
        assert_eq!(draft.validate(), Err(DraftError::EmptyDescription));

        let mut draft = filled();
        draft.add_choice();
        assert_eq!(draft.validate(), Err(DraftError::EmptyChoice { index: 3 }));

        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_whitespace_counts_as_content() {
        let mut draft = filled();
        draft.title = "  ".into();
        draft.choices[2] = " ".into();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_new_proposal_defaults() {
        let created_at = Utc.with_ymd_and_hms(2024, 12, 28, 15, 0, 0).unwrap();
        let new = filled()
            .to_new_proposal(OrganizationId("base-guild".into()), author(), &created_at)
            .unwrap();

        assert_eq!(new.status, ProposalStatus::Active);
        assert_eq!(new.vote_count, 0);
        assert_eq!(new.quorum, 10);
        assert_eq!(new.end_date, "1/4/2025");
        assert_eq!(new.choices, vec!["Yes", "No", "Abstain"]);
    }

    #[test]
    fn test_invalid_draft_builds_nothing() {
        let mut draft = filled();
        draft.title.clear();
        let res = draft.to_new_proposal(OrganizationId("x".into()), author(), &Utc::now());
        assert_eq!(res, Err(DraftError::EmptyTitle));
    }
}
