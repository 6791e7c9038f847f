//! Vote result derivation.
//!
//! Percentages are rounded independently, so they need not sum to 100.

use crate::constants::DETAIL_CHOICES;
use crate::models::{ChoiceResult, Vote};

/// Compute each label's share of `votes`, matched by choice index.
///
/// With no votes every percentage is 0.
pub fn tally_votes(votes: &[Vote], labels: &[&str]) -> Vec<ChoiceResult> {
    let total = votes.len();

    labels
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let count = votes
                .iter()
                .filter(|v| v.choice_index as usize == index)
                .count();
            ChoiceResult {
                name: (*name).to_string(),
                percentage: percentage(count, total),
            }
        })
        .collect()
}

/// Results shown on the proposal detail page.  Always the fixed Yes/No pair,
/// whatever choices the proposal was created with.
pub fn detail_results(votes: &[Vote]) -> Vec<ChoiceResult> {
    tally_votes(votes, &DETAIL_CHOICES)
}

/// Zeroed Yes/No results used by list views, which never load votes.
pub fn placeholder_results() -> Vec<ChoiceResult> {
    tally_votes(&[], &DETAIL_CHOICES)
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}
