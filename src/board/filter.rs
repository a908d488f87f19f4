//! Free-text card filtering.
//!
//! A card matches when the filter is a case-insensitive substring of its
//! title, description or priority name, or when it equals one of its labels
//! (exact, case-insensitive). Filtering never mutates the snapshot; callers
//! re-evaluate it whenever they need the visible set.

use super::snapshot::BoardSnapshot;
use super::{Card, Priority};

/// Whether `card` is visible under `filter`. An empty filter matches everything.
pub fn card_matches(card: &Card, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    card.title.to_lowercase().contains(&needle)
        || card.description.to_lowercase().contains(&needle)
        || card.priority.as_str().contains(&needle)
        || card.has_label(filter)
}

/// Order-preserving visible subsequence of `cards`.
pub fn filter_cards<'a>(cards: &'a [Card], filter: Option<&str>) -> Vec<&'a Card> {
    match filter {
        Some(f) if !f.is_empty() => cards.iter().filter(|c| card_matches(c, f)).collect(),
        _ => cards.iter().collect(),
    }
}

/// Matching cards across every column, for the status line.
pub fn total_matches(snapshot: &BoardSnapshot, filter: Option<&str>) -> usize {
    snapshot
        .columns
        .iter()
        .map(|col| filter_cards(&col.cards, filter).len())
        .sum()
}

/// Quick filter toggle: selecting the active priority again clears it.
pub fn toggle_priority(current: Option<&str>, priority: Priority) -> Option<String> {
    if current == Some(priority.as_str()) {
        None
    } else {
        Some(priority.as_str().to_string())
    }
}
