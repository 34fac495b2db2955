//! Due-set filtering.

use crate::types::WordPair;
use chrono::{DateTime, Utc};

/// Words whose next review date has passed, in their original order.
///
/// An empty result is the normal "nothing to review" state, not an error.
pub fn due_words(words: &[WordPair], now: DateTime<Utc>) -> Vec<WordPair> {
    words.iter().filter(|w| w.is_due(now)).cloned().collect()
}

pub fn due_count(words: &[WordPair], now: DateTime<Utc>) -> usize {
    words.iter().filter(|w| w.is_due(now)).count()
}

/// Earliest scheduled review among words that are not yet due.
pub fn next_due_date(words: &[WordPair], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    words
        .iter()
        .map(|w| w.next_review_date)
        .filter(|date| *date > now)
        .min()
}
