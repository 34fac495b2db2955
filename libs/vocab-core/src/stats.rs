//! Progress reporting over a word collection.

use crate::due::{due_count, next_due_date};
use crate::types::{MasteryTier, WordPair};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of words in each mastery tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub recognition: usize,
    pub comprehension: usize,
    pub active: usize,
}

impl TierCounts {
    pub fn get(&self, tier: MasteryTier) -> usize {
        match tier {
            MasteryTier::Recognition => self.recognition,
            MasteryTier::Comprehension => self.comprehension,
            MasteryTier::Active => self.active,
        }
    }

    pub fn total(&self) -> usize {
        self.recognition + self.comprehension + self.active
    }
}

pub fn tier_counts(words: &[WordPair]) -> TierCounts {
    words
        .iter()
        .fold(TierCounts::default(), |mut counts, word| {
            match word.tier() {
                MasteryTier::Recognition => counts.recognition += 1,
                MasteryTier::Comprehension => counts.comprehension += 1,
                MasteryTier::Active => counts.active += 1,
            }
            counts
        })
}

/// Snapshot shown on a progress screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudySummary {
    pub total: usize,
    pub due: usize,
    pub tiers: TierCounts,
    pub next_due: Option<DateTime<Utc>>,
}

pub fn summarize(words: &[WordPair], now: DateTime<Utc>) -> StudySummary {
    StudySummary {
        total: words.len(),
        due: due_count(words, now),
        tiers: tier_counts(words),
        next_due: next_due_date(words, now),
    }
}
