//! Spaced repetition scheduling.

pub mod recall;

pub use recall::RecallScheduler;

use crate::types::{RecallJudgment, WordPair};
use chrono::{DateTime, Utc};

/// Trait for scheduling algorithms.
pub trait SchedulingAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Compute the word's state after a review. The input is left untouched.
    fn schedule(&self, word: &WordPair, judgment: RecallJudgment, now: DateTime<Utc>) -> WordPair;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SchedulingAlgorithm>> {
    match name {
        "recall" => Some(Box::new(RecallScheduler::default())),
        _ => None,
    }
}

/// Next state for `word` under the default scheduler.
pub fn calculate_next_state(
    word: &WordPair,
    judgment: RecallJudgment,
    now: DateTime<Utc>,
) -> WordPair {
    RecallScheduler::default().schedule(word, judgment, now)
}
