//! Core vocabulary trainer library.
//!
//! Provides:
//! - Due-set filtering and random review selection
//! - Answer grading for typed translations (Levenshtein distance)
//! - Recall-based spaced repetition scheduling
//! - A review controller that drives a word store collaborator
//! - Shared types (WordPair, RecallJudgment, ReviewSession, etc.)

pub mod algorithm;
pub mod controller;
pub mod due;
pub mod error;
pub mod matching;
pub mod selector;
pub mod settings;
pub mod stats;
pub mod store;
pub mod types;

pub use algorithm::{calculate_next_state, get_algorithm, RecallScheduler, SchedulingAlgorithm};
pub use controller::ReviewController;
pub use due::{due_count, due_words, next_due_date};
pub use error::{CoreError, Result, StoreError};
pub use matching::{
    check_answer, compare_answer, levenshtein_distance, normalize_answer, normalized_similarity,
    word_diff, AnswerComparison, DiffSegment, DiffType, GradingPolicy,
};
pub use selector::{select_review, RandomSource, RngSource};
pub use settings::Settings;
pub use stats::{summarize, tier_counts, StudySummary, TierCounts};
pub use store::{MemoryStore, WordStore};
pub use types::{Direction, MasteryTier, NewWordPair, RecallJudgment, ReviewSession, WordPair};
