//! Core types for the vocabulary trainer.

use crate::error::{CoreError, StoreError};
use crate::matching::GradingPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Ease assigned to new words. Carried but not yet used by scheduling.
pub const DEFAULT_EASE: f64 = 2.5;

/// Mastery below this is the recognition tier.
pub const COMPREHENSION_THRESHOLD: f64 = 0.7;
/// Mastery at or above this is the active tier.
pub const ACTIVE_THRESHOLD: f64 = 1.5;

/// Outcome of a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallJudgment {
    Incorrect,
    /// Correct, but slow or with small mistakes.
    Hesitant,
    /// Correct and immediate.
    Instant,
}

impl RecallJudgment {
    pub const ALL: [RecallJudgment; 3] = [Self::Incorrect, Self::Hesitant, Self::Instant];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incorrect => "incorrect",
            Self::Hesitant => "hesitant",
            Self::Instant => "instant",
        }
    }

    pub fn is_correct(self) -> bool {
        !matches!(self, Self::Incorrect)
    }
}

impl fmt::Display for RecallJudgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecallJudgment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "incorrect" => Ok(Self::Incorrect),
            "hesitant" => Ok(Self::Hesitant),
            "instant" => Ok(Self::Instant),
            other => Err(format!("unknown recall judgment: {other}")),
        }
    }
}

/// Which side of a pair is shown as the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Show word A, expect word B.
    AToB,
    /// Show word B, expect word A.
    BToA,
}

/// Reporting tier derived from a word's mastery level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryTier {
    Recognition,
    Comprehension,
    Active,
}

impl MasteryTier {
    pub fn from_level(mastery_level: f64) -> Self {
        if mastery_level >= ACTIVE_THRESHOLD {
            Self::Active
        } else if mastery_level >= COMPREHENSION_THRESHOLD {
            Self::Comprehension
        } else {
            Self::Recognition
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Recognition => "Recognition",
            Self::Comprehension => "Comprehension",
            Self::Active => "Active",
        }
    }
}

/// User input for a new word pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWordPair {
    pub language_a: String,
    pub word_a: String,
    pub language_b: String,
    pub word_b: String,
}

impl NewWordPair {
    /// Build from raw input, trimming every field.
    pub fn new(
        language_a: impl AsRef<str>,
        word_a: impl AsRef<str>,
        language_b: impl AsRef<str>,
        word_b: impl AsRef<str>,
    ) -> Self {
        Self {
            language_a: language_a.as_ref().trim().to_string(),
            word_a: word_a.as_ref().trim().to_string(),
            language_b: language_b.as_ref().trim().to_string(),
            word_b: word_b.as_ref().trim().to_string(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), StoreError> {
        let fields = [
            ("language A", &self.language_a),
            ("word A", &self.word_a),
            ("language B", &self.language_b),
            ("word B", &self.word_b),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(StoreError::Validation(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

/// A vocabulary pair together with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPair {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_id: Option<String>,
    pub language_a: String,
    pub word_a: String,
    pub language_b: String,
    pub word_b: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_date: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_reviewed: Option<DateTime<Utc>>,
    pub interval_days: u32,
    pub mastery_level: f64,
    pub correct_count: u32,
    #[serde(default = "default_ease")]
    pub ease: f64,
    pub created_at: DateTime<Utc>,
}

fn default_ease() -> f64 {
    DEFAULT_EASE
}

impl WordPair {
    /// Create a fresh word that is due immediately.
    pub fn new(pair: NewWordPair, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            backend_id: None,
            language_a: pair.language_a,
            word_a: pair.word_a,
            language_b: pair.language_b,
            word_b: pair.word_b,
            next_review_date: now,
            last_reviewed: None,
            interval_days: 1,
            mastery_level: 0.0,
            correct_count: 0,
            ease: DEFAULT_EASE,
            created_at: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }

    pub fn tier(&self) -> MasteryTier {
        MasteryTier::from_level(self.mastery_level)
    }

    /// Check the scheduling fields for values no review could have produced.
    pub fn validate(&self) -> std::result::Result<(), CoreError> {
        let reason = if self.interval_days == 0 {
            Some("interval must be at least one day".to_string())
        } else if !self.mastery_level.is_finite() || self.mastery_level < 0.0 {
            Some(format!("mastery level {} is invalid", self.mastery_level))
        } else if !self.ease.is_finite() || self.ease <= 0.0 {
            Some(format!("ease {} is invalid", self.ease))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::MalformedWord {
                id: self.id,
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Sort a collection by creation time, oldest first.
pub fn sort_by_created(words: &mut [WordPair]) {
    words.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}

/// A single prompt shown to the user. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSession {
    pub word: WordPair,
    pub direction: Direction,
    pub prompt_lang: String,
    pub prompt_word: String,
    pub correct_answer: String,
    pub user_answer: Option<String>,
    pub auto_feedback: Option<RecallJudgment>,
}

impl ReviewSession {
    pub fn new(word: WordPair, direction: Direction) -> Self {
        let (prompt_lang, prompt_word, correct_answer) = match direction {
            Direction::AToB => (
                word.language_a.clone(),
                word.word_a.clone(),
                word.word_b.clone(),
            ),
            Direction::BToA => (
                word.language_b.clone(),
                word.word_b.clone(),
                word.word_a.clone(),
            ),
        };

        Self {
            word,
            direction,
            prompt_lang,
            prompt_word,
            correct_answer,
            user_answer: None,
            auto_feedback: None,
        }
    }

    /// Language of the expected answer.
    pub fn answer_lang(&self) -> &str {
        match self.direction {
            Direction::AToB => &self.word.language_b,
            Direction::BToA => &self.word.language_a,
        }
    }

    /// Grade the user's answer and remember it alongside the judgment.
    pub fn record_answer(&mut self, input: &str, policy: &GradingPolicy) -> RecallJudgment {
        let judgment = policy.grade(input, &self.correct_answer);
        self.user_answer = Some(input.to_string());
        self.auto_feedback = Some(judgment);
        judgment
    }

    pub fn is_revealed(&self) -> bool {
        self.auto_feedback.is_some()
    }
}
