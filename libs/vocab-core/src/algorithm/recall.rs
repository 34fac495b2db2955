//! Three-grade recall scheduler.
//!
//! A miss sends the word back to a one-day interval with no mastery. A
//! hesitant recall grows the interval gently, an instant one doubles it.
//!
//! Intervals stop at `maximum_interval_days`. There an instant recall holds
//! the cap and a hesitant one lands a day short of it, so instant always
//! schedules further out.

use super::SchedulingAlgorithm;
use crate::error::{CoreError, Result};
use crate::types::{RecallJudgment, WordPair};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Largest configurable interval cap, roughly 2700 years.
pub const MAX_INTERVAL_LIMIT_DAYS: u32 = 1_000_000;

/// Recall scheduler with configurable growth parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallScheduler {
    pub hesitant_multiplier: f64,
    pub instant_multiplier: f64,
    pub hesitant_mastery_step: f64,
    pub instant_mastery_step: f64,
    pub maximum_interval_days: u32,
}

impl Default for RecallScheduler {
    fn default() -> Self {
        Self {
            hesitant_multiplier: 1.3,
            instant_multiplier: 2.0,
            hesitant_mastery_step: 0.3,
            instant_mastery_step: 0.6,
            maximum_interval_days: 36500,
        }
    }
}

impl SchedulingAlgorithm for RecallScheduler {
    fn name(&self) -> &'static str {
        "recall"
    }

    fn schedule(&self, word: &WordPair, judgment: RecallJudgment, now: DateTime<Utc>) -> WordPair {
        debug_assert!(word.validate().is_ok(), "scheduling malformed word {}", word.id);

        let (interval_days, mastery_level, correct_count) = match judgment {
            RecallJudgment::Incorrect => (1, 0.0, 0),
            RecallJudgment::Hesitant => (
                self.hesitant_interval(word.interval_days),
                word.mastery_level + self.hesitant_mastery_step,
                word.correct_count.saturating_add(1),
            ),
            RecallJudgment::Instant => (
                self.instant_interval(word.interval_days),
                word.mastery_level + self.instant_mastery_step,
                word.correct_count.saturating_add(1),
            ),
        };

        WordPair {
            next_review_date: now
                .checked_add_signed(Duration::days(i64::from(interval_days)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            last_reviewed: Some(now),
            interval_days,
            mastery_level: mastery_level.max(0.0),
            correct_count,
            ..word.clone()
        }
    }
}

impl RecallScheduler {
    /// Reject parameters that would let a hesitant recall match or beat an
    /// instant one, or push review dates past what `chrono` can represent.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(CoreError::InvalidSettings(reason));

        if !self.hesitant_multiplier.is_finite() || self.hesitant_multiplier < 1.0 {
            return invalid(format!(
                "hesitant_multiplier must be at least 1, got {}",
                self.hesitant_multiplier
            ));
        }
        if !self.instant_multiplier.is_finite()
            || self.instant_multiplier < self.hesitant_multiplier
        {
            return invalid(format!(
                "instant_multiplier must be at least hesitant_multiplier ({}), got {}",
                self.hesitant_multiplier, self.instant_multiplier
            ));
        }
        if !self.hesitant_mastery_step.is_finite() || self.hesitant_mastery_step <= 0.0 {
            return invalid(format!(
                "hesitant_mastery_step must be positive, got {}",
                self.hesitant_mastery_step
            ));
        }
        if !self.instant_mastery_step.is_finite()
            || self.instant_mastery_step <= self.hesitant_mastery_step
        {
            return invalid(format!(
                "instant_mastery_step must exceed hesitant_mastery_step ({}), got {}",
                self.hesitant_mastery_step, self.instant_mastery_step
            ));
        }
        if !(2..=MAX_INTERVAL_LIMIT_DAYS).contains(&self.maximum_interval_days) {
            return invalid(format!(
                "maximum_interval_days must be between 2 and {MAX_INTERVAL_LIMIT_DAYS}, got {}",
                self.maximum_interval_days
            ));
        }
        Ok(())
    }

    fn hesitant_interval(&self, interval: u32) -> u32 {
        grow(interval, self.hesitant_multiplier, 1).min(self.hesitant_ceiling())
    }

    fn instant_interval(&self, interval: u32) -> u32 {
        grow(interval, self.instant_multiplier, 2)
            .max(self.hesitant_interval(interval) + 1)
            .min(self.maximum_interval_days.max(2))
    }

    fn hesitant_ceiling(&self) -> u32 {
        self.maximum_interval_days.saturating_sub(1).max(1)
    }
}

/// Scale the interval, always gaining at least `min_step` days.
fn grow(interval: u32, multiplier: f64, min_step: u32) -> u32 {
    let scaled = (f64::from(interval) * multiplier).round() as u32;
    scaled.max(interval.saturating_add(min_step))
}
