//! Engine settings.

use crate::algorithm::RecallScheduler;
use crate::error::Result;
use crate::matching::GradingPolicy;
use serde::{Deserialize, Serialize};

/// Most words a single collection may hold.
pub const DEFAULT_MAX_WORDS: usize = 999;

/// Settings shared by the controller and presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_words: usize,
    pub grading: GradingPolicy,
    pub scheduler: RecallScheduler,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            grading: GradingPolicy::default(),
            scheduler: RecallScheduler::default(),
        }
    }
}

impl Settings {
    /// Check values loaded from user configuration.
    pub fn validate(&self) -> Result<()> {
        self.grading.validate()?;
        self.scheduler.validate()
    }
}
