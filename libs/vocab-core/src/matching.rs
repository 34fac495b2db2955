//! Answer grading for typed translations.
//!
//! Grading is purely textual so it works for any pair of languages: both
//! strings are normalized, then compared by character-level edit distance.

use crate::error::{CoreError, Result};
use crate::types::RecallJudgment;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Thresholds that decide when a near miss still counts as recalled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingPolicy {
    /// Allowed edits as a share of the correct answer's length.
    pub tolerance_ratio: f64,
    /// Lower bound on allowed edits once fuzzy matching applies.
    pub min_tolerance: usize,
    /// Answers shorter than this (in characters) must match exactly.
    pub min_fuzzy_len: usize,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            tolerance_ratio: 0.2,
            min_tolerance: 1,
            min_fuzzy_len: 3,
        }
    }
}

impl GradingPolicy {
    /// Number of edits tolerated for a correct answer of `len` characters.
    pub fn tolerance(&self, len: usize) -> usize {
        if len < self.min_fuzzy_len {
            return 0;
        }
        let scaled = (len as f64 * self.tolerance_ratio).floor() as usize;
        scaled.max(self.min_tolerance)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance_ratio.is_finite() || self.tolerance_ratio < 0.0 {
            return Err(CoreError::InvalidSettings(format!(
                "tolerance_ratio must be a non-negative number, got {}",
                self.tolerance_ratio
            )));
        }
        Ok(())
    }

    pub fn grade(&self, user_answer: &str, correct_answer: &str) -> RecallJudgment {
        self.compare(user_answer, correct_answer).judgment
    }

    /// Grade and keep the intermediate values for display.
    pub fn compare(&self, user_answer: &str, correct_answer: &str) -> AnswerComparison {
        let user_normalized = normalize_answer(user_answer);
        let correct_normalized = normalize_answer(correct_answer);
        let tolerance = self.tolerance(correct_normalized.chars().count());
        let distance = levenshtein_distance(&user_normalized, &correct_normalized);

        let judgment = if user_normalized == correct_normalized {
            RecallJudgment::Instant
        } else if user_normalized.is_empty() {
            RecallJudgment::Incorrect
        } else if distance <= tolerance {
            RecallJudgment::Hesitant
        } else {
            RecallJudgment::Incorrect
        };

        AnswerComparison {
            similarity: normalized_similarity(&user_normalized, &correct_normalized),
            user_normalized,
            correct_normalized,
            distance,
            tolerance,
            judgment,
        }
    }
}

/// Result of comparing a typed answer to the expected one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerComparison {
    pub user_normalized: String,
    pub correct_normalized: String,
    /// Edit distance between the normalized strings.
    pub distance: usize,
    pub tolerance: usize,
    /// Similarity score between 0.0 and 1.0.
    pub similarity: f64,
    pub judgment: RecallJudgment,
}

/// Grade an answer with the default policy.
pub fn check_answer(user_answer: &str, correct_answer: &str) -> RecallJudgment {
    GradingPolicy::default().grade(user_answer, correct_answer)
}

/// Compare an answer and return the details behind the judgment.
pub fn compare_answer(
    user_answer: &str,
    correct_answer: &str,
    policy: &GradingPolicy,
) -> AnswerComparison {
    policy.compare(user_answer, correct_answer)
}

/// Canonical form used for comparison: NFC, no surrounding punctuation,
/// lowercase, single spaces.
pub fn normalize_answer(s: &str) -> String {
    let composed: String = s.nfc().collect();
    let stripped = composed.trim_matches(|c: char| c.is_whitespace() || is_punctuation(c));
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '¿' | '¡'
                | '«'
                | '»'
                | '“'
                | '”'
                | '„'
                | '‘'
                | '’'
                | '‚'
                | '…'
                | '–'
                | '—'
                | '。'
                | '、'
                | '，'
                | '！'
                | '？'
                | '「'
                | '」'
                | '『'
                | '』'
        )
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows are enough
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Calculate normalized similarity (0.0 to 1.0) based on Levenshtein distance.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiffType {
    /// Text is the same in both strings.
    Same,
    /// Text was added (in correct but not typed).
    Added,
    /// Text was removed (in typed but not correct).
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffSegment {
    pub text: String,
    pub diff_type: DiffType,
}

impl DiffSegment {
    fn new(text: &str, diff_type: DiffType) -> Self {
        Self {
            text: text.to_string(),
            diff_type,
        }
    }
}

/// Word-level diff between typed and correct answers, for multi-word phrases.
pub fn word_diff(typed: &str, correct: &str) -> Vec<DiffSegment> {
    let typed_words: Vec<&str> = typed.split_whitespace().collect();
    let correct_words: Vec<&str> = correct.split_whitespace().collect();
    let same = |a: &str, b: &str| normalize_answer(a) == normalize_answer(b);

    let mut result = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < typed_words.len() && j < correct_words.len() {
        if same(typed_words[i], correct_words[j]) {
            result.push(DiffSegment::new(correct_words[j], DiffType::Same));
            i += 1;
            j += 1;
            continue;
        }

        // Words missing from the typed answer
        if let Some(k) = (j + 1..correct_words.len().min(j + 3))
            .find(|&k| same(typed_words[i], correct_words[k]))
        {
            for word in &correct_words[j..k] {
                result.push(DiffSegment::new(word, DiffType::Added));
            }
            j = k;
            continue;
        }

        // Extra words in the typed answer
        if let Some(k) = (i + 1..typed_words.len().min(i + 3))
            .find(|&k| same(typed_words[k], correct_words[j]))
        {
            for word in &typed_words[i..k] {
                result.push(DiffSegment::new(word, DiffType::Removed));
            }
            i = k;
            continue;
        }

        result.push(DiffSegment::new(typed_words[i], DiffType::Removed));
        result.push(DiffSegment::new(correct_words[j], DiffType::Added));
        i += 1;
        j += 1;
    }

    for word in &typed_words[i..] {
        result.push(DiffSegment::new(word, DiffType::Removed));
    }
    for word in &correct_words[j..] {
        result.push(DiffSegment::new(word, DiffType::Added));
    }

    result
}
