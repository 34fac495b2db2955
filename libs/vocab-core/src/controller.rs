//! Review controller.
//!
//! Owns the word collection and drives one review at a time through
//! filter, selection, grading and scheduling, handing every new state to
//! the word store. A computed state is only kept once the store accepts it.

use crate::algorithm::SchedulingAlgorithm;
use crate::due::due_words;
use crate::error::{CoreError, Result};
use crate::selector::{select_review, RandomSource};
use crate::settings::Settings;
use crate::stats::{summarize, StudySummary};
use crate::store::WordStore;
use crate::types::{sort_by_created, NewWordPair, RecallJudgment, ReviewSession, WordPair};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct ReviewController<S, R> {
    store: S,
    rng: R,
    settings: Settings,
    /// Sorted by `created_at`, oldest first.
    words: Vec<WordPair>,
    current: Option<ReviewSession>,
}

impl<S: WordStore, R: RandomSource> ReviewController<S, R> {
    pub fn new(store: S, rng: R, settings: Settings) -> Self {
        Self {
            store,
            rng,
            settings,
            words: Vec::new(),
            current: None,
        }
    }

    /// Replace the collection with the store's snapshot.
    pub fn load(&mut self) -> Result<usize> {
        let mut words = self.store.load()?;
        sort_by_created(&mut words);
        self.words = words;

        if let Some(session) = &self.current {
            if !self.words.iter().any(|w| w.id == session.word.id) {
                self.current = None;
            }
        }

        debug!(count = self.words.len(), "loaded words");
        Ok(self.words.len())
    }

    pub fn words(&self) -> &[WordPair] {
        &self.words
    }

    pub fn word(&self, id: Uuid) -> Option<&WordPair> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_review(&self) -> Option<&ReviewSession> {
        self.current.as_ref()
    }

    pub fn due_words(&self, now: DateTime<Utc>) -> Vec<WordPair> {
        due_words(&self.words, now)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> StudySummary {
        summarize(&self.words, now)
    }

    pub fn add_word(&mut self, pair: NewWordPair, now: DateTime<Utc>) -> Result<&WordPair> {
        if self.words.len() >= self.settings.max_words {
            return Err(CoreError::WordLimit {
                limit: self.settings.max_words,
            });
        }
        pair.validate()?;

        let stored = self.store.create(&WordPair::new(pair, now))?;
        info!(id = %stored.id, word_a = %stored.word_a, word_b = %stored.word_b, "added word");

        let index = self
            .words
            .partition_point(|w| w.created_at <= stored.created_at);
        self.words.insert(index, stored);
        Ok(&self.words[index])
    }

    pub fn delete_word(&mut self, id: Uuid) -> Result<WordPair> {
        let index = self.position(id)?;
        self.store.delete(&self.words[index])?;

        let removed = self.words.remove(index);
        if self.current.as_ref().is_some_and(|s| s.word.id == id) {
            self.current = None;
        }
        info!(id = %id, "deleted word");
        Ok(removed)
    }

    /// Start a review, or resume the one in progress.
    ///
    /// `Ok(None)` means nothing is due right now.
    pub fn begin_review(&mut self, now: DateTime<Utc>) -> Result<Option<&ReviewSession>> {
        if self.current.is_none() {
            let due = due_words(&self.words, now);
            if due.is_empty() {
                debug!("no reviews due");
                return Ok(None);
            }

            let session = select_review(&due, &mut self.rng)?;
            debug!(
                id = %session.word.id,
                direction = ?session.direction,
                due = due.len(),
                "selected review"
            );
            self.current = Some(session);
        }
        Ok(self.current.as_ref())
    }

    /// Grade the user's answer for the current review.
    pub fn reveal_answer(&mut self, input: &str) -> Result<RecallJudgment> {
        let policy = self.settings.grading;
        let session = self.current.as_mut().ok_or(CoreError::NoActiveReview)?;
        let judgment = session.record_answer(input, &policy);
        debug!(id = %session.word.id, %judgment, "graded answer");
        Ok(judgment)
    }

    /// Apply the user's final judgment, which may differ from the automatic one.
    ///
    /// If the store rejects the new state it is discarded and the review
    /// stays open so the user can retry.
    pub fn submit_feedback(
        &mut self,
        judgment: RecallJudgment,
        now: DateTime<Utc>,
    ) -> Result<&WordPair> {
        let id = self
            .current
            .as_ref()
            .map(|s| s.word.id)
            .ok_or(CoreError::NoActiveReview)?;
        let index = self.position(id)?;

        let word = &self.words[index];
        word.validate()?;
        let next = self.settings.scheduler.schedule(word, judgment, now);

        let stored = match self.store.update(&next) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(id = %id, error = %err, "failed to save review");
                return Err(err.into());
            }
        };

        info!(
            id = %id,
            %judgment,
            interval_days = stored.interval_days,
            mastery_level = stored.mastery_level,
            "saved review"
        );
        self.words[index] = stored;
        self.current = None;
        Ok(&self.words[index])
    }

    /// Drop the current review without touching the word.
    pub fn abandon_review(&mut self) -> Option<ReviewSession> {
        self.current.take()
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.words
            .iter()
            .position(|w| w.id == id)
            .ok_or(CoreError::UnknownWord(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::selector::testing::ScriptedSource;
    use crate::selector::RngSource;
    use crate::store::MemoryStore;
    use crate::types::fixtures::{at, word};
    use crate::types::Direction;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    /// Store that can be told to fail on update.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_updates: bool,
    }

    impl WordStore for FlakyStore {
        fn load(&mut self) -> std::result::Result<Vec<WordPair>, StoreError> {
            self.inner.load()
        }

        fn create(&mut self, word: &WordPair) -> std::result::Result<WordPair, StoreError> {
            self.inner.create(word)
        }

        fn update(&mut self, word: &WordPair) -> std::result::Result<WordPair, StoreError> {
            if self.fail_updates {
                return Err(StoreError::Network("offline".to_string()));
            }
            self.inner.update(word)
        }

        fn delete(&mut self, word: &WordPair) -> std::result::Result<(), StoreError> {
            self.inner.delete(word)
        }
    }

    fn pair(a: &str, b: &str) -> NewWordPair {
        NewWordPair::new("English", a, "Spanish", b)
    }

    fn controller_with(
        words: Vec<WordPair>,
        rng: ScriptedSource,
    ) -> ReviewController<MemoryStore, ScriptedSource> {
        let mut controller =
            ReviewController::new(MemoryStore::with_words(words), rng, Settings::default());
        controller.load().unwrap();
        controller
    }

    #[test]
    fn load_sorts_by_creation() {
        let words = vec![word("b", "b", at(2)), word("a", "a", at(1))];
        let controller = controller_with(words, ScriptedSource::default());
        let order: Vec<_> = controller.words().iter().map(|w| w.word_a.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn add_word_keeps_order_and_persists() {
        let mut controller =
            controller_with(vec![word("old", "viejo", at(1))], ScriptedSource::default());
        let added = controller.add_word(pair("house", "casa"), at(5)).unwrap().clone();

        assert_eq!(controller.words().last().map(|w| w.id), Some(added.id));
        assert!(added.backend_id.is_some());
        assert_eq!(controller.store().words().len(), 2);
        assert!(added.is_due(at(5)));
    }

    #[test]
    fn add_word_rejects_blank_input() {
        let mut controller = controller_with(vec![], ScriptedSource::default());
        let result = controller.add_word(pair("", "casa"), at(1));
        assert!(matches!(
            result,
            Err(CoreError::Store(StoreError::Validation(_)))
        ));
        assert!(controller.words().is_empty());
    }

    #[test]
    fn add_word_enforces_limit() {
        let mut controller = ReviewController::new(
            MemoryStore::new(),
            ScriptedSource::default(),
            Settings {
                max_words: 2,
                ..Default::default()
            },
        );
        controller.add_word(pair("a", "a"), at(1)).unwrap();
        controller.add_word(pair("b", "b"), at(2)).unwrap();
        assert!(matches!(
            controller.add_word(pair("c", "c"), at(3)),
            Err(CoreError::WordLimit { limit: 2 })
        ));
    }

    #[test]
    fn no_reviews_due_is_not_an_error() {
        let mut w = word("house", "casa", at(1));
        w.next_review_date = at(20);
        let mut controller = controller_with(vec![w], ScriptedSource::default());
        assert!(controller.begin_review(at(10)).unwrap().is_none());
        assert!(controller.current_review().is_none());
    }

    #[test]
    fn full_review_cycle_with_override() {
        let words = vec![word("house", "casa", at(1)), word("dog", "perro", at(2))];
        let mut controller = controller_with(words, ScriptedSource::new(&[0], &[true]));
        let now = at(3);

        let session = controller.begin_review(now).unwrap().unwrap();
        assert_eq!(session.prompt_word, "house");
        assert_eq!(session.direction, Direction::AToB);

        assert_eq!(controller.reveal_answer("casas").unwrap(), RecallJudgment::Hesitant);

        // The user knew it and overrides the grader
        let updated = controller
            .submit_feedback(RecallJudgment::Instant, now)
            .unwrap()
            .clone();
        assert_eq!(updated.interval_days, 3);
        assert_eq!(updated.next_review_date, now + Duration::days(3));
        assert_eq!(updated.last_reviewed, Some(now));
        assert!(controller.current_review().is_none());
        assert_eq!(controller.store().words()[0], updated);
    }

    #[test]
    fn begin_review_resumes_open_session() {
        let words = vec![word("house", "casa", at(1)), word("dog", "perro", at(2))];
        let mut controller = controller_with(words, ScriptedSource::new(&[1], &[false]));

        let first = controller.begin_review(at(3)).unwrap().unwrap().word.id;
        // A second call must not consume more random choices
        let again = controller.begin_review(at(3)).unwrap().unwrap().word.id;
        assert_eq!(first, again);
    }

    #[test]
    fn failed_save_keeps_previous_state_and_session() {
        let original = word("house", "casa", at(1));
        let mut store = FlakyStore::default();
        store.inner.create(&original).unwrap();
        store.fail_updates = true;

        let mut controller =
            ReviewController::new(store, ScriptedSource::new(&[0], &[false]), Settings::default());
        controller.load().unwrap();
        controller.begin_review(at(2)).unwrap();
        controller.reveal_answer("house").unwrap();

        let result = controller.submit_feedback(RecallJudgment::Instant, at(2));
        assert!(matches!(
            result,
            Err(CoreError::Store(StoreError::Network(_)))
        ));
        assert_eq!(controller.words()[0].interval_days, 1);
        assert_eq!(controller.words()[0].last_reviewed, None);
        assert!(controller.current_review().is_some());
    }

    #[test]
    fn feedback_without_session_fails() {
        let mut controller = controller_with(vec![], ScriptedSource::default());
        assert!(matches!(
            controller.submit_feedback(RecallJudgment::Instant, at(1)),
            Err(CoreError::NoActiveReview)
        ));
        assert!(matches!(
            controller.reveal_answer("x"),
            Err(CoreError::NoActiveReview)
        ));
    }

    #[test]
    fn malformed_word_is_rejected() {
        let mut broken = word("house", "casa", at(1));
        broken.mastery_level = f64::NAN;
        let mut controller = controller_with(vec![broken], ScriptedSource::new(&[0], &[true]));

        controller.begin_review(at(2)).unwrap();
        assert!(matches!(
            controller.submit_feedback(RecallJudgment::Hesitant, at(2)),
            Err(CoreError::MalformedWord { .. })
        ));
    }

    #[test]
    fn deleting_reviewed_word_ends_session() {
        let w = word("house", "casa", at(1));
        let id = w.id;
        let mut controller = controller_with(vec![w], ScriptedSource::new(&[0], &[true]));

        controller.begin_review(at(2)).unwrap();
        let removed = controller.delete_word(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(controller.current_review().is_none());
        assert!(controller.words().is_empty());
        assert!(matches!(
            controller.delete_word(id),
            Err(CoreError::UnknownWord(_))
        ));
    }

    #[test]
    fn abandon_leaves_word_untouched() {
        let w = word("house", "casa", at(1));
        let mut controller = controller_with(vec![w.clone()], ScriptedSource::new(&[0], &[true]));
        controller.begin_review(at(2)).unwrap();
        assert!(controller.abandon_review().is_some());
        assert_eq!(controller.words()[0].interval_days, w.interval_days);
        assert_eq!(controller.words()[0].next_review_date, w.next_review_date);
    }

    #[test]
    fn seeded_rng_drains_due_set() {
        let words = (1..=5).map(|d| word(&d.to_string(), "x", at(d))).collect();
        let mut controller = ReviewController::new(
            MemoryStore::with_words(words),
            RngSource::seeded(11),
            Settings::default(),
        );
        controller.load().unwrap();
        let now = at(10);

        let mut reviewed = 0;
        while controller.begin_review(now).unwrap().is_some() {
            controller.submit_feedback(RecallJudgment::Hesitant, now).unwrap();
            reviewed += 1;
        }
        assert_eq!(reviewed, 5);
        assert_eq!(controller.stats(now).due, 0);
    }
}
