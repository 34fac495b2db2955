//! Word store collaborator.
//!
//! The engine never performs I/O itself. A store persists the records the
//! controller hands it and reports success or a [`StoreError`].

use crate::error::StoreError;
use crate::types::{sort_by_created, WordPair};

type Result<T> = std::result::Result<T, StoreError>;

/// Persistence for word pairs.
pub trait WordStore {
    /// Current snapshot of every stored word.
    fn load(&mut self) -> Result<Vec<WordPair>>;

    /// Persist a new word, returning the record as stored.
    fn create(&mut self, word: &WordPair) -> Result<WordPair>;

    /// Replace an existing word, returning the record as stored.
    fn update(&mut self, word: &WordPair) -> Result<WordPair>;

    fn delete(&mut self, word: &WordPair) -> Result<()>;
}

/// In-process store used when no persistent backend is configured.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    words: Vec<WordPair>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words(mut words: Vec<WordPair>) -> Self {
        sort_by_created(&mut words);
        Self { words }
    }

    pub fn words(&self) -> &[WordPair] {
        &self.words
    }
}

impl WordStore for MemoryStore {
    fn load(&mut self) -> Result<Vec<WordPair>> {
        Ok(self.words.clone())
    }

    fn create(&mut self, word: &WordPair) -> Result<WordPair> {
        if self.words.iter().any(|w| w.id == word.id) {
            return Err(StoreError::Validation(format!(
                "word {} already exists",
                word.id
            )));
        }
        let mut stored = word.clone();
        if stored.backend_id.is_none() {
            stored.backend_id = Some(word.id.to_string());
        }
        self.words.push(stored.clone());
        sort_by_created(&mut self.words);
        Ok(stored)
    }

    fn update(&mut self, word: &WordPair) -> Result<WordPair> {
        let slot = self
            .words
            .iter_mut()
            .find(|w| w.id == word.id)
            .ok_or(StoreError::NotFound(word.id))?;
        *slot = word.clone();
        Ok(word.clone())
    }

    fn delete(&mut self, word: &WordPair) -> Result<()> {
        let before = self.words.len();
        self.words.retain(|w| w.id != word.id);
        if self.words.len() == before {
            return Err(StoreError::NotFound(word.id));
        }
        Ok(())
    }
}
