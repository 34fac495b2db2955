//! JSON file word store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use vocab_core::types::sort_by_created;
use vocab_core::{StoreError, WordPair, WordStore};

type Result<T> = std::result::Result<T, StoreError>;

/// Keeps the whole collection in one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, err: impl std::fmt::Display) -> StoreError {
        StoreError::Storage(format!("{}: {err}", self.path.display()))
    }

    fn read_all(&self) -> Result<Vec<WordPair>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.storage_error(err)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut words: Vec<WordPair> =
            serde_json::from_str(&content).map_err(|e| self.storage_error(e))?;
        sort_by_created(&mut words);
        Ok(words)
    }

    /// Write to a sibling file first so a crash never leaves half a file.
    fn write_all(&self, words: &[WordPair]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
        }

        let json = serde_json::to_string_pretty(words).map_err(|e| self.storage_error(e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.storage_error(e))?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.storage_error(err));
        }

        tracing::debug!(path = %self.path.display(), count = words.len(), "wrote words");
        Ok(())
    }
}

impl WordStore for JsonFileStore {
    fn load(&mut self) -> Result<Vec<WordPair>> {
        self.read_all()
    }

    fn create(&mut self, word: &WordPair) -> Result<WordPair> {
        let mut words = self.read_all()?;
        if words.iter().any(|w| w.id == word.id) {
            return Err(StoreError::Validation(format!(
                "word {} already exists",
                word.id
            )));
        }

        let mut stored = word.clone();
        stored.backend_id.get_or_insert_with(|| word.id.to_string());
        words.push(stored.clone());
        sort_by_created(&mut words);
        self.write_all(&words)?;
        Ok(stored)
    }

    fn update(&mut self, word: &WordPair) -> Result<WordPair> {
        let mut words = self.read_all()?;
        let slot = words
            .iter_mut()
            .find(|w| w.id == word.id)
            .ok_or(StoreError::NotFound(word.id))?;
        *slot = word.clone();
        self.write_all(&words)?;
        Ok(word.clone())
    }

    fn delete(&mut self, word: &WordPair) -> Result<()> {
        let mut words = self.read_all()?;
        let before = words.len();
        words.retain(|w| w.id != word.id);
        if words.len() == before {
            return Err(StoreError::NotFound(word.id));
        }
        self.write_all(&words)
    }
}
