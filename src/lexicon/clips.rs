use rustc_hash::FxHashMap;

use crate::errors::{Error, Result};

/// Phrase → pre-baked clip asset path.
///
/// Phrases are normalised to lowercase words joined by single spaces, so
/// `"Thank  You"` and `"thank you"` name the same entry.
#[derive(Debug, Clone, Default)]
pub struct ClipRepository {
    phrases: FxHashMap<String, String>,
    longest_phrase: usize,
}

impl ClipRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a flat JSON object `{ "thank you": "/glb/thank_you.glb", ... }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: FxHashMap<String, String> = serde_json::from_str(json)?;
        let mut repo = Self::new();
        for (phrase, path) in entries {
            if normalize_phrase(&phrase).is_empty() {
                return Err(Error::Lexicon(format!("empty phrase key for {path:?}")));
            }
            repo.insert(&phrase, path);
        }
        Ok(repo)
    }

    pub fn insert(&mut self, phrase: &str, path: impl Into<String>) {
        let key = normalize_phrase(phrase);
        if key.is_empty() {
            return;
        }
        self.longest_phrase = self.longest_phrase.max(key.split(' ').count());
        self.phrases.insert(key, path.into());
    }

    #[must_use]
    pub fn lookup_clip(&self, phrase: &str) -> Option<&str> {
        self.phrases.get(&normalize_phrase(phrase)).map(String::as_str)
    }

    /// Word count of the longest registered phrase.
    #[must_use]
    pub fn longest_phrase(&self) -> usize {
        self.longest_phrase
    }

    /// Registered phrases, sorted.
    #[must_use]
    pub fn phrases(&self) -> Vec<&str> {
        let mut phrases: Vec<&str> = self.phrases.keys().map(String::as_str).collect();
        phrases.sort_unstable();
        phrases
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

#[must_use]
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
