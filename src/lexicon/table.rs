use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::lexicon::bone::{Axis, BoneSequence, BoneTarget, Channel, Direction, RawBoneTarget};

/// Token → bone-sequence lookup for letters (A–Z) and whole words.
///
/// Keys are stored uppercase; lookups uppercase their input. Absence is
/// always `None`, never an error.
#[derive(Debug, Clone, Default)]
pub struct BoneLexicon {
    letters: FxHashMap<char, Vec<BoneSequence>>,
    words: FxHashMap<String, Vec<BoneSequence>>,
}

/// On-disk shape of a lexicon file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    letters: FxHashMap<String, Vec<BoneSequence>>,
    #[serde(default)]
    words: FxHashMap<String, Vec<BoneSequence>>,
}

impl BoneLexicon {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `{ "letters": { "A": [[target, ...], ...] }, "words": { ... } }`.
    ///
    /// Targets may use either the raw tuple or the typed object form.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: LexiconFile = serde_json::from_str(json)?;
        let mut lexicon = Self::new();

        for (key, sequences) in file.letters {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => lexicon.insert_letter(letter, sequences),
                _ => {
                    return Err(Error::Lexicon(format!(
                        "letter key {key:?} must be exactly one character"
                    )));
                }
            }
        }
        for (word, sequences) in file.words {
            if word.trim().is_empty() || word.chars().any(char::is_whitespace) {
                return Err(Error::Lexicon(format!(
                    "word key {word:?} must be a single non-empty token"
                )));
            }
            lexicon.insert_word(&word, sequences);
        }

        Ok(lexicon)
    }

    pub fn to_json_string(&self) -> Result<String> {
        let file = LexiconFile {
            letters: self
                .letters
                .iter()
                .map(|(c, s)| (c.to_string(), s.clone()))
                .collect(),
            words: self.words.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn insert_letter(&mut self, letter: char, sequences: Vec<BoneSequence>) {
        for upper in letter.to_uppercase() {
            self.letters.insert(upper, sequences.clone());
        }
    }

    pub fn insert_word(&mut self, word: &str, sequences: Vec<BoneSequence>) {
        self.words.insert(word.to_uppercase(), sequences);
    }

    /// Registers a letter from a recording function and stores the result as data.
    pub fn record_letter(&mut self, letter: char, record: impl FnOnce(&mut SequenceRecorder)) {
        let mut recorder = SequenceRecorder::new();
        record(&mut recorder);
        self.insert_letter(letter, recorder.finish());
    }

    /// Registers a word from a recording function and stores the result as data.
    pub fn record_word(&mut self, word: &str, record: impl FnOnce(&mut SequenceRecorder)) {
        let mut recorder = SequenceRecorder::new();
        record(&mut recorder);
        self.insert_word(word, recorder.finish());
    }

    #[must_use]
    pub fn lookup_word(&self, word: &str) -> Option<&[BoneSequence]> {
        self.words.get(&word.to_uppercase()).map(Vec::as_slice)
    }

    #[must_use]
    pub fn lookup_letter(&self, letter: char) -> Option<&[BoneSequence]> {
        let mut upper = letter.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(c), None) => self.letters.get(&c).map(Vec::as_slice),
            _ => None,
        }
    }

    /// Word entry first, then (for single-character tokens) the letter entry.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&[BoneSequence]> {
        if let Some(found) = self.lookup_word(token) {
            return Some(found);
        }
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.lookup_letter(c),
            _ => None,
        }
    }

    /// Word keys, sorted.
    #[must_use]
    pub fn available_words(&self) -> Vec<String> {
        let mut words: Vec<String> = self.words.keys().cloned().collect();
        words.sort();
        words
    }

    /// Letters A–Z that have an entry, in alphabetical order.
    #[must_use]
    pub fn available_letters(&self) -> Vec<char> {
        ('A'..='Z').filter(|c| self.letters.contains_key(c)).collect()
    }

    /// Adds every entry of `other`, replacing existing keys.
    pub fn merge(&mut self, other: BoneLexicon) {
        self.letters.extend(other.letters);
        self.words.extend(other.words);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.len() + self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty() && self.words.is_empty()
    }
}

/// Collects bone targets the way legacy lexicon entries pushed them onto a
/// shared animation queue, then hands them back as plain sequences.
#[derive(Debug, Default)]
pub struct SequenceRecorder {
    sequences: Vec<BoneSequence>,
    current: BoneSequence,
}

impl SequenceRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&mut self, target: BoneTarget) -> &mut Self {
        self.current.push(target);
        self
    }

    pub fn raw(&mut self, raw: RawBoneTarget) -> &mut Self {
        self.target(raw.into())
    }

    pub fn rotate(&mut self, bone: &str, axis: Axis, limit: f32, direction: Direction) -> &mut Self {
        self.target(BoneTarget::new(bone, Channel::Rotation, axis, limit, direction))
    }

    pub fn translate(
        &mut self,
        bone: &str,
        axis: Axis,
        limit: f32,
        direction: Direction,
    ) -> &mut Self {
        self.target(BoneTarget::new(bone, Channel::Position, axis, limit, direction))
    }

    /// Closes the current batch as one sequence. Empty batches are dropped.
    pub fn push_sequence(&mut self) -> &mut Self {
        let sequence = std::mem::take(&mut self.current);
        if !sequence.is_empty() {
            self.sequences.push(sequence);
        }
        self
    }

    #[must_use]
    pub fn finish(mut self) -> Vec<BoneSequence> {
        self.push_sequence();
        self.sequences
    }
}
