use rustc_hash::FxHashSet;

use crate::animation::AnimationUnit;
use crate::lexicon::{BoneLexicon, ClipRepository, builtin_clips, builtin_lexicon};
use crate::translate::simplify::{RuleSimplifier, TextSimplifier};

/// Longest phrase, in words, tried in phrase mode.
pub const MAX_PHRASE_WINDOW: usize = 4;

/// Result of a translation, with the tokens that had no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    pub units: Vec<AnimationUnit>,
    /// Letters (word mode) or words (phrase mode) that were skipped.
    pub unmatched: Vec<String>,
}

impl Translation {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

fn trim_token(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
}

/// Turns text into a playback request.
///
/// Word mode ([`translate_text`](Self::translate_text)) produces bone units
/// from the [`BoneLexicon`], spelling out unknown words letter by letter.
/// Phrase mode ([`translate_phrases`](Self::translate_phrases)) produces clip
/// units from the [`ClipRepository`]. Tokens without an entry are skipped.
pub struct Translator {
    lexicon: BoneLexicon,
    clips: ClipRepository,
    simplifier: Box<dyn TextSimplifier>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(builtin_lexicon(), builtin_clips())
    }
}

impl Translator {
    #[must_use]
    pub fn new(lexicon: BoneLexicon, clips: ClipRepository) -> Self {
        Self {
            lexicon,
            clips,
            simplifier: Box::new(RuleSimplifier::default()),
        }
    }

    #[must_use]
    pub fn with_simplifier(mut self, simplifier: impl TextSimplifier + 'static) -> Self {
        self.simplifier = Box::new(simplifier);
        self
    }

    #[must_use]
    pub fn lexicon(&self) -> &BoneLexicon {
        &self.lexicon
    }

    pub fn lexicon_mut(&mut self) -> &mut BoneLexicon {
        &mut self.lexicon
    }

    #[must_use]
    pub fn clips(&self) -> &ClipRepository {
        &self.clips
    }

    pub fn clips_mut(&mut self) -> &mut ClipRepository {
        &mut self.clips
    }

    // ========================================================================
    // Word mode
    // ========================================================================

    #[must_use]
    pub fn translate_text(&self, text: &str) -> Vec<AnimationUnit> {
        self.translate_text_detailed(text).units
    }

    /// Uppercases `text`, then for each whitespace-separated word uses the
    /// word entry if there is one, or else the entries of its letters.
    #[must_use]
    pub fn translate_text_detailed(&self, text: &str) -> Translation {
        let upper = text.to_uppercase();
        let mut translation = Translation::default();

        for word in upper.split_whitespace() {
            let core = trim_token(word);
            if let Some(sequences) = self.lexicon.lookup_word(core).filter(|s| !s.is_empty()) {
                translation
                    .units
                    .push(AnimationUnit::labelled_bones(core, sequences.to_vec()));
                continue;
            }

            for letter in word.chars() {
                match self.lexicon.lookup_letter(letter).filter(|s| !s.is_empty()) {
                    Some(sequences) => translation.units.push(AnimationUnit::labelled_bones(
                        letter.to_string(),
                        sequences.to_vec(),
                    )),
                    None => {
                        if letter.is_alphanumeric() {
                            translation.unmatched.push(letter.to_string());
                        }
                    }
                }
            }
        }

        if !translation.unmatched.is_empty() {
            log::debug!("No sign for: {}", translation.unmatched.join(" "));
        }
        translation
    }

    // ========================================================================
    // Phrase mode
    // ========================================================================

    #[must_use]
    pub fn translate_phrases(&self, text: &str) -> Vec<AnimationUnit> {
        self.translate_phrases_detailed(text).units
    }

    /// Simplifies `text`, then walks its words matching the longest known
    /// phrase first (up to [`MAX_PHRASE_WINDOW`] words) before single words.
    /// Each clip appears once, at its first occurrence.
    #[must_use]
    pub fn translate_phrases_detailed(&self, text: &str) -> Translation {
        let simplified = self.simplifier.simplify(text).to_lowercase();
        let tokens: Vec<&str> = simplified
            .split_whitespace()
            .map(trim_token)
            .filter(|token| !token.is_empty())
            .collect();

        let window = MAX_PHRASE_WINDOW.min(self.clips.longest_phrase()).max(1);
        let mut translation = Translation::default();
        let mut seen = FxHashSet::default();
        let mut start = 0;

        while start < tokens.len() {
            let longest = window.min(tokens.len() - start);
            let found = (1..=longest).rev().find_map(|len| {
                let phrase = tokens[start..start + len].join(" ");
                self.clips.lookup_clip(&phrase).map(|path| (len, path))
            });

            match found {
                Some((len, path)) => {
                    if seen.insert(path) {
                        translation.units.push(AnimationUnit::clip(path));
                    }
                    start += len;
                }
                None => {
                    translation.unmatched.push(tokens[start].to_string());
                    start += 1;
                }
            }
        }

        translation
    }
}
