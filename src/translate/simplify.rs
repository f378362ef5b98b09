/// Rewrites input text into the simpler form the phrase repository is keyed
/// by. Pluggable so a real language model can stand in for the rules.
pub trait TextSimplifier {
    fn simplify(&self, text: &str) -> String;
}

impl<F> TextSimplifier for F
where
    F: Fn(&str) -> String,
{
    fn simplify(&self, text: &str) -> String {
        self(text)
    }
}

const CONTRACTIONS: &[(&str, &str)] = &[
    ("i'm", "i am"),
    ("you're", "you are"),
    ("they're", "they are"),
    ("we're", "we are"),
    ("he's", "he is"),
    ("she's", "she is"),
    ("it's", "it is"),
    ("that's", "that is"),
    ("what's", "what is"),
    ("how's", "how is"),
    ("who's", "who is"),
    ("where's", "where is"),
    ("when's", "when is"),
    ("why's", "why is"),
];

/// Expands common English contractions, token by token.
///
/// Matching ignores case and accepts typographic apostrophes; punctuation
/// around a token is kept. Whitespace runs collapse to one space.
#[derive(Debug, Clone)]
pub struct RuleSimplifier {
    rules: Vec<(String, String)>,
}

impl Default for RuleSimplifier {
    fn default() -> Self {
        Self {
            rules: CONTRACTIONS
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect(),
        }
    }
}

impl RuleSimplifier {
    /// A simplifier with no rules; it only normalises whitespace.
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn with_rule(mut self, from: &str, to: &str) -> Self {
        self.rules.push((from.to_lowercase(), to.to_string()));
        self
    }

    fn expand(&self, token: &str) -> Option<&str> {
        let key = token.to_lowercase().replace('\u{2019}', "'");
        self.rules
            .iter()
            .find(|(from, _)| *from == key)
            .map(|(_, to)| to.as_str())
    }
}

impl TextSimplifier for RuleSimplifier {
    fn simplify(&self, text: &str) -> String {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|word| {
                let core = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '\u{2019}');
                match self.expand(core) {
                    Some(expanded) if !core.is_empty() => word.replacen(core, expanded, 1),
                    _ => word.to_string(),
                }
            })
            .collect();
        words.join(" ")
    }
}
