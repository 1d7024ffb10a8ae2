// Headline tokenizer.
//
// Mirrors the default analyzer of a scikit-learn CountVectorizer: lowercase,
// take runs of two or more word characters as tokens, then drop stop words.
// regex-lite's \w is ASCII-only, so accented letters split tokens.

use std::collections::HashSet;

use anyhow::{Context, Result};
use regex_lite::Regex;

use super::stopwords::StopWordList;

/// Token boundary pattern: two or more word characters.
pub const TOKEN_PATTERN: &str = r"\b\w\w+\b";

pub struct Tokenizer {
    pattern: Regex,
    stop_words: HashSet<String>,
}

impl Tokenizer {
    pub fn new(stop_words: StopWordList) -> Result<Self> {
        let pattern = Regex::new(TOKEN_PATTERN).context("Invalid token pattern")?;
        Ok(Self {
            pattern,
            stop_words: stop_words.words(),
        })
    }

    /// Split a headline into lowercase, stop-word-free tokens in order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.pattern
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|tok| !self.stop_words.contains(*tok))
            .map(str::to_string)
            .collect()
    }
}
