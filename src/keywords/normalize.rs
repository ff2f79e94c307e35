// Text normalization: visible page text → flat stream of keyword tokens.
//
// Steps, in order:
//   1. Split glued words at lower→upper case transitions ("BuyNow" → "Buy Now")
//   2. Split on whitespace, trim surrounding punctuation, keep alphanumeric-only tokens
//   3. With a word list, keep tokens that are known words or Title-case
//   4. Lowercase, drop short tokens and English stop words
//
// The output is deterministic for a given stop word set, word list and input.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

use super::lexicon::Lexicon;

static CASE_TRANSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("CASE_TRANSITION should compile"));

/// Turns raw text into keyword tokens.
pub struct TextNormalizer {
    min_word_length: usize,
    stop_words: HashSet<String>,
    lexicon: Option<Lexicon>,
}

impl TextNormalizer {
    /// Normalizer with the stock English stop word list.
    pub fn new(min_word_length: usize, lexicon: Option<Lexicon>) -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self::with_stop_words(min_word_length, stop_words, lexicon)
    }

    /// Stock stop words plus the bundled English word list.
    pub fn english(min_word_length: usize) -> Self {
        Self::new(min_word_length, Some(Lexicon::english()))
    }

    /// Normalizer with an explicit stop word list.
    pub fn with_stop_words<I, S>(
        min_word_length: usize,
        stop_words: I,
        lexicon: Option<Lexicon>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_word_length,
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            lexicon,
        }
    }

    pub fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Produce the token stream for `text`. Empty input gives an empty stream.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let separated = CASE_TRANSITION.replace_all(text, "$1 $2");

        separated
            .split_whitespace()
            .filter_map(word_token)
            .filter(|token| self.passes_lexicon(token))
            .map(str::to_lowercase)
            .filter(|token| {
                token.chars().count() >= self.min_word_length && !self.stop_words.contains(token)
            })
            .collect()
    }

    fn passes_lexicon(&self, token: &str) -> bool {
        match &self.lexicon {
            Some(lexicon) => lexicon.contains(token) || is_title_case(token),
            None => true,
        }
    }
}

/// Trim surrounding punctuation; keep the token only if what's left is
/// entirely alphanumeric. Inner punctuation ("e-mail", "don't") disqualifies it.
fn word_token(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() || !trimmed.chars().all(char::is_alphanumeric) {
        return None;
    }
    Some(trimmed)
}

/// First character uppercase, every later cased character lowercase.
fn is_title_case(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| !c.is_uppercase()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::with_stop_words(3, ["the", "and", "for", "with"], None)
    }

    #[test]
    fn test_basic_normalization() {
        let tokens = normalizer().normalize("Buy Widgets Widgets Widgets");
        assert_eq!(tokens, vec!["buy", "widgets", "widgets", "widgets"]);
    }

    #[test]
    fn test_splits_case_transitions() {
        let tokens = normalizer().normalize("GardenTools and PatioFurniture");
        assert_eq!(tokens, vec!["garden", "tools", "patio", "furniture"]);
    }

    #[test]
    fn test_trims_punctuation_and_drops_inner_punctuation() {
        let tokens = normalizer().normalize("Widgets, gadgets! (gizmos) e-mail don't");
        assert_eq!(tokens, vec!["widgets", "gadgets", "gizmos"]);
    }

    #[test]
    fn test_drops_short_tokens_and_stop_words() {
        let tokens = normalizer().normalize("The ox and an elk for the win");
        assert_eq!(tokens, vec!["elk", "win"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalizer().normalize("").is_empty());
        assert!(normalizer().normalize("   \n\t ").is_empty());
    }

    #[test]
    fn test_lexicon_keeps_known_and_title_case() {
        let lexicon = Lexicon::from_words(["widget", "garden"]);
        let n = TextNormalizer::with_stop_words(3, ["the"], Some(lexicon));
        let tokens = n.normalize("widget xqzvb Acme GARDEN jsbundle");
        assert_eq!(tokens, vec!["widget", "acme", "garden"]);
    }

    #[test]
    fn test_title_case() {
        assert!(is_title_case("Widgets"));
        assert!(is_title_case("A1"));
        assert!(!is_title_case("widgets"));
        assert!(!is_title_case("HTML"));
        assert!(!is_title_case("iPhone"));
    }

    #[test]
    fn test_stock_stop_words_loaded() {
        let n = TextNormalizer::new(3, None);
        assert!(n.is_stop_word("the"));
        assert!(n.is_stop_word("and"));
        let tokens = n.normalize("the widgets and the gadgets");
        assert_eq!(tokens, vec!["widgets", "gadgets"]);
    }
}
