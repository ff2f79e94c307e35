// English word list used to drop scraped gibberish (CSS class soup, IDs,
// minified identifiers) before counting.
//
// A list is compiled into the binary; a local file can replace it at
// startup. Either way it is loaded once and never refetched.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Bundled English words, one per line.
const ENGLISH_WORDS: &str = include_str!("english_words.txt");

/// A set of known lowercase words.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashSet<String>,
}

impl Lexicon {
    /// Load a word list with one word per line. Blank lines and lines
    /// starting with `#` are ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;
        let lexicon = Self::parse(&raw);

        if lexicon.is_empty() {
            anyhow::bail!("Word list {} contains no words", path.display());
        }

        info!(
            words = lexicon.len(),
            path = %path.display(),
            "Loaded word list"
        );
        Ok(lexicon)
    }

    /// The bundled English list.
    pub fn english() -> Self {
        Self::parse(ENGLISH_WORDS)
    }

    fn parse(raw: &str) -> Self {
        Self::from_words(
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Case-insensitive membership.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_case_insensitive() {
        let lex = Lexicon::from_words(["Widget", "garden"]);
        assert!(lex.contains("widget"));
        assert!(lex.contains("WIDGET"));
        assert!(lex.contains("Garden"));
        assert!(!lex.contains("qzx"));
        assert_eq!(lex.len(), 2);
    }

    #[test]
    fn test_bundled_list_knows_everyday_words() {
        let lex = Lexicon::english();
        assert!(lex.len() > 50_000);
        for word in ["garden", "furniture", "mattress", "umbrellas", "watering", "shipping"] {
            assert!(lex.contains(word), "{word} missing");
        }
        for junk in ["xqzvbtrk", "jsbundle", "cssgridcol", "wpcontent"] {
            assert!(!lex.contains(junk), "{junk} should not be a word");
        }
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = Lexicon::load(Path::new("/nonexistent/seolens-words.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read word list"));
    }

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let path = std::env::temp_dir().join(format!("seolens-lexicon-{}.txt", std::process::id()));
        std::fs::write(&path, "# header\nwidget\n\n  gadget  \n").unwrap();
        let lex = Lexicon::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(lex.len(), 2);
        assert!(lex.contains("gadget"));
    }
}
