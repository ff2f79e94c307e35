// Keyword frequency table with deterministic top-N ranking.
//
// Ranking is by count descending; equal counts keep the order in which the
// tokens first appeared in the stream.

use std::collections::HashMap;

use serde::Serialize;

/// A keyword and how many times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Token → count, remembering first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    /// Distinct tokens in first-occurrence order, with their counts
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    total: usize,
}

impl FrequencyTable {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut table = Self::default();
        for token in tokens {
            table.add(token.as_ref());
        }
        table
    }

    pub fn add(&mut self, token: &str) {
        self.total += 1;
        match self.index.get(token) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), 1));
            }
        }
    }

    pub fn count(&self, token: &str) -> usize {
        self.index.get(token).map_or(0, |&i| self.entries[i].1)
    }

    /// Number of distinct tokens.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Number of tokens counted, including repeats.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most common keywords. Never returns more than `n` entries.
    pub fn top_n(&self, n: usize) -> Vec<KeywordCount> {
        // Entries are already in first-occurrence order, and sort_by is
        // stable, so ties keep that order.
        let mut ranked: Vec<&(String, usize)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked
            .into_iter()
            .take(n)
            .map(|(keyword, count)| KeywordCount {
                keyword: keyword.clone(),
                count: *count,
            })
            .collect()
    }

    /// Just the keywords of `top_n`.
    pub fn top_keywords(&self, n: usize) -> Vec<String> {
        self.top_n(n).into_iter().map(|k| k.keyword).collect()
    }
}

/// `keyword: count` per line.
pub fn format_keyword_counts(counts: &[KeywordCount]) -> String {
    counts
        .iter()
        .map(|k| format!("{}: {}\n", k.keyword, k.count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_ranking() {
        let table = FrequencyTable::from_tokens(&["buy", "widgets", "widgets", "widgets"]);
        let top = table.top_n(10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].keyword, "widgets");
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].keyword, "buy");
        assert_eq!(table.total(), 4);
        assert_eq!(table.distinct(), 2);
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let table = FrequencyTable::from_tokens(&["zeta", "alpha", "mid", "alpha", "zeta", "mid"]);
        assert_eq!(table.top_keywords(3), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_top_n_truncates() {
        let tokens: Vec<String> = (0..30).map(|i| format!("word{i}")).collect();
        let table = FrequencyTable::from_tokens(&tokens);
        assert_eq!(table.top_n(10).len(), 10);
        assert_eq!(table.top_n(0).len(), 0);
    }

    #[test]
    fn test_empty_table() {
        let table = FrequencyTable::from_tokens::<&str>(&[]);
        assert!(table.is_empty());
        assert!(table.top_n(10).is_empty());
        assert_eq!(table.count("anything"), 0);
    }

    #[test]
    fn test_format_keyword_counts() {
        let table = FrequencyTable::from_tokens(&["widgets", "widgets", "gizmo"]);
        assert_eq!(format_keyword_counts(&table.top_n(10)), "widgets: 2\ngizmo: 1\n");
    }
}
