// Keyword extraction: text normalization and frequency ranking.

pub mod frequency;
pub mod lexicon;
pub mod normalize;
