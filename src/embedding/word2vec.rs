// Word2Vec (CBOW with negative sampling) trained on one page's tokens.
//
// The token stream is cut into fixed-length, non-overlapping windows that
// serve as training sentences. For each position, the mean of the context
// vectors is trained to predict the center word against `negative` noise
// words drawn from the unigram distribution raised to 0.75.
//
// Training is single-threaded and driven by one seeded RNG, so the same
// tokens and parameters always produce the same vectors.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::AnalysisParams;
use crate::error::AnalysisError;

/// Hyperparameters for one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct Word2VecParams {
    pub vector_size: usize,
    /// Max context distance on each side of the center word
    pub window: usize,
    pub min_count: usize,
    pub negative: usize,
    pub epochs: usize,
    /// Starting learning rate, decayed linearly to `min_alpha`
    pub alpha: f64,
    pub min_alpha: f64,
    pub seed: u64,
}

impl Default for Word2VecParams {
    fn default() -> Self {
        Self {
            vector_size: 100,
            window: 5,
            min_count: 1,
            negative: 5,
            epochs: 5,
            alpha: 0.025,
            min_alpha: 0.0001,
            seed: 42,
        }
    }
}

impl From<&AnalysisParams> for Word2VecParams {
    fn from(p: &AnalysisParams) -> Self {
        Self {
            vector_size: p.vector_size,
            window: p.context_window,
            min_count: p.min_count,
            negative: p.negative,
            epochs: p.epochs,
            seed: p.seed,
            ..Self::default()
        }
    }
}

/// Trained token → vector mapping.
#[derive(Debug, Clone)]
pub struct EmbeddingModel {
    vector_size: usize,
    index: HashMap<String, usize>,
    words: Vec<String>,
    vectors: Vec<Vec<f64>>,
}

impl EmbeddingModel {
    pub fn vector(&self, word: &str) -> Option<&[f64]> {
        self.index.get(word).map(|&i| self.vectors[i].as_slice())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    /// Vocabulary in first-occurrence order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// One row per word, in the order given. Every word must be in the vocabulary.
    pub fn matrix(&self, words: &[String]) -> Result<Vec<Vec<f64>>, AnalysisError> {
        words
            .iter()
            .map(|w| {
                self.vector(w).map(<[f64]>::to_vec).ok_or_else(|| {
                    AnalysisError::ModelTraining(format!("word {w:?} is not in the vocabulary"))
                })
            })
            .collect()
    }
}

/// Cut the stream into consecutive windows of `len` tokens; the last may be shorter.
pub fn sentence_windows(tokens: &[String], len: usize) -> Vec<&[String]> {
    tokens.chunks(len.max(1)).collect()
}

/// Train a model on `sentences`.
pub fn train(
    sentences: &[&[String]],
    params: &Word2VecParams,
) -> Result<EmbeddingModel, AnalysisError> {
    if params.vector_size == 0 {
        return Err(AnalysisError::ModelTraining(
            "vector size must be at least 1".to_string(),
        ));
    }

    // Vocabulary in first-occurrence order.
    let mut counts: Vec<usize> = Vec::new();
    let mut words: Vec<String> = Vec::new();
    let mut first_index: HashMap<&str, usize> = HashMap::new();
    for sentence in sentences {
        for token in sentence.iter() {
            match first_index.get(token.as_str()) {
                Some(&i) => counts[i] += 1,
                None => {
                    first_index.insert(token.as_str(), words.len());
                    words.push(token.clone());
                    counts.push(1);
                }
            }
        }
    }

    let keep: Vec<usize> = (0..words.len())
        .filter(|&i| counts[i] >= params.min_count.max(1))
        .collect();
    if keep.is_empty() {
        return Err(AnalysisError::ModelTraining(format!(
            "no token occurs at least {} time(s)",
            params.min_count.max(1)
        )));
    }

    let vocab_words: Vec<String> = keep.iter().map(|&i| words[i].clone()).collect();
    let vocab_counts: Vec<usize> = keep.iter().map(|&i| counts[i]).collect();
    let index: HashMap<String, usize> = vocab_words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.clone(), i))
        .collect();

    let encoded: Vec<Vec<usize>> = sentences
        .iter()
        .map(|s| s.iter().filter_map(|t| index.get(t).copied()).collect())
        .collect();

    let dim = params.vector_size;
    let mut rng = StdRng::seed_from_u64(params.seed);

    let mut syn0: Vec<Vec<f64>> = (0..vocab_words.len())
        .map(|_| {
            (0..dim)
                .map(|_| (rng.random::<f64>() - 0.5) / dim as f64)
                .collect()
        })
        .collect();
    let mut syn1neg: Vec<Vec<f64>> = vec![vec![0.0; dim]; vocab_words.len()];

    let noise = NoiseTable::new(&vocab_counts);

    let words_per_epoch: usize = encoded.iter().map(Vec::len).sum();
    let total_steps = (words_per_epoch * params.epochs).max(1);
    let mut step = 0usize;

    let mut neu1 = vec![0.0; dim];
    let mut neu1e = vec![0.0; dim];
    let mut context: Vec<usize> = Vec::with_capacity(2 * params.window);

    for _epoch in 0..params.epochs {
        for sentence in &encoded {
            for (pos, &center) in sentence.iter().enumerate() {
                let progress = step as f64 / total_steps as f64;
                let lr = (params.alpha - (params.alpha - params.min_alpha) * progress)
                    .max(params.min_alpha);
                step += 1;

                // Reduced window: radius drawn uniformly from 1..=window.
                let radius = if params.window == 0 {
                    0
                } else {
                    params.window - rng.random_range(0..params.window)
                };
                let lo = pos.saturating_sub(radius);
                let hi = (pos + radius).min(sentence.len() - 1);

                context.clear();
                context.extend((lo..=hi).filter(|&j| j != pos).map(|j| sentence[j]));
                if context.is_empty() {
                    continue;
                }

                neu1.iter_mut().for_each(|v| *v = 0.0);
                for &c in &context {
                    for (acc, v) in neu1.iter_mut().zip(&syn0[c]) {
                        *acc += v;
                    }
                }
                let inv = 1.0 / context.len() as f64;
                neu1.iter_mut().for_each(|v| *v *= inv);
                neu1e.iter_mut().for_each(|v| *v = 0.0);

                for d in 0..=params.negative {
                    let (target, label) = if d == 0 {
                        (center, 1.0)
                    } else {
                        let sample = noise.sample(&mut rng);
                        if sample == center {
                            continue;
                        }
                        (sample, 0.0)
                    };

                    let out = &mut syn1neg[target];
                    let f: f64 = neu1.iter().zip(out.iter()).map(|(a, b)| a * b).sum();
                    let g = (label - sigmoid(f)) * lr;

                    for k in 0..dim {
                        neu1e[k] += g * out[k];
                        out[k] += g * neu1[k];
                    }
                }

                for &c in &context {
                    for (v, e) in syn0[c].iter_mut().zip(&neu1e) {
                        *v += e;
                    }
                }
            }
        }
    }

    if syn0.iter().flatten().any(|v| !v.is_finite()) {
        return Err(AnalysisError::ModelTraining(
            "training diverged to non-finite values".to_string(),
        ));
    }

    debug!(
        vocab = vocab_words.len(),
        sentences = encoded.len(),
        dim = dim,
        epochs = params.epochs,
        "Trained word embeddings"
    );

    Ok(EmbeddingModel {
        vector_size: dim,
        index,
        words: vocab_words,
        vectors: syn0,
    })
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Unigram^0.75 sampling table as a cumulative distribution.
struct NoiseTable {
    cumulative: Vec<f64>,
}

impl NoiseTable {
    fn new(counts: &[usize]) -> Self {
        let mut acc = 0.0;
        let cumulative = counts
            .iter()
            .map(|&c| {
                acc += (c as f64).powf(0.75);
                acc
            })
            .collect();
        Self { cumulative }
    }

    fn sample(&self, rng: &mut StdRng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r = rng.random::<f64>() * total;
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn small_params() -> Word2VecParams {
        Word2VecParams {
            vector_size: 16,
            epochs: 3,
            ..Word2VecParams::default()
        }
    }

    #[test]
    fn test_sentence_windows() {
        let t = tokens("a b c d e f g h i j k l");
        let windows = sentence_windows(&t, 5);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].len(), 5);
        assert_eq!(windows[2].len(), 2);
        assert!(sentence_windows(&[], 10).is_empty());
    }

    #[test]
    fn test_every_token_gets_a_vector() {
        let t = tokens("garden tools patio furniture garden hose patio lights");
        let windows = sentence_windows(&t, 10);
        let model = train(&windows, &small_params()).unwrap();
        assert_eq!(model.len(), 6);
        assert_eq!(model.words()[0], "garden");
        for w in ["garden", "tools", "patio", "furniture", "hose", "lights"] {
            let v = model.vector(w).unwrap();
            assert_eq!(v.len(), 16);
            assert!(v.iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_single_distinct_token() {
        let t = tokens("widgets widgets widgets");
        let windows = sentence_windows(&t, 10);
        let model = train(&windows, &small_params()).unwrap();
        assert_eq!(model.len(), 1);
        assert!(model.contains("widgets"));
    }

    #[test]
    fn test_single_token_stream() {
        let t = tokens("lonely");
        let windows = sentence_windows(&t, 10);
        let model = train(&windows, &small_params()).unwrap();
        assert_eq!(model.vector("lonely").unwrap().len(), 16);
    }

    #[test]
    fn test_same_seed_same_vectors() {
        let t = tokens("alpha beta gamma delta alpha beta epsilon zeta alpha gamma");
        let windows = sentence_windows(&t, 4);
        let a = train(&windows, &small_params()).unwrap();
        let b = train(&windows, &small_params()).unwrap();
        for w in a.words() {
            assert_eq!(a.vector(w), b.vector(w));
        }
    }

    #[test]
    fn test_empty_stream_fails() {
        let err = train(&[], &small_params()).unwrap_err();
        assert_eq!(err.kind(), "model_training_error");
    }

    #[test]
    fn test_zero_vector_size_fails() {
        let t = tokens("alpha beta");
        let windows = sentence_windows(&t, 10);
        let params = Word2VecParams {
            vector_size: 0,
            ..Word2VecParams::default()
        };
        assert!(train(&windows, &params).is_err());
    }

    #[test]
    fn test_min_count_filters_vocabulary() {
        let t = tokens("common common rare");
        let windows = sentence_windows(&t, 10);
        let params = Word2VecParams {
            min_count: 2,
            ..small_params()
        };
        let model = train(&windows, &params).unwrap();
        assert!(model.contains("common"));
        assert!(!model.contains("rare"));
        assert!(model.matrix(&["rare".to_string()]).is_err());
    }
}
