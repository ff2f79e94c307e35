// Word embeddings trained on the page's own text.
//
// Every analysis trains a fresh model; nothing is shared across requests.

pub mod similarity;
pub mod word2vec;
