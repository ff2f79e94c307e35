// Unit tests for embedding training, clustering, projection and the
// cluster table, chained the way the analyzer runs them.

use seolens::clustering::kmeans::{cluster_words, kmeans, KMeansParams};
use seolens::clustering::projection::project_2d;
use seolens::clustering::table::ClusterTable;
use seolens::embedding::similarity::cosine_similarity;
use seolens::embedding::word2vec::{sentence_windows, train, Word2VecParams};

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn params() -> Word2VecParams {
    Word2VecParams {
        vector_size: 32,
        epochs: 5,
        ..Word2VecParams::default()
    }
}

const CORPUS: &str = "garden tools garden hose garden spade garden rake \
    patio chairs patio table patio lights patio umbrella \
    garden tools garden hose patio chairs patio table \
    garden rake garden spade patio lights patio umbrella";

// ============================================================
// Embedding -> k-means
// ============================================================

#[test]
fn every_word_lands_in_exactly_one_cluster() {
    let toks = tokens(CORPUS);
    let model = train(&sentence_windows(&toks, 10), &params()).unwrap();
    let words: Vec<String> = model.words().to_vec();

    let assignment = cluster_words(&words, &model, 5, 10, 42).unwrap();
    assert_eq!(assignment.words, words);
    assert_eq!(assignment.labels.len(), words.len());
    assert!(assignment.num_clusters <= 5);
    assert!(assignment.labels.iter().all(|&l| l < assignment.num_clusters));

    let members: usize = assignment.clusters().iter().map(Vec::len).sum();
    assert_eq!(members, words.len());
}

#[test]
fn cluster_count_capped_by_vocabulary() {
    let toks = tokens("widgets gadgets widgets gadgets widgets");
    let model = train(&sentence_windows(&toks, 10), &params()).unwrap();
    let words = vec!["widgets".to_string(), "gadgets".to_string()];

    let assignment = cluster_words(&words, &model, 5, 10, 42).unwrap();
    assert!(assignment.num_clusters <= 2);
    assert_eq!(assignment.labels[0], 0);
}

#[test]
fn unknown_word_is_a_model_error() {
    let toks = tokens("widgets gadgets");
    let model = train(&sentence_windows(&toks, 10), &params()).unwrap();
    let err = cluster_words(&["sprockets".to_string()], &model, 5, 10, 42).unwrap_err();
    assert_eq!(err.kind(), "model_training_error");
}

#[test]
fn clustering_is_reproducible() {
    let toks = tokens(CORPUS);
    let model_a = train(&sentence_windows(&toks, 10), &params()).unwrap();
    let model_b = train(&sentence_windows(&toks, 10), &params()).unwrap();
    let words: Vec<String> = model_a.words().to_vec();

    let a = cluster_words(&words, &model_a, 3, 10, 42).unwrap();
    let b = cluster_words(&words, &model_b, 3, 10, 42).unwrap();
    assert_eq!(a, b);
}

#[test]
fn trained_vectors_are_not_all_identical() {
    let toks = tokens(CORPUS);
    let model = train(&sentence_windows(&toks, 10), &params()).unwrap();
    let garden = model.vector("garden").unwrap();
    let umbrella = model.vector("umbrella").unwrap();
    assert!(cosine_similarity(garden, umbrella) < 0.9999);
}

#[test]
fn more_restarts_never_increase_inertia() {
    let points: Vec<Vec<f64>> = (0..30)
        .map(|i| {
            let t = i as f64;
            vec![(t * 0.7).sin() * 3.0, (t * 1.3).cos() * 3.0, t % 4.0]
        })
        .collect();

    let one = kmeans(
        &points,
        &KMeansParams {
            k: 4,
            restarts: 1,
            ..KMeansParams::default()
        },
    );
    let ten = kmeans(
        &points,
        &KMeansParams {
            k: 4,
            restarts: 10,
            ..KMeansParams::default()
        },
    );
    // The ten-restart run includes the one-restart run's first seeding.
    assert!(ten.inertia <= one.inertia + 1e-9);
}

// ============================================================
// Projection and table
// ============================================================

#[test]
fn projection_has_one_point_per_word() {
    let toks = tokens(CORPUS);
    let model = train(&sentence_windows(&toks, 10), &params()).unwrap();
    let words: Vec<String> = model.words().to_vec();
    let matrix = model.matrix(&words).unwrap();

    let points = project_2d(&matrix, 42);
    assert_eq!(points.len(), words.len());
    assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    assert_eq!(points, project_2d(&matrix, 42));
}

#[test]
fn table_has_one_column_per_cluster() {
    let toks = tokens(CORPUS);
    let model = train(&sentence_windows(&toks, 10), &params()).unwrap();
    let words: Vec<String> = model.words().to_vec();
    let assignment = cluster_words(&words, &model, 4, 10, 42).unwrap();

    let table = ClusterTable::from_assignment(&assignment);
    assert_eq!(table.num_columns(), assignment.num_clusters);

    let largest = assignment.clusters().iter().map(Vec::len).max().unwrap();
    assert_eq!(table.rows.len(), largest);

    let html = table.to_html();
    for word in &words {
        assert!(html.contains(&format!("<td>{word}</td>")), "missing {word}");
    }

    let text = table.to_text();
    assert!(text.lines().next().unwrap().contains("Cluster 0"));
}
