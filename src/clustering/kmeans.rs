// k-means over raw embedding vectors.
//
// k-means++ seeding, Lloyd iterations, several seeded restarts; the run with
// the lowest inertia wins. The requested cluster count is capped at the
// number of points. Final labels are renumbered by first appearance in the
// input, so cluster 0 always holds the first (most frequent) keyword.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::embedding::similarity::squared_distance;
use crate::embedding::word2vec::EmbeddingModel;
use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansParams {
    pub k: usize,
    pub restarts: usize,
    pub max_iter: usize,
    /// Stop when the total squared centroid shift falls below this
    pub tol: f64,
    pub seed: u64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            k: 5,
            restarts: 10,
            max_iter: 300,
            tol: 1e-4,
            seed: 42,
        }
    }
}

/// Result of one k-means fit.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster id per input point, in [0, k)
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
}

impl KMeansFit {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }
}

/// Cluster `points`. An empty input gives an empty fit.
pub fn kmeans(points: &[Vec<f64>], params: &KMeansParams) -> KMeansFit {
    let n = points.len();
    if n == 0 {
        return KMeansFit {
            labels: Vec::new(),
            centroids: Vec::new(),
            inertia: 0.0,
        };
    }

    let k = params.k.clamp(1, n);
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<KMeansFit> = None;

    for _ in 0..params.restarts.max(1) {
        let seeds = kmeans_plus_plus(points, k, &mut rng);
        let fit = lloyd(points, seeds, params.max_iter, params.tol);
        if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
            best = Some(fit);
        }
    }

    let fit = best.map(relabel_by_first_appearance).unwrap_or_else(|| KMeansFit {
        labels: vec![0; n],
        centroids: vec![points[0].clone()],
        inertia: 0.0,
    });

    debug!(
        points = n,
        k = fit.k(),
        inertia = fit.inertia,
        "k-means converged"
    );
    fit
}

/// k-means++ seeding: first center uniform, the rest proportional to the
/// squared distance from the nearest chosen center.
fn kmeans_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut chosen: Vec<usize> = vec![rng.random_range(0..n)];
    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &points[chosen[0]]))
        .collect();

    while chosen.len() < k {
        let total: f64 = nearest.iter().sum();
        let next = if total > f64::EPSILON {
            let mut r = rng.random::<f64>() * total;
            let mut pick = n - 1;
            for (i, &d) in nearest.iter().enumerate() {
                if r < d {
                    pick = i;
                    break;
                }
                r -= d;
            }
            pick
        } else {
            // Every point sits on a chosen center; take the first unused one.
            (0..n).find(|i| !chosen.contains(i)).unwrap_or(0)
        };

        chosen.push(next);
        for (i, p) in points.iter().enumerate() {
            let d = squared_distance(p, &points[next]);
            if d < nearest[i] {
                nearest[i] = d;
            }
        }
    }

    chosen.into_iter().map(|i| points[i].clone()).collect()
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best.1 {
            best = (c, d);
        }
    }
    best
}

fn lloyd(
    points: &[Vec<f64>],
    mut centroids: Vec<Vec<f64>>,
    max_iter: usize,
    tol: f64,
) -> KMeansFit {
    let n = points.len();
    let k = centroids.len();
    let dim = points[0].len();
    let mut labels = vec![0usize; n];

    for _ in 0..max_iter.max(1) {
        let mut dists = vec![0.0; n];
        for (i, p) in points.iter().enumerate() {
            let (c, d) = nearest_centroid(p, &centroids);
            labels[i] = c;
            dists[i] = d;
        }

        // An empty cluster takes the point farthest from its own centroid,
        // as long as that doesn't empty another cluster.
        let mut sizes = vec![0usize; k];
        for &l in &labels {
            sizes[l] += 1;
        }
        for c in 0..k {
            if sizes[c] > 0 {
                continue;
            }
            let donor = (0..n)
                .filter(|&i| sizes[labels[i]] > 1)
                .max_by(|&a, &b| dists[a].total_cmp(&dists[b]).then(b.cmp(&a)));
            if let Some(i) = donor {
                sizes[labels[i]] -= 1;
                labels[i] = c;
                sizes[c] = 1;
                dists[i] = 0.0;
            }
        }

        let mut sums = vec![vec![0.0; dim]; k];
        for (i, p) in points.iter().enumerate() {
            for (acc, v) in sums[labels[i]].iter_mut().zip(p) {
                *acc += v;
            }
        }

        let mut shift = 0.0;
        for c in 0..k {
            if sizes[c] == 0 {
                continue;
            }
            let inv = 1.0 / sizes[c] as f64;
            let updated: Vec<f64> = sums[c].iter().map(|s| s * inv).collect();
            shift += squared_distance(&updated, &centroids[c]);
            centroids[c] = updated;
        }

        if shift < tol {
            break;
        }
    }

    // Final assignment against the settled centroids.
    let mut inertia = 0.0;
    for (i, p) in points.iter().enumerate() {
        let (c, d) = nearest_centroid(p, &centroids);
        labels[i] = c;
        inertia += d;
    }

    KMeansFit {
        labels,
        centroids,
        inertia,
    }
}

/// Renumber clusters in order of their first member; drop clusters nobody
/// ended up in.
fn relabel_by_first_appearance(fit: KMeansFit) -> KMeansFit {
    let mut mapping: Vec<Option<usize>> = vec![None; fit.centroids.len()];
    let mut order: Vec<usize> = Vec::new();
    for &l in &fit.labels {
        if mapping[l].is_none() {
            mapping[l] = Some(order.len());
            order.push(l);
        }
    }

    let labels = fit
        .labels
        .iter()
        .map(|&l| mapping[l].unwrap_or(0))
        .collect();
    let centroids = order.iter().map(|&c| fit.centroids[c].clone()).collect();

    KMeansFit {
        labels,
        centroids,
        inertia: fit.inertia,
    }
}

/// Word → cluster id for the clustered keywords.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    /// Words in input (frequency) order
    pub words: Vec<String>,
    /// Cluster id per word
    pub labels: Vec<usize>,
    pub num_clusters: usize,
}

impl ClusterAssignment {
    pub fn cluster_of(&self, word: &str) -> Option<usize> {
        self.words
            .iter()
            .position(|w| w == word)
            .map(|i| self.labels[i])
    }

    /// Members of each cluster, in input order.
    pub fn clusters(&self) -> Vec<Vec<&str>> {
        let mut out: Vec<Vec<&str>> = vec![Vec::new(); self.num_clusters];
        for (word, &label) in self.words.iter().zip(&self.labels) {
            out[label].push(word.as_str());
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Cluster `words` by their vectors in `model`.
///
/// Every word lands in exactly one cluster, and there are never more
/// clusters than `requested` or than words.
pub fn cluster_words(
    words: &[String],
    model: &EmbeddingModel,
    requested: usize,
    restarts: usize,
    seed: u64,
) -> Result<ClusterAssignment, AnalysisError> {
    if words.is_empty() {
        return Ok(ClusterAssignment {
            words: Vec::new(),
            labels: Vec::new(),
            num_clusters: 0,
        });
    }

    let matrix = model.matrix(words)?;
    let fit = kmeans(
        &matrix,
        &KMeansParams {
            k: requested,
            restarts,
            seed,
            ..KMeansParams::default()
        },
    );

    Ok(ClusterAssignment {
        words: words.to_vec(),
        num_clusters: fit.k(),
        labels: fit.labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.0],
            vec![10.0, 10.1],
        ]
    }

    #[test]
    fn test_separates_obvious_blobs() {
        let fit = kmeans(
            &blobs(),
            &KMeansParams {
                k: 2,
                ..KMeansParams::default()
            },
        );
        assert_eq!(fit.labels, vec![0, 0, 0, 1, 1, 1]);
        assert!(fit.inertia < 0.1);
    }

    #[test]
    fn test_k_capped_at_point_count() {
        let points = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let fit = kmeans(
            &points,
            &KMeansParams {
                k: 5,
                ..KMeansParams::default()
            },
        );
        assert_eq!(fit.k(), 2);
        assert_eq!(fit.labels.len(), 2);
        assert_ne!(fit.labels[0], fit.labels[1]);
    }

    #[test]
    fn test_duplicate_points_still_fill_clusters() {
        let points = vec![vec![1.0, 1.0]; 4];
        let fit = kmeans(
            &points,
            &KMeansParams {
                k: 3,
                ..KMeansParams::default()
            },
        );
        assert!(fit.k() <= 3);
        assert!(fit.labels.iter().all(|&l| l < fit.k()));
    }

    #[test]
    fn test_empty_input() {
        let fit = kmeans(&[], &KMeansParams::default());
        assert!(fit.labels.is_empty());
        assert_eq!(fit.k(), 0);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let points: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![(i as f64 * 1.7).sin(), (i as f64 * 0.3).cos()])
            .collect();
        let params = KMeansParams {
            k: 4,
            ..KMeansParams::default()
        };
        let a = kmeans(&points, &params);
        let b = kmeans(&points, &params);
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn test_labels_numbered_by_first_appearance() {
        let mut points = blobs();
        points.reverse();
        let fit = kmeans(
            &points,
            &KMeansParams {
                k: 2,
                ..KMeansParams::default()
            },
        );
        assert_eq!(fit.labels[0], 0);
    }

    #[test]
    fn test_assignment_clusters() {
        let assignment = ClusterAssignment {
            words: vec!["a".into(), "b".into(), "c".into()],
            labels: vec![0, 1, 0],
            num_clusters: 2,
        };
        assert_eq!(assignment.clusters(), vec![vec!["a", "c"], vec!["b"]]);
        assert_eq!(assignment.cluster_of("b"), Some(1));
        assert_eq!(assignment.cluster_of("zzz"), None);
    }
}
