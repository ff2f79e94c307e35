// 2-D projection of keyword vectors for the cluster plot.
//
// Classical (Torgerson) MDS over cosine distances: double-center the
// squared distance matrix, take the top two eigenvectors, scale each by the
// square root of its eigenvalue. Eigenvectors come from power iteration
// started at a seeded random vector, and each axis is sign-normalized so
// the largest-magnitude coordinate is positive. The same vectors and seed
// always give the same coordinates.
//
// Used for plotting only; cluster assignment happens in the full space.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::embedding::similarity::cosine_distance_matrix;

const MAX_ITER: usize = 1000;
const CONVERGENCE: f64 = 1e-12;

/// A word placed on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

/// Project each vector to the plane, preserving cosine distances as well
/// as two dimensions allow.
pub fn project_2d(vectors: &[Vec<f64>], seed: u64) -> Vec<PlanarPoint> {
    let n = vectors.len();
    if n == 0 {
        return Vec::new();
    }

    let dist = cosine_distance_matrix(vectors);
    let mut b = double_center(&dist);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut axes: Vec<Vec<f64>> = Vec::with_capacity(2);
    for _ in 0..2 {
        let (eigenvalue, eigenvector) = top_eigenpair(&b, &mut rng);
        let scale = eigenvalue.max(0.0).sqrt();
        axes.push(eigenvector.iter().map(|v| v * scale).collect());

        // Deflate so the next pass finds the next eigenpair.
        for i in 0..n {
            for j in 0..n {
                b[i][j] -= eigenvalue * eigenvector[i] * eigenvector[j];
            }
        }
    }

    (0..n)
        .map(|i| PlanarPoint {
            x: axes[0][i],
            y: axes[1][i],
        })
        .collect()
}

/// B = -1/2 * J D² J, where J is the centering matrix.
fn double_center(dist: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = dist.len();
    let sq: Vec<Vec<f64>> = dist
        .iter()
        .map(|row| row.iter().map(|d| d * d).collect())
        .collect();

    let row_means: Vec<f64> = sq.iter().map(|r| r.iter().sum::<f64>() / n as f64).collect();
    let grand_mean = row_means.iter().sum::<f64>() / n as f64;

    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| -0.5 * (sq[i][j] - row_means[i] - row_means[j] + grand_mean))
                .collect()
        })
        .collect()
}

/// Largest (algebraic) eigenpair of a symmetric matrix.
///
/// Power iteration runs on B + cI, with c the Gershgorin bound, so every
/// shifted eigenvalue is non-negative and the dominant one is B's largest.
fn top_eigenpair(b: &[Vec<f64>], rng: &mut StdRng) -> (f64, Vec<f64>) {
    let n = b.len();
    let shift = b
        .iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max);

    let mut v: Vec<f64> = (0..n).map(|_| rng.random::<f64>() - 0.5).collect();
    if !normalize(&mut v) {
        v = vec![1.0 / (n as f64).sqrt(); n];
    }

    for _ in 0..MAX_ITER {
        let mut w: Vec<f64> = mat_vec(b, &v);
        for (wi, vi) in w.iter_mut().zip(&v) {
            *wi += shift * vi;
        }
        if !normalize(&mut w) {
            break;
        }
        let delta: f64 = w.iter().zip(&v).map(|(a, c)| (a - c) * (a - c)).sum();
        v = w;
        if delta < CONVERGENCE {
            break;
        }
    }

    let bv = mat_vec(b, &v);
    let eigenvalue: f64 = v.iter().zip(&bv).map(|(a, c)| a * c).sum();

    // Sign convention: the largest-magnitude component is positive.
    let pivot = v
        .iter()
        .enumerate()
        .fold((0, 0.0_f64), |best, (i, &x)| {
            if x.abs() > best.1.abs() {
                (i, x)
            } else {
                best
            }
        })
        .1;
    if pivot < 0.0 {
        v.iter_mut().for_each(|x| *x = -*x);
    }

    (eigenvalue, v)
}

fn mat_vec(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.iter()
        .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
        .collect()
}

/// Scale to unit length. Returns false for a (near-)zero vector.
fn normalize(v: &mut [f64]) -> bool {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm < f64::EPSILON {
        return false;
    }
    v.iter_mut().for_each(|x| *x /= norm);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planar_distance(a: PlanarPoint, b: PlanarPoint) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn test_empty_and_single() {
        assert!(project_2d(&[], 42).is_empty());
        let one = project_2d(&[vec![1.0, 2.0]], 42);
        assert_eq!(one.len(), 1);
        assert!(one[0].x.abs() < 1e-9 && one[0].y.abs() < 1e-9);
    }

    #[test]
    fn test_similar_vectors_land_close() {
        let vectors = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.95, 0.05, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.05, 0.95],
        ];
        let pts = project_2d(&vectors, 42);
        let near = planar_distance(pts[0], pts[1]);
        let far = planar_distance(pts[0], pts[2]);
        assert!(near < far, "near={near} far={far}");
    }

    #[test]
    fn test_reproducible() {
        let vectors: Vec<Vec<f64>> = (0..12)
            .map(|i| {
                let t = i as f64;
                vec![t.sin(), t.cos(), (t * 0.5).sin()]
            })
            .collect();
        assert_eq!(project_2d(&vectors, 42), project_2d(&vectors, 42));
    }

    #[test]
    fn test_coordinates_are_finite() {
        let vectors = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![1.0, 1.0]];
        for p in project_2d(&vectors, 7) {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }
}
