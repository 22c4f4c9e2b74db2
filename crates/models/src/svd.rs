//! Truncated singular value decomposition of the user-item matrix.
//!
//! Uses randomized subspace iteration: project the matrix onto a seeded
//! random test matrix, orthonormalize, run a few power iterations to
//! sharpen the subspace, then solve the small (rank+oversampling)² eigen
//! problem exactly with Jacobi rotations. Deterministic for a fixed seed.
//!
//! The fitted factors follow the layout the rest of the pipeline expects:
//! `user_factors` is U·Σ (one row per matrix row), `item_factors` is V
//! (one row per matrix column), so a predicted rating is the plain dot
//! product of a user row and an item row.

use crate::matrix::Dense;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default factorization rank used by the training pipeline.
pub const SVD_RANK: usize = 50;

/// Seed for the randomized range finder.
pub const SVD_SEED: u64 = 42;

/// Configuration for a truncated SVD fit.
#[derive(Debug, Clone, Copy)]
pub struct TruncatedSvd {
    pub rank: usize,
    pub seed: u64,
    /// Extra subspace columns beyond `rank`, trimmed after the solve.
    oversamples: usize,
    /// Power iterations to push the random subspace toward the top
    /// singular vectors.
    power_iterations: usize,
}

/// The fitted decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvdFactors {
    /// U·Σ, one row per user (rank columns).
    pub user_factors: Dense,
    /// V, one row per item (rank columns).
    pub item_factors: Dense,
    /// Singular values, descending.
    pub singular_values: Vec<f64>,
}

impl TruncatedSvd {
    pub fn new(rank: usize, seed: u64) -> Self {
        Self {
            rank,
            seed,
            oversamples: 10,
            power_iterations: 4,
        }
    }

    /// Fit the decomposition. The effective rank is capped at
    /// `min(rows, cols)`.
    pub fn fit(&self, matrix: &Dense) -> SvdFactors {
        let m = matrix.rows();
        let n = matrix.cols();
        let max_rank = m.min(n);
        let k = self.rank.min(max_rank);
        let l = (k + self.oversamples).min(max_rank);

        debug!(rows = m, cols = n, rank = k, subspace = l, "fitting truncated SVD");

        // Seeded random test matrix, n x l.
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut omega = Dense::zeros(n, l);
        for r in 0..n {
            for c in 0..l {
                omega.set(r, c, rng.random_range(-1.0..1.0));
            }
        }

        // Range finder: Q spans an approximation of the column space of A.
        let mut q = matrix.matmul(&omega);
        orthonormalize_columns(&mut q);
        for _ in 0..self.power_iterations {
            let mut z = matrix.transpose_matmul(&q);
            orthonormalize_columns(&mut z);
            q = matrix.matmul(&z);
            orthonormalize_columns(&mut q);
        }

        // Small problem: G = (AᵀQ)ᵀ(AᵀQ) = Qᵀ A Aᵀ Q, eigenvalues are the
        // squared singular values of the projected matrix.
        let z = matrix.transpose_matmul(&q); // n x l
        let g = z.gram(); // l x l
        let (eigenvalues, eigenvectors) = jacobi_eigen(&g);

        let w = take_columns(&eigenvectors, k); // l x k
        let singular_values: Vec<f64> = eigenvalues
            .iter()
            .take(k)
            .map(|&e| e.max(0.0).sqrt())
            .collect();

        let u = q.matmul(&w); // m x k, left singular vectors
        let v_unscaled = z.matmul(&w); // n x k, column i = Aᵀ u_i = σ_i v_i

        // user_factors = U·Σ, item_factors = V.
        let mut user_factors = u;
        let mut item_factors = v_unscaled;
        for (i, &sigma) in singular_values.iter().enumerate() {
            for r in 0..m {
                user_factors.set(r, i, user_factors.get(r, i) * sigma);
            }
            let inv = if sigma > 1e-12 { 1.0 / sigma } else { 0.0 };
            for r in 0..n {
                item_factors.set(r, i, item_factors.get(r, i) * inv);
            }
        }

        SvdFactors {
            user_factors,
            item_factors,
            singular_values,
        }
    }
}

impl SvdFactors {
    /// Approximate matrix entry: dot of a user row and an item row.
    pub fn predict(&self, user_pos: usize, item_pos: usize) -> f64 {
        crate::matrix::dot(self.user_factors.row(user_pos), self.item_factors.row(item_pos))
    }
}

/// Modified Gram-Schmidt over the columns, in place. Columns that collapse
/// to (numerically) zero are left as zero vectors.
fn orthonormalize_columns(m: &mut Dense) {
    let rows = m.rows();
    let cols = m.cols();
    for c in 0..cols {
        for p in 0..c {
            let mut proj = 0.0;
            for r in 0..rows {
                proj += m.get(r, c) * m.get(r, p);
            }
            if proj != 0.0 {
                for r in 0..rows {
                    let value = m.get(r, c) - proj * m.get(r, p);
                    m.set(r, c, value);
                }
            }
        }
        let norm: f64 = (0..rows).map(|r| m.get(r, c) * m.get(r, c)).sum::<f64>().sqrt();
        if norm > 1e-12 {
            for r in 0..rows {
                m.set(r, c, m.get(r, c) / norm);
            }
        } else {
            for r in 0..rows {
                m.set(r, c, 0.0);
            }
        }
    }
}

/// Eigendecomposition of a small symmetric matrix by cyclic Jacobi
/// rotations. Returns eigenvalues in descending order with matching
/// eigenvector columns.
fn jacobi_eigen(g: &Dense) -> (Vec<f64>, Dense) {
    let n = g.rows();
    let mut a = g.clone();
    let mut v = identity(n);

    for _sweep in 0..100 {
        let mut off_diagonal = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off_diagonal += a.get(p, q) * a.get(p, q);
            }
        }
        if off_diagonal < 1e-20 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a.get(p, q);
                if apq.abs() < 1e-15 {
                    continue;
                }
                let theta = (a.get(q, q) - a.get(p, p)) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                // A <- JᵀAJ for the (p, q) rotation
                for k in 0..n {
                    let akp = a.get(k, p);
                    let akq = a.get(k, q);
                    a.set(k, p, c * akp - s * akq);
                    a.set(k, q, s * akp + c * akq);
                }
                for k in 0..n {
                    let apk = a.get(p, k);
                    let aqk = a.get(q, k);
                    a.set(p, k, c * apk - s * aqk);
                    a.set(q, k, s * apk + c * aqk);
                }
                for k in 0..n {
                    let vkp = v.get(k, p);
                    let vkq = v.get(k, q);
                    v.set(k, p, c * vkp - s * vkq);
                    v.set(k, q, s * vkp + c * vkq);
                }
            }
        }
    }

    // Sort eigenpairs by eigenvalue, descending.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        a.get(j, j)
            .partial_cmp(&a.get(i, i))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let eigenvalues: Vec<f64> = order.iter().map(|&i| a.get(i, i)).collect();
    let mut eigenvectors = Dense::zeros(n, n);
    for (sorted, &original) in order.iter().enumerate() {
        for r in 0..n {
            eigenvectors.set(r, sorted, v.get(r, original));
        }
    }

    (eigenvalues, eigenvectors)
}

fn identity(n: usize) -> Dense {
    let mut m = Dense::zeros(n, n);
    for i in 0..n {
        m.set(i, i, 1.0);
    }
    m
}

fn take_columns(m: &Dense, k: usize) -> Dense {
    let mut out = Dense::zeros(m.rows(), k);
    for r in 0..m.rows() {
        for c in 0..k {
            out.set(r, c, m.get(r, c));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rank-2 test matrix: sum of two outer products.
    fn rank_two_matrix() -> Dense {
        let u1 = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let u2 = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let v1 = [2.0, 0.0, 1.0, 3.0, 1.0];
        let v2 = [0.0, 1.0, -1.0, 0.0, 2.0];

        let mut m = Dense::zeros(6, 5);
        for r in 0..6 {
            for c in 0..5 {
                m.set(r, c, 3.0 * u1[r] * v1[c] + 0.5 * u2[r] * v2[c]);
            }
        }
        m
    }

    #[test]
    fn rank_two_matrix_is_reconstructed_exactly() {
        let matrix = rank_two_matrix();
        let factors = TruncatedSvd::new(2, SVD_SEED).fit(&matrix);

        for r in 0..matrix.rows() {
            for c in 0..matrix.cols() {
                let approx = factors.predict(r, c);
                assert!(
                    (approx - matrix.get(r, c)).abs() < 1e-6,
                    "entry ({r}, {c}): {approx} vs {}",
                    matrix.get(r, c)
                );
            }
        }
    }

    #[test]
    fn singular_values_are_descending_and_non_negative() {
        let factors = TruncatedSvd::new(3, SVD_SEED).fit(&rank_two_matrix());
        let sv = &factors.singular_values;
        for pair in sv.windows(2) {
            assert!(pair[0] >= pair[1] - 1e-9);
        }
        assert!(sv.iter().all(|&s| s >= 0.0));
        // Third singular value of a rank-2 matrix is numerically zero
        assert!(sv[2].abs() < 1e-6);
    }

    #[test]
    fn same_seed_gives_identical_factors() {
        let matrix = rank_two_matrix();
        let first = TruncatedSvd::new(2, SVD_SEED).fit(&matrix);
        let second = TruncatedSvd::new(2, SVD_SEED).fit(&matrix);
        assert_eq!(first.user_factors, second.user_factors);
        assert_eq!(first.item_factors, second.item_factors);
        assert_eq!(first.singular_values, second.singular_values);
    }

    #[test]
    fn rank_is_capped_at_matrix_dimensions() {
        let matrix = rank_two_matrix();
        let factors = TruncatedSvd::new(50, SVD_SEED).fit(&matrix);
        // min(6, 5) = 5 columns at most
        assert_eq!(factors.user_factors.cols(), 5);
        assert_eq!(factors.item_factors.cols(), 5);
        assert_eq!(factors.user_factors.rows(), 6);
        assert_eq!(factors.item_factors.rows(), 5);
    }

    #[test]
    fn jacobi_solves_a_known_symmetric_matrix() {
        // Eigenvalues of [[2, 1], [1, 2]] are 3 and 1
        let g = Dense::from_vec(2, 2, vec![2.0, 1.0, 1.0, 2.0]);
        let (values, vectors) = jacobi_eigen(&g);
        assert!((values[0] - 3.0).abs() < 1e-10);
        assert!((values[1] - 1.0).abs() < 1e-10);
        // Leading eigenvector is (1, 1)/sqrt(2) up to sign
        let ratio = vectors.get(0, 0) / vectors.get(1, 0);
        assert!((ratio - 1.0).abs() < 1e-8);
    }
}
