//! Pairwise cosine similarity over rating vectors.
//!
//! Computing all pairs is O(n² · d) and is the dominant cost of the KNN
//! trainers, so the outer loop runs on the rayon pool.

use crate::matrix::{dot, Dense};
use rayon::prelude::*;

/// Cosine similarity between every pair of rows.
///
/// A row with zero norm (a user or item with no ratings in the matrix)
/// gets similarity 0.0 against everything, including itself.
pub fn cosine_rows(matrix: &Dense) -> Dense {
    let n = matrix.rows();
    let norms: Vec<f64> = (0..n).map(|r| dot(matrix.row(r), matrix.row(r)).sqrt()).collect();

    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let row_i = matrix.row(i);
            (0..n)
                .map(|j| {
                    let denom = norms[i] * norms[j];
                    if denom > 0.0 {
                        dot(row_i, matrix.row(j)) / denom
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    Dense::from_vec(n, n, rows.into_iter().flatten().collect())
}

/// Cosine similarity between every pair of columns.
pub fn cosine_columns(matrix: &Dense) -> Dense {
    cosine_rows(&matrix.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_rows_have_similarity_one() {
        let m = Dense::from_vec(2, 3, vec![1.0, 2.0, 3.0, 2.0, 4.0, 6.0]);
        let sim = cosine_rows(&m);
        assert!((sim.get(0, 0) - 1.0).abs() < 1e-12);
        // Parallel vectors are also fully similar
        assert!((sim.get(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_rows_have_similarity_zero() {
        let m = Dense::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]);
        let sim = cosine_rows(&m);
        assert!(sim.get(0, 1).abs() < 1e-12);
        assert!(sim.get(1, 0).abs() < 1e-12);
    }

    #[test]
    fn zero_row_is_dissimilar_to_everything() {
        let m = Dense::from_vec(2, 2, vec![0.0, 0.0, 1.0, 1.0]);
        let sim = cosine_rows(&m);
        assert_eq!(sim.get(0, 0), 0.0);
        assert_eq!(sim.get(0, 1), 0.0);
    }

    #[test]
    fn similarity_matrix_is_symmetric() {
        let m = Dense::from_vec(3, 2, vec![1.0, 2.0, 3.0, 1.0, 0.0, 4.0]);
        let sim = cosine_rows(&m);
        for i in 0..3 {
            for j in 0..3 {
                assert!((sim.get(i, j) - sim.get(j, i)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn column_similarity_matches_row_similarity_of_transpose() {
        let m = Dense::from_vec(2, 3, vec![5.0, 1.0, 0.0, 2.0, 2.0, 3.0]);
        let by_columns = cosine_columns(&m);
        let by_rows = cosine_rows(&m.transpose());
        assert_eq!(by_columns, by_rows);
    }
}
