//! Dense matrices: a small row-major numeric matrix and the user-item
//! rating matrix built from the training split.
//!
//! The user-item matrix stores 0.0 for a missing rating. Ratings are 1-5,
//! so 0 happens to be unambiguous as an absence sentinel in this domain,
//! but it is an overload: the similarity and SVD models treat "unrated"
//! as "rated zero". This is inherited behavior, kept on purpose. A dataset
//! much larger than MovieLens 100k (943 x 1682 here) would also force a
//! sparse map behind the same trainer contract; at this size dense is fine.

use data_loader::{ItemId, Rating, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Dense
// =============================================================================

/// Row-major dense f64 matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Dense {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols, "data length must match dimensions");
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrow one row as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Copy one column out.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.get(r, col)).collect()
    }

    pub fn transpose(&self) -> Dense {
        let mut out = Dense::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c));
            }
        }
        out
    }

    /// `self * other`, (m x k) * (k x n) -> (m x n).
    pub fn matmul(&self, other: &Dense) -> Dense {
        assert_eq!(self.cols, other.rows, "inner dimensions must agree");
        let mut out = Dense::zeros(self.rows, other.cols);
        for r in 0..self.rows {
            let lhs_row = self.row(r);
            let out_row = out.row_mut(r);
            for (k, &lhs) in lhs_row.iter().enumerate() {
                if lhs == 0.0 {
                    continue;
                }
                let rhs_row = other.row(k);
                for (c, &rhs) in rhs_row.iter().enumerate() {
                    out_row[c] += lhs * rhs;
                }
            }
        }
        out
    }

    /// `selfᵀ * other`, (m x n)ᵀ * (m x l) -> (n x l).
    pub fn transpose_matmul(&self, other: &Dense) -> Dense {
        assert_eq!(self.rows, other.rows, "row counts must agree");
        let mut out = Dense::zeros(self.cols, other.cols);
        for r in 0..self.rows {
            let lhs_row = self.row(r);
            let rhs_row = other.row(r);
            for (n, &lhs) in lhs_row.iter().enumerate() {
                if lhs == 0.0 {
                    continue;
                }
                let out_row = out.row_mut(n);
                for (l, &rhs) in rhs_row.iter().enumerate() {
                    out_row[l] += lhs * rhs;
                }
            }
        }
        out
    }

    /// Gram matrix `selfᵀ * self`, (m x n) -> (n x n).
    pub fn gram(&self) -> Dense {
        self.transpose_matmul(self)
    }
}

/// Dot product of two equal-length slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

// =============================================================================
// UserItemMatrix
// =============================================================================

/// The dense user-by-item rating matrix built from the training split.
///
/// Rows are the distinct training user ids, columns the distinct training
/// item ids, both in ascending order. Cells hold the rating, or 0.0 when
/// the user did not rate the item in the training split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserItemMatrix {
    user_ids: Vec<UserId>,
    item_ids: Vec<ItemId>,
    user_index: HashMap<UserId, usize>,
    item_index: HashMap<ItemId, usize>,
    values: Dense,
}

impl UserItemMatrix {
    /// Pivot training ratings into the dense matrix.
    ///
    /// Deterministic: ids are sorted, and each (user, item) pair is
    /// assumed to carry at most one rating as the dataset provides.
    pub fn from_ratings(train: &[Rating]) -> Self {
        let user_ids: Vec<UserId> = train
            .iter()
            .map(|r| r.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let item_ids: Vec<ItemId> = train
            .iter()
            .map(|r| r.item_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_index: HashMap<UserId, usize> =
            user_ids.iter().enumerate().map(|(i, &u)| (u, i)).collect();
        let item_index: HashMap<ItemId, usize> =
            item_ids.iter().enumerate().map(|(i, &m)| (m, i)).collect();

        let mut values = Dense::zeros(user_ids.len(), item_ids.len());
        for r in train {
            let row = user_index[&r.user_id];
            let col = item_index[&r.item_id];
            values.set(row, col, r.rating as f64);
        }

        Self {
            user_ids,
            item_ids,
            user_index,
            item_index,
            values,
        }
    }

    pub fn n_users(&self) -> usize {
        self.user_ids.len()
    }

    pub fn n_items(&self) -> usize {
        self.item_ids.len()
    }

    /// Matrix position of a user, or None if unseen in training.
    pub fn user_pos(&self, user_id: UserId) -> Option<usize> {
        self.user_index.get(&user_id).copied()
    }

    /// Matrix position of an item, or None if unseen in training.
    pub fn item_pos(&self, item_id: ItemId) -> Option<usize> {
        self.item_index.get(&item_id).copied()
    }

    /// One user's rating vector over all training items.
    pub fn user_row(&self, pos: usize) -> &[f64] {
        self.values.row(pos)
    }

    /// One item's rating vector over all training users (copied out).
    pub fn item_column(&self, pos: usize) -> Vec<f64> {
        self.values.column(pos)
    }

    pub fn values(&self) -> &Dense {
        &self.values
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: UserId, item_id: ItemId, rating: u8) -> Rating {
        Rating {
            user_id,
            item_id,
            rating,
            timestamp: 0,
        }
    }

    #[test]
    fn pivots_ratings_with_zero_for_missing() {
        let train = vec![rating(2, 10, 4), rating(1, 20, 5), rating(1, 10, 3)];
        let matrix = UserItemMatrix::from_ratings(&train);

        assert_eq!(matrix.user_ids(), &[1, 2]);
        assert_eq!(matrix.item_ids(), &[10, 20]);
        assert_eq!(matrix.user_row(0), &[3.0, 5.0]);
        assert_eq!(matrix.user_row(1), &[4.0, 0.0]);
        assert_eq!(matrix.item_column(0), vec![3.0, 4.0]);
    }

    #[test]
    fn index_sets_are_exactly_the_training_ids() {
        let train = vec![rating(7, 3, 1), rating(7, 9, 2)];
        let matrix = UserItemMatrix::from_ratings(&train);

        assert_eq!(matrix.n_users(), 1);
        assert_eq!(matrix.n_items(), 2);
        assert_eq!(matrix.user_pos(7), Some(0));
        assert_eq!(matrix.user_pos(1), None);
        assert_eq!(matrix.item_pos(9), Some(1));
        assert_eq!(matrix.item_pos(4), None);
    }

    #[test]
    fn dense_matmul_small() {
        let a = Dense::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Dense::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = a.matmul(&b);
        assert_eq!(c.row(0), &[58.0, 64.0]);
        assert_eq!(c.row(1), &[139.0, 154.0]);
    }

    #[test]
    fn dense_transpose_matmul_matches_explicit_transpose() {
        let a = Dense::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x = Dense::from_vec(3, 2, vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let fast = a.transpose_matmul(&x);
        let slow = a.transpose().matmul(&x);
        assert_eq!(fast, slow);
    }

    #[test]
    fn gram_is_symmetric() {
        let a = Dense::from_vec(3, 2, vec![1.0, 2.0, 0.0, 1.0, 4.0, 3.0]);
        let g = a.gram();
        assert_eq!(g.rows(), 2);
        assert_eq!(g.cols(), 2);
        assert!((g.get(0, 1) - g.get(1, 0)).abs() < 1e-12);
    }
}
