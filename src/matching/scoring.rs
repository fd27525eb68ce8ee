use serde::{Deserialize, Serialize};

use crate::core::sequence::MoveSequence;

/// Highest similarity score
pub const MAX_SCORE: f64 = 100.0;

/// Safely convert a weighted cell count to f64 for normalization
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Operation costs of the weighted edit distance
///
/// The distance transforms the first (query) sequence into the second
/// (database) one: an insertion adds a move present only in the database
/// sequence, a deletion drops a move present only in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditWeights {
    pub insertion: usize,
    pub deletion: usize,
    pub substitution: usize,
}

impl Default for EditWeights {
    fn default() -> Self {
        Self {
            insertion: 3,
            deletion: 1,
            substitution: 3,
        }
    }
}

/// Weighted edit distance between two token slices
///
/// Uses a single-row DP; space is `O(b.len())`.
pub fn weighted_distance<T: PartialEq>(a: &[T], b: &[T], weights: EditWeights) -> usize {
    let mut row: Vec<usize> = (0..=b.len()).map(|j| j * weights.insertion).collect();

    for (i, token_a) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = (i + 1) * weights.deletion;

        for (j, token_b) in b.iter().enumerate() {
            let substitution = if token_a == token_b {
                diagonal
            } else {
                diagonal + weights.substitution
            };
            let deletion = row[j + 1] + weights.deletion;
            let insertion = row[j] + weights.insertion;

            diagonal = row[j + 1];
            row[j + 1] = substitution.min(deletion).min(insertion);
        }
    }

    row[b.len()]
}

/// Largest weighted distance possible between sequences of these lengths
///
/// Either delete everything and insert everything, or substitute the
/// overlapping prefix and delete/insert the remainder, whichever is cheaper.
#[must_use]
pub fn max_weighted_distance(len_a: usize, len_b: usize, weights: EditWeights) -> usize {
    let replace_all = len_a * weights.deletion + len_b * weights.insertion;
    let substitute_overlap = if len_a >= len_b {
        len_b * weights.substitution + (len_a - len_b) * weights.deletion
    } else {
        len_a * weights.substitution + (len_b - len_a) * weights.insertion
    };
    replace_all.min(substitute_overlap)
}

/// Normalized similarity of two token slices in `[0, 100]`
pub fn similarity_with_weights<T: PartialEq>(a: &[T], b: &[T], weights: EditWeights) -> f64 {
    let maximum = max_weighted_distance(a.len(), b.len(), weights);
    if maximum == 0 {
        return MAX_SCORE;
    }

    let distance = weighted_distance(a, b, weights);
    MAX_SCORE * (1.0 - count_to_f64(distance) / count_to_f64(maximum))
}

/// Similarity of a query rendering against a database sequence, in `[0, 100]`
#[must_use]
pub fn similarity(query: &MoveSequence, candidate: &MoveSequence) -> f64 {
    similarity_with_weights(query.moves(), candidate.moves(), EditWeights::default())
}

/// Like [`similarity`], but `None` when the score falls below `cutoff`
#[must_use]
pub fn similarity_with_cutoff(
    query: &MoveSequence,
    candidate: &MoveSequence,
    cutoff: f64,
) -> Option<f64> {
    let score = similarity(query, candidate);
    (score >= cutoff).then_some(score)
}
