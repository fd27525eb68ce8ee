use serde::{Deserialize, Serialize};

use crate::core::types::{Color, Move, Point};

/// An ordered, immutable list of moves read from the main line of a record
///
/// Sequences are bounded by the move cutoff they were read with; use
/// [`MoveSequence::truncated`] to derive a shorter one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveSequence {
    moves: Vec<Move>,
}

impl MoveSequence {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    /// Build a sequence keeping at most `max_moves` leading moves
    pub fn with_limit(mut moves: Vec<Move>, max_moves: usize) -> Self {
        moves.truncate(max_moves);
        Self { moves }
    }

    /// Rebuild a sequence from bare coordinates, assigning Black to even
    /// positions and White to odd positions
    pub fn from_points(points: &[Option<Point>]) -> Self {
        let moves = points
            .iter()
            .enumerate()
            .map(|(i, point)| Move::new(Color::for_turn(i), *point))
            .collect();
        Self { moves }
    }

    /// Copy of this sequence limited to the first `max_moves` moves
    #[must_use]
    pub fn truncated(&self, max_moves: usize) -> Self {
        let end = self.moves.len().min(max_moves);
        Self::new(self.moves[..end].to_vec())
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Coordinates of every move in order (`None` for passes)
    #[must_use]
    pub fn points(&self) -> Vec<Option<Point>> {
        self.moves.iter().map(Move::point).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Render as concatenated SGF nodes, e.g. `;B[pd];W[dp]`
    #[must_use]
    pub fn to_sgf_nodes(&self) -> String {
        self.moves.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a MoveSequence {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
