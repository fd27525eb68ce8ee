//! Canonicalization of raw move nodes.
//!
//! Coordinates are compared case-insensitively by lowercasing them before
//! they are interpreted, so `;B[PD]` and `;B[pd]` become the same move.

use crate::core::sequence::MoveSequence;
use crate::core::types::{Color, Move, Point};
use crate::parsing::sgf::{ParseError, RawMove};

/// Pass spelling used by FF[3] records on 19x19 boards
const LEGACY_PASS: &str = "tt";

impl RawMove {
    /// Copy with the coordinate body lowercased; color and pass marker kept
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            color: self.color,
            body: self.body.to_ascii_lowercase(),
        }
    }

    /// Interpret a normalized node as a typed move
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidCoordinate` if the color is not `B`/`W` or
    /// the body is neither empty, `tt`, nor two letters in `a..=s`.
    pub fn to_move(&self) -> Result<Move, ParseError> {
        let color =
            Color::from_letter(self.color).ok_or_else(|| ParseError::InvalidCoordinate(self.to_string()))?;

        if self.body.is_empty() || self.body == LEGACY_PASS {
            return Ok(Move::Pass { color });
        }

        let mut letters = self.body.chars();
        match (letters.next(), letters.next(), letters.next()) {
            (Some(x), Some(y), None) => Point::from_letters(x, y)
                .map(|point| Move::Stone { color, point })
                .ok_or_else(|| ParseError::InvalidCoordinate(self.to_string())),
            _ => Err(ParseError::InvalidCoordinate(self.to_string())),
        }
    }
}

/// Normalize raw nodes into a move sequence of at most `max_moves` moves
///
/// # Errors
///
/// Returns `ParseError::InvalidCoordinate` for the first node that does not
/// name a point on the 19x19 board.
pub fn normalize_moves(tokens: &[RawMove], max_moves: usize) -> Result<MoveSequence, ParseError> {
    let moves = tokens
        .iter()
        .take(max_moves)
        .map(|token| token.normalized().to_move())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MoveSequence::with_limit(moves, max_moves))
}
