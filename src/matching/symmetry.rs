//! Symmetry-equivalent renderings of a move sequence.
//!
//! Two openings are "the same game" to a reviewer when one is a rotation or
//! mirror image of the other, or when the players' roles are exchanged. A
//! query is expanded into all 16 such variants before scoring, so the best
//! score against any of them is invariant under these symmetries.

use serde::Serialize;

use crate::core::sequence::MoveSequence;
use crate::core::types::Point;

/// One of the 8 symmetries of the square board
///
/// Reflections are applied first, then the optional transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Transform {
    pub reflect_x: bool,
    pub reflect_y: bool,
    pub transpose: bool,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        reflect_x: false,
        reflect_y: false,
        transpose: false,
    };

    /// All 8 board symmetries, identity first
    pub const ALL: [Self; 8] = [
        Self::new(false, false, false),
        Self::new(false, false, true),
        Self::new(false, true, false),
        Self::new(false, true, true),
        Self::new(true, false, false),
        Self::new(true, false, true),
        Self::new(true, true, false),
        Self::new(true, true, true),
    ];

    #[must_use]
    pub const fn new(reflect_x: bool, reflect_y: bool, transpose: bool) -> Self {
        Self {
            reflect_x,
            reflect_y,
            transpose,
        }
    }

    /// Map a point through this symmetry
    #[must_use]
    pub fn apply(self, point: Point) -> Point {
        let mut p = point;
        if self.reflect_x {
            p = p.reflect_x();
        }
        if self.reflect_y {
            p = p.reflect_y();
        }
        if self.transpose {
            p = p.transpose();
        }
        p
    }

    /// Map a coordinate; passes map to themselves
    #[must_use]
    pub fn apply_coord(self, coord: Option<Point>) -> Option<Point> {
        coord.map(|p| self.apply(p))
    }

    /// Short label, e.g. `identity`, `x`, `xy+t`
    #[must_use]
    pub fn label(self) -> String {
        let mut label = String::new();
        if self.reflect_x {
            label.push('x');
        }
        if self.reflect_y {
            label.push('y');
        }
        if self.transpose {
            if !label.is_empty() {
                label.push('+');
            }
            label.push('t');
        }
        if label.is_empty() {
            label.push_str("identity");
        }
        label
    }
}

/// A query rendering under one board symmetry and color assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymmetryVariant {
    pub transform: Transform,
    /// Whether the players' moves were exchanged
    pub color_swapped: bool,
    pub moves: MoveSequence,
}

impl SymmetryVariant {
    /// Human-readable label, e.g. `x+t` or `xy (colors swapped)`
    #[must_use]
    pub fn label(&self) -> String {
        if self.color_swapped {
            format!("{} (colors swapped)", self.transform.label())
        } else {
            self.transform.label()
        }
    }
}

/// Exchange the first and second player's coordinates
///
/// Each coordinate trades places with its turn partner (0 with 1, 2 with 3,
/// and so on). Odd-length input is first padded with a pass so every move
/// has a partner; the returned working stream is therefore always even in
/// length.
#[must_use]
pub fn exchange_colors(coords: &[Option<Point>]) -> Vec<Option<Point>> {
    let mut padded = coords.to_vec();
    if padded.len() % 2 != 0 {
        padded.push(None);
    }

    (0..padded.len()).map(|i| padded[i ^ 1]).collect()
}

/// Apply every board symmetry to one coordinate stream
fn geometric_variants(coords: &[Option<Point>], color_swapped: bool) -> Vec<SymmetryVariant> {
    Transform::ALL
        .iter()
        .map(|&transform| {
            let mapped: Vec<Option<Point>> =
                coords.iter().map(|&c| transform.apply_coord(c)).collect();
            SymmetryVariant {
                transform,
                color_swapped,
                moves: MoveSequence::from_points(&mapped),
            }
        })
        .collect()
}

/// Expand a sequence into its 16 symmetry variants
///
/// The first 8 variants keep the original turn order, the last 8 exchange
/// the players. Within each half the order follows [`Transform::ALL`]. Colors
/// are reassigned by position (Black on even indices), and the exchanged
/// stream is trimmed back to the input length.
#[must_use]
pub fn expand(sequence: &MoveSequence) -> Vec<SymmetryVariant> {
    let coords = sequence.points();
    let mut exchanged = exchange_colors(&coords);
    exchanged.truncate(coords.len());

    let mut variants = geometric_variants(&coords, false);
    variants.extend(geometric_variants(&exchanged, true));
    variants
}
