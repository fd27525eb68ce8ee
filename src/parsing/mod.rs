//! Readers that turn raw game records into normalized move sequences.
//!
//! This module provides:
//!
//! - **Encoding detection**: decode bytes with the first of UTF-8, Shift_JIS,
//!   ASCII that accepts the whole record
//! - **Move extraction**: collect `;B[..]` / `;W[..]` nodes in document order,
//!   bounded by a move cutoff
//! - **Normalization**: lowercase coordinates and interpret them as board points
//!
//! ## Example
//!
//! ```rust,no_run
//! use kifu_finder::parsing::sgf::{parse_file, parse_record_text};
//! use std::path::Path;
//!
//! // Parse from a record file (plain or gzipped)
//! let moves = parse_file(Path::new("game.sgf"), 50).unwrap();
//!
//! // Or from text already in memory
//! let moves = parse_record_text("(;GM[1];B[pd];W[dp])", 50).unwrap();
//! assert_eq!(moves.len(), 2);
//! ```
//!
//! ## Recognized Nodes
//!
//! | Node      | Meaning |
//! |-----------|---------|
//! | `;B[pd]`  | Black plays at `pd` |
//! | `;W[PD]`  | White plays at `pd` (case-insensitive) |
//! | `;B[]`    | Black passes |
//! | `;W[tt]`  | White passes (FF[3] spelling) |
//!
//! Nodes are read in document order; variation structure, setup stones and
//! other properties are not interpreted.

pub mod encoding;
pub mod normalize;
pub mod sgf;
