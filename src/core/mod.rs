//! Core data types for game-record matching.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`types::Color`], [`types::Point`], [`types::Move`]: a single move on the 19x19 board
//! - [`sequence::MoveSequence`]: the bounded opening of one record
//! - [`entry::DatabaseEntry`]: a stored record with its identifier
//!
//! ## Coordinates
//!
//! Points use SGF letter coordinates, one letter per axis:
//!
//! | Letters | Offset | Meaning |
//! |---------|--------|---------|
//! | `aa`    | (0, 0) | top-left corner |
//! | `pd`    | (15, 3) | upper-right star point |
//! | `ss`    | (18, 18) | bottom-right corner |
//! | (empty) | -      | pass |
//!
//! Letters are always lowercase once a record has been normalized.

pub mod entry;
pub mod sequence;
pub mod types;
