//! # kifu-finder
//!
//! A library for finding Go game records with a similar opening.
//!
//! Game collections often contain the same opening many times over, but
//! rotated, mirrored, or with the players' roles exchanged. A plain text
//! comparison of two SGF files misses all of these.
//!
//! `kifu-finder` solves this by expanding a query record into every
//! symmetry-equivalent rendering and scoring each against a database of
//! records with a weighted edit distance over the opening moves.
//!
//! ## Features
//!
//! - **Symmetry invariance**: all 8 board symmetries, each with and without a
//!   color exchange
//! - **Weighted edit distance**: tolerant of records of different length,
//!   strict about differing stones
//! - **Encoding detection**: UTF-8, Shift_JIS and ASCII records
//! - **Robust database builds**: unreadable records are skipped and reported
//!
//! ## Example
//!
//! ```rust,no_run
//! use kifu_finder::{DatabaseEntry, GameDatabase, MatchingEngine};
//! use kifu_finder::parsing::sgf::parse_record_text;
//!
//! let database = GameDatabase::from_entries(vec![
//!     DatabaseEntry::new("a.sgf", parse_record_text("(;B[pd];W[dd])", 50).unwrap()),
//!     DatabaseEntry::new("b.sgf", parse_record_text("(;B[dp];W[pp])", 50).unwrap()),
//! ]);
//!
//! let query = parse_record_text("(;B[pd];W[dd])", 50).unwrap();
//! let engine = MatchingEngine::new(&database);
//!
//! for row in engine.find_matches(&query, 10) {
//!     println!("{}: {:.1}", row.id, row.score);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Moves, sequences, and database entries
//! - [`parsing`]: Record decoding, move extraction, and normalization
//! - [`matching`]: Symmetry expansion, scoring, and ranking
//! - [`database`]: Building the record database
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for browser-based search

pub mod cli;
pub mod core;
pub mod database;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use core::entry::DatabaseEntry;
pub use core::sequence::MoveSequence;
pub use core::types::*;
pub use database::store::GameDatabase;
pub use matching::engine::{MatchingConfig, MatchingEngine, ScoreRow};
pub use parsing::sgf::ParseError;
