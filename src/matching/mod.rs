//! Game-record matching engine and scoring algorithms.
//!
//! This module provides the core matching functionality:
//!
//! - [`symmetry`]: the 16 board-symmetry and color-exchange variants of a query
//! - [`scoring`]: weighted edit-distance similarity between move sequences
//! - [`engine::MatchingEngine`]: max-over-variants aggregation and ranking
//!
//! ## Matching Algorithm
//!
//! 1. **Expand**: the query opening is rendered under the 8 symmetries of the
//!    square board, for both the original and the exchanged player order
//! 2. **Score**: every variant is compared with every database sequence
//! 3. **Aggregate**: an entry's score is the best score of any variant
//! 4. **Rank**: entries are sorted by score, ties keeping database order
//!
//! ## Scoring
//!
//! Moves are compared as whole tokens (color and point). The edit distance
//! charges 3 for a move only the database record has, 1 for a move only the
//! query has, and 3 for a differing move, then normalizes by the largest
//! distance possible for the two lengths.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kifu_finder::{GameDatabase, MatchingConfig, MatchingEngine};
//! use kifu_finder::parsing::sgf::parse_file;
//! use std::path::Path;
//!
//! let config = MatchingConfig { max_moves: 50, result_limit: 10 };
//! let database = GameDatabase::load_dir(Path::new("database"), config.max_moves).unwrap();
//! let query = parse_file(Path::new("query.sgf"), config.max_moves).unwrap();
//!
//! let engine = MatchingEngine::with_config(&database, config);
//! for row in engine.find_top_matches(&query) {
//!     println!("{}: {:.1}", row.id, row.score);
//! }
//! ```

pub mod engine;
pub mod scoring;
pub mod symmetry;
