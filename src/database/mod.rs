//! The database of stored game records.
//!
//! A database is built once per matching run from a directory of record
//! files (or from records already in memory) and is read-only afterwards.
//! Records that cannot be decoded or found are skipped and reported through
//! [`store::GameDatabase::skipped`] instead of aborting the build.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kifu_finder::GameDatabase;
//! use std::path::Path;
//!
//! let database = GameDatabase::load_dir(Path::new("database"), 50).unwrap();
//! for entry in database.entries() {
//!     println!("{}: {} moves", entry.id, entry.moves.len());
//! }
//! ```

pub mod store;
