use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::entry::DatabaseEntry;
use crate::core::types::EntryId;
use crate::parsing::sgf::{parse_file, parse_record_bytes};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to read database directory: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Database path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// A record that could not be read while building the database
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub source: String,
    pub reason: String,
}

/// The fixed set of records one matching run compares against
#[derive(Debug, Clone, Default)]
pub struct GameDatabase {
    /// Entries in load order
    entries: Vec<DatabaseEntry>,

    /// Index: entry ID -> index in entries vec
    id_to_index: HashMap<EntryId, usize>,

    /// Records that failed to load
    skipped: Vec<SkippedRecord>,
}

impl GameDatabase {
    /// Build a database from already-parsed entries
    pub fn from_entries(entries: Vec<DatabaseEntry>) -> Self {
        let mut database = Self::default();
        for entry in entries {
            database.add_entry(entry);
        }
        database
    }

    /// Read every record file, keeping the first `max_moves` moves of each
    ///
    /// Records that cannot be read are logged and skipped; the rest keep the
    /// order of `paths`.
    pub fn from_paths(paths: &[PathBuf], max_moves: usize) -> Self {
        let mut database = Self::default();

        for path in paths {
            match parse_file(path, max_moves) {
                Ok(moves) => database.add_entry(DatabaseEntry::from_path(path, moves)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable record");
                    database.skipped.push(SkippedRecord {
                        source: path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            entries = database.len(),
            skipped = database.skipped.len(),
            max_moves,
            "Built game database"
        );
        database
    }

    /// Build a database from in-memory records given as `(name, bytes)` pairs
    pub fn from_records<'b>(
        records: impl IntoIterator<Item = (String, &'b [u8])>,
        max_moves: usize,
    ) -> Self {
        let mut database = Self::default();

        for (name, bytes) in records {
            match parse_record_bytes(bytes, max_moves, &name) {
                Ok(moves) => database.add_entry(DatabaseEntry::new(name, moves)),
                Err(e) => {
                    warn!(record = %name, error = %e, "Skipping unreadable record");
                    database.skipped.push(SkippedRecord {
                        source: name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        database
    }

    /// Load every record file in a directory, in file-name order
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotADirectory` if `dir` is not a directory, or
    /// `DatabaseError::ReadError` if it cannot be listed. Individual
    /// unreadable records are skipped, not reported as errors.
    pub fn load_dir(dir: &Path, max_moves: usize) -> Result<Self, DatabaseError> {
        let paths = list_record_paths(dir)?;
        Ok(Self::from_paths(&paths, max_moves))
    }

    fn add_entry(&mut self, entry: DatabaseEntry) {
        let index = self.entries.len();
        self.id_to_index.entry(entry.id.clone()).or_insert(index);
        self.entries.push(entry);
    }

    /// Copy of the database with every sequence cut to `max_moves`
    #[must_use]
    pub fn truncated(&self, max_moves: usize) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|entry| DatabaseEntry {
                moves: entry.moves.truncated(max_moves),
                ..entry.clone()
            })
            .collect();

        let mut database = Self::from_entries(entries);
        database.skipped.clone_from(&self.skipped);
        database
    }

    pub fn entries(&self) -> &[DatabaseEntry] {
        &self.entries
    }

    /// Get an entry by ID (the first one, if names repeat)
    pub fn get(&self, id: &EntryId) -> Option<&DatabaseEntry> {
        self.id_to_index.get(id).map(|&idx| &self.entries[idx])
    }

    /// Records that could not be read
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Number of entries in the database
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the database is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// List the regular, non-hidden files of a directory sorted by file name
///
/// # Errors
///
/// Returns `DatabaseError::NotADirectory` if `dir` is not a directory, or
/// `DatabaseError::ReadError` if it cannot be listed.
pub fn list_record_paths(dir: &Path) -> Result<Vec<PathBuf>, DatabaseError> {
    if !dir.is_dir() {
        return Err(DatabaseError::NotADirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        if path.is_file() && !hidden {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_dir_sorted_and_skips_bad_records() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.sgf", b"(;B[dp];W[pd])");
        write(dir.path(), "a.sgf", b"(;B[pd])");
        write(dir.path(), "c.sgf", &[b'(', b';', 0xFF, 0xFE, b')']);
        write(dir.path(), ".hidden", b"(;B[aa])");

        let database = GameDatabase::load_dir(dir.path(), 10).unwrap();
        let ids: Vec<&str> = database.entries().iter().map(|e| e.id.0.as_str()).collect();
        assert_eq!(ids, vec!["a.sgf", "b.sgf"]);

        assert_eq!(database.skipped().len(), 1);
        assert!(database.skipped()[0].source.ends_with("c.sgf"));
    }

    #[test]
    fn test_from_paths_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.sgf", b"(;B[pd])");
        let missing = dir.path().join("missing.sgf");

        let database = GameDatabase::from_paths(&[missing, good], 10);
        assert_eq!(database.len(), 1);
        assert_eq!(database.skipped().len(), 1);
        assert!(database.skipped()[0].reason.contains("not found"));
    }

    #[test]
    fn test_load_dir_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "a.sgf", b"(;B[pd])");
        assert!(matches!(
            GameDatabase::load_dir(&file, 10),
            Err(DatabaseError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_from_records_and_get() {
        let records = vec![
            ("one.sgf".to_string(), b"(;B[pd];W[dd])".as_slice()),
            ("two.sgf".to_string(), b"(;B[qq])".as_slice()),
        ];
        let database = GameDatabase::from_records(records, 1);
        assert_eq!(database.len(), 2);

        let one = database.get(&EntryId::new("one.sgf")).unwrap();
        assert_eq!(one.moves.to_sgf_nodes(), ";B[pd]");
        assert!(database.get(&EntryId::new("three.sgf")).is_none());
    }

    #[test]
    fn test_truncated() {
        let records = vec![("one.sgf".to_string(), b"(;B[pd];W[dd];B[pp])".as_slice())];
        let database = GameDatabase::from_records(records, 10);
        let short = database.truncated(2);
        assert_eq!(short.entries()[0].moves.len(), 2);
        assert_eq!(database.entries()[0].moves.len(), 3);
    }
}
