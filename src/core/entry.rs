use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::sequence::MoveSequence;
use crate::core::types::EntryId;

/// A stored game record: its identifier, where it came from, and its opening
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    /// Stable identifier (the file name for records read from disk)
    pub id: EntryId,

    /// Originating file, if the record was read from disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Normalized opening moves, bounded by the database's move cutoff
    pub moves: MoveSequence,
}

impl DatabaseEntry {
    pub fn new(id: impl Into<String>, moves: MoveSequence) -> Self {
        Self {
            id: EntryId::new(id),
            path: None,
            moves,
        }
    }

    /// Entry for a record file; the identifier is the file name
    pub fn from_path(path: &Path, moves: MoveSequence) -> Self {
        let id = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        Self {
            id: EntryId(id),
            path: Some(path.to_path_buf()),
            moves,
        }
    }
}
