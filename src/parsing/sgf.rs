use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::core::sequence::MoveSequence;
use crate::parsing::encoding;
use crate::parsing::normalize::normalize_moves;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found: {}", .0.display())]
    RecordNotFound(PathBuf),

    #[error("Unable to determine character encoding of {0}")]
    UnreadableEncoding(String),

    #[error("Invalid move coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A move node as it appears in the record text, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMove {
    /// Property letter, `B` or `W`
    pub color: char,
    /// Bracket body: empty for a pass, otherwise two letters in any case
    pub body: String,
}

impl RawMove {
    pub fn new(color: char, body: impl Into<String>) -> Self {
        Self {
            color,
            body: body.into(),
        }
    }
}

impl std::fmt::Display for RawMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ";{}[{}]", self.color, self.body)
    }
}

#[allow(clippy::missing_panics_doc)] // Pattern is a constant
fn move_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r";([BW])\[((?:[a-zA-Z]{2})?)\]").expect("move pattern is a valid regex")
    })
}

/// Extract move nodes from record text, in document order
///
/// Only `;B[xy]`, `;W[xy]`, `;B[]` and `;W[]` nodes are recognized; any other
/// bracket content (comments, setup stones, labels) is ignored. Lines stop
/// being read once more than `max_moves` nodes have been collected, and the
/// result is truncated to at most `max_moves` entries.
#[must_use]
pub fn extract_move_tokens(text: &str, max_moves: usize) -> Vec<RawMove> {
    let pattern = move_pattern();
    let mut tokens = Vec::new();

    for line in text.lines() {
        tokens.extend(
            pattern
                .captures_iter(line)
                .map(|cap| RawMove::new(cap[1].chars().next().unwrap_or('B'), &cap[2])),
        );

        if tokens.len() > max_moves {
            break;
        }
    }

    tokens.truncate(max_moves);
    tokens
}

/// Parse the opening of a record from decoded text
///
/// A record without any move nodes yields an empty sequence, not an error.
///
/// # Errors
///
/// Returns `ParseError::InvalidCoordinate` if a move names a point off the
/// 19x19 board.
pub fn parse_record_text(text: &str, max_moves: usize) -> Result<MoveSequence, ParseError> {
    let tokens = extract_move_tokens(text, max_moves);
    normalize_moves(&tokens, max_moves)
}

/// Decode raw record bytes and parse the opening
///
/// `source` names the record in error messages.
///
/// # Errors
///
/// Returns `ParseError::UnreadableEncoding` if the bytes cannot be decoded, or
/// `ParseError::InvalidCoordinate` for off-board moves.
pub fn parse_record_bytes(
    bytes: &[u8],
    max_moves: usize,
    source: &str,
) -> Result<MoveSequence, ParseError> {
    let (text, detected) = encoding::decode(bytes, source)?;
    debug!(record = source, encoding = detected.display_name(), "Decoded record");
    parse_record_text(&text, max_moves)
}

/// Read a record file from disk and parse its opening
///
/// Gzip-compressed records (`.sgf.gz`) are decompressed transparently.
///
/// # Errors
///
/// Returns `ParseError::RecordNotFound` if the path does not resolve to a
/// file, `ParseError::Io` if it cannot be read, and the errors of
/// [`parse_record_bytes`] otherwise.
pub fn parse_file(path: &Path, max_moves: usize) -> Result<MoveSequence, ParseError> {
    let bytes = read_record_bytes(path)?;
    parse_record_bytes(&bytes, max_moves, &path.display().to_string())
}

/// Read the raw bytes of a record, decompressing gzip input
///
/// # Errors
///
/// Returns `ParseError::RecordNotFound` if the path is not a file, or
/// `ParseError::Io` on read or decompression failure.
pub fn read_record_bytes(path: &Path) -> Result<Vec<u8>, ParseError> {
    if !path.is_file() {
        return Err(ParseError::RecordNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoder = flate2::read::MultiGzDecoder::new(bytes.as_slice());
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        return Ok(decompressed);
    }

    Ok(bytes)
}
