//! Character-set detection for raw record bytes.
//!
//! Records collected from Go servers and books are usually UTF-8, but older
//! Japanese archives are commonly Shift-JIS. The decoder tries a fixed list of
//! candidates in order and keeps the first one that decodes the whole input
//! cleanly.

use encoding_rs::SHIFT_JIS;

use crate::parsing::sgf::ParseError;

/// Character encodings a record may be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    ShiftJis,
    Ascii,
}

/// Candidate encodings, in the order they are tried
pub const DEFAULT_CANDIDATES: [TextEncoding; 3] =
    [TextEncoding::Utf8, TextEncoding::ShiftJis, TextEncoding::Ascii];

impl TextEncoding {
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::ShiftJis => "Shift_JIS",
            Self::Ascii => "ASCII",
        }
    }

    /// Decode the full input, or `None` if any byte sequence is invalid
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            Self::ShiftJis => SHIFT_JIS
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(std::borrow::Cow::into_owned),
            Self::Ascii => bytes
                .is_ascii()
                .then(|| String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Decode `bytes` with the first candidate that accepts all of it
///
/// `source` names the record in the error message.
///
/// # Errors
///
/// Returns `ParseError::UnreadableEncoding` if no candidate decodes the input.
pub fn decode_with(
    bytes: &[u8],
    candidates: &[TextEncoding],
    source: &str,
) -> Result<(String, TextEncoding), ParseError> {
    candidates
        .iter()
        .find_map(|&encoding| encoding.decode(bytes).map(|text| (text, encoding)))
        .ok_or_else(|| ParseError::UnreadableEncoding(source.to_string()))
}

/// Decode `bytes` using [`DEFAULT_CANDIDATES`]
///
/// # Errors
///
/// Returns `ParseError::UnreadableEncoding` if no candidate decodes the input.
pub fn decode(bytes: &[u8], source: &str) -> Result<(String, TextEncoding), ParseError> {
    decode_with(bytes, &DEFAULT_CANDIDATES, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_first() {
        let (text, encoding) = decode("(;PB[本因坊秀策];B[pd])".as_bytes(), "test").unwrap();
        assert_eq!(encoding, TextEncoding::Utf8);
        assert!(text.contains("秀策"));
    }

    #[test]
    fn test_decode_falls_back_to_shift_jis() {
        // "秀策" in Shift_JIS; not valid UTF-8
        let mut bytes = b"(;PB[".to_vec();
        bytes.extend_from_slice(&[0x8F, 0x47, 0x8D, 0xF4]);
        bytes.extend_from_slice(b"];B[pd])");

        let (text, encoding) = decode(&bytes, "test").unwrap();
        assert_eq!(encoding, TextEncoding::ShiftJis);
        assert!(text.contains("秀策"));
        assert!(text.ends_with(";B[pd])"));
    }

    #[test]
    fn test_decode_unreadable() {
        // 0xFF is invalid in both UTF-8 and Shift_JIS, and is not ASCII
        let result = decode(&[b'(', b';', 0xFF, 0xFF, b')'], "bad.sgf");
        match result {
            Err(ParseError::UnreadableEncoding(source)) => assert_eq!(source, "bad.sgf"),
            other => panic!("Expected UnreadableEncoding, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_with_ascii_only() {
        assert!(decode_with("é".as_bytes(), &[TextEncoding::Ascii], "x").is_err());
        let (text, encoding) = decode_with(b";B[pd]", &[TextEncoding::Ascii], "x").unwrap();
        assert_eq!(encoding, TextEncoding::Ascii);
        assert_eq!(text, ";B[pd]");
    }
}
