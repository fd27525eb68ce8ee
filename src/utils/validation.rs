//! Centralized validation of uploaded records and request parameters.

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MIN_FILE_CONTENT_SIZE: usize = 1;

/// Largest record accepted over HTTP (`DoS` protection)
pub const MAX_RECORD_SIZE: usize = 4 * 1024 * 1024; // 4MB

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
    #[error("File content appears malformed or invalid")]
    InvalidFileContent,
    #[error("File exceeds maximum size of {MAX_RECORD_SIZE} bytes")]
    FileTooLarge,
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    // Prevent directory traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    // Keep only safe characters; record names are often Japanese, so any
    // alphanumeric character is allowed, not just ASCII
    let sanitized = filename
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>();

    if sanitized.trim().is_empty() {
        return Err(ValidationError::InvalidFilename);
    }

    // Prevent hidden files (starting with .) unless it's a known extension
    if sanitized.starts_with('.') && !has_known_extension(&sanitized) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Check if filename has a known record extension
fn has_known_extension(filename: &str) -> bool {
    let safe_extensions = [".sgf", ".sgf.gz", ".txt"];

    safe_extensions
        .iter()
        .any(|ext| filename.to_lowercase().ends_with(ext))
}

/// Validate that uploaded record bytes look like a text record
///
/// Records may be in any supported character set, so only size and the
/// absence of NUL bytes (a sign of binary content) are checked here.
///
/// # Errors
///
/// Returns `ValidationError::InvalidFileContent` if the content is empty or
/// binary, or `ValidationError::FileTooLarge` if it exceeds the size limit.
pub fn validate_record_content(content: &[u8]) -> Result<(), ValidationError> {
    if content.len() < MIN_FILE_CONTENT_SIZE {
        return Err(ValidationError::InvalidFileContent);
    }

    if content.len() > MAX_RECORD_SIZE {
        return Err(ValidationError::FileTooLarge);
    }

    if content.contains(&0) {
        return Err(ValidationError::InvalidFileContent);
    }

    Ok(())
}

/// Complete validation of an uploaded record
///
/// # Errors
///
/// Returns a `ValidationError` if filename validation or content validation
/// fails.
pub fn validate_upload(
    filename: Option<&str>,
    content: &[u8],
) -> Result<Option<String>, ValidationError> {
    let validated_filename = filename.map(validate_filename).transpose()?;
    validate_record_content(content)?;
    Ok(validated_filename)
}

/// Clamp a requested move count to `1..=ceiling`
#[must_use]
pub fn clamp_move_count(requested: usize, ceiling: usize) -> usize {
    requested.clamp(1, ceiling.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_safe() {
        assert!(validate_filename("game.sgf").is_ok());
        assert!(validate_filename("my-game_01.sgf").is_ok());
        assert!(validate_filename("1846 ear-reddening game.sgf").is_ok());
        assert_eq!(validate_filename("耳赤の一局.sgf").unwrap(), "耳赤の一局.sgf");
    }

    #[test]
    fn test_validate_filename_dangerous() {
        // Directory traversal attempts
        assert!(validate_filename("../etc/passwd").is_err());
        assert!(validate_filename("..\\windows\\system32").is_err());
        assert!(validate_filename("games/../../secret").is_err());

        // Null bytes and control characters
        assert!(validate_filename("test\0.sgf").is_err());
        assert!(validate_filename("test\x01.sgf").is_err());

        // Too long filename
        let long_name = "a".repeat(300);
        assert!(matches!(
            validate_filename(&long_name),
            Err(ValidationError::FilenameTooLong)
        ));

        // Empty or whitespace-only
        assert!(matches!(
            validate_filename(""),
            Err(ValidationError::EmptyFilename)
        ));
        assert!(validate_filename("   ").is_err());

        // Hidden files without known extensions
        assert!(validate_filename(".hidden").is_err());
    }

    #[test]
    fn test_validate_filename_sanitization() {
        let result = validate_filename("game@#$%1.sgf").unwrap();
        assert_eq!(result, "game1.sgf");
    }

    #[test]
    fn test_has_known_extension() {
        assert!(has_known_extension(".sgf"));
        assert!(has_known_extension("archive.SGF.GZ"));
        assert!(!has_known_extension(".exe"));
        assert!(!has_known_extension(".hidden"));
    }

    #[test]
    fn test_validate_record_content() {
        assert!(validate_record_content(b"(;B[pd])").is_ok());
        // Shift_JIS bytes are not ASCII but still valid
        assert!(validate_record_content(&[b'(', 0x8F, 0x47, b')']).is_ok());

        assert!(validate_record_content(b"").is_err());
        assert!(validate_record_content(b"(;B[pd]\0)").is_err());

        let too_large = vec![b'a'; MAX_RECORD_SIZE + 1];
        assert!(matches!(
            validate_record_content(&too_large),
            Err(ValidationError::FileTooLarge)
        ));
    }

    #[test]
    fn test_validate_upload_complete() {
        let content = b"(;B[pd];W[dd])";

        let result = validate_upload(Some("query.sgf"), content);
        assert_eq!(result.unwrap().as_deref(), Some("query.sgf"));

        assert!(validate_upload(None, content).unwrap().is_none());
        assert!(validate_upload(Some("../etc/passwd"), content).is_err());
        assert!(validate_upload(Some("query.sgf"), b"").is_err());
    }

    #[test]
    fn test_clamp_move_count() {
        assert_eq!(clamp_move_count(0, 500), 1);
        assert_eq!(clamp_move_count(50, 500), 50);
        assert_eq!(clamp_move_count(900, 500), 500);
        assert_eq!(clamp_move_count(10, 0), 1);
    }
}
