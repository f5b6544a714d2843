use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for file extensions carried over into generated upload names
    /// - Valid: "png", "PDF", "tar", "mp4"
    /// - Invalid: "", "tar.gz", "../etc", "exe ", "averyveryverylongext"
    pub static ref FILE_EXTENSION_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{1,16}$").unwrap();
}

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_regex_valid() {
        assert!(FILE_EXTENSION_REGEX.is_match("png"));
        assert!(FILE_EXTENSION_REGEX.is_match("PDF"));
        assert!(FILE_EXTENSION_REGEX.is_match("mp4"));
        assert!(FILE_EXTENSION_REGEX.is_match("a"));
    }

    #[test]
    fn test_file_extension_regex_invalid() {
        assert!(!FILE_EXTENSION_REGEX.is_match("")); // empty
        assert!(!FILE_EXTENSION_REGEX.is_match("tar.gz")); // dot
        assert!(!FILE_EXTENSION_REGEX.is_match("../etc")); // traversal
        assert!(!FILE_EXTENSION_REGEX.is_match("exe ")); // space
        assert!(!FILE_EXTENSION_REGEX.is_match("averyveryverylongext")); // too long
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Ada").is_ok());
        assert!(validate_not_blank(" x ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }
}
