use std::sync::OnceLock;

use regex::Regex;
use validator::ValidationError;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,80}$").expect("username pattern is valid"))
}

/// Usernames are 3-80 characters of letters, digits, `_`, `.` or `-`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username_pattern().is_match(username) {
        Ok(())
    } else {
        let mut error = ValidationError::new("username");
        error.message = Some("Username must be 3-80 letters, digits, '_', '.' or '-'".into());
        Err(error)
    }
}

/// Names are stored trimmed, so whitespace alone counts as empty.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Value must not be blank".into());
        return Err(error);
    }
    Ok(())
}
