use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password must be at least {0} characters long")]
    TooShort(usize),
    #[error("Password must be no more than {0} characters long")]
    TooLong(usize),
    #[error("Password must contain at least one letter")]
    NoLetter,
    #[error("Password must contain at least one number")]
    NoNumber,
    #[error("Failed to hash password")]
    HashingFailed,
    #[error("Failed to verify password")]
    VerificationFailed,
}

impl PasswordError {
    /// True when the password itself was rejected, as opposed to a bcrypt failure.
    pub fn is_policy_violation(&self) -> bool {
        !matches!(self, PasswordError::HashingFailed | PasswordError::VerificationFailed)
    }
}

/// Password strength requirements
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_letter: bool,
    pub require_number: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            // bcrypt only looks at the first 72 bytes
            max_length: 72,
            require_letter: true,
            require_number: true,
        }
    }
}

/// Validate password strength according to policy
pub fn validate_password_strength(password: &str, policy: &PasswordPolicy) -> Result<(), PasswordError> {
    let length = password.chars().count();
    if length < policy.min_length {
        return Err(PasswordError::TooShort(policy.min_length));
    }

    if password.len() > policy.max_length {
        return Err(PasswordError::TooLong(policy.max_length));
    }

    if policy.require_letter && !password.chars().any(char::is_alphabetic) {
        return Err(PasswordError::NoLetter);
    }

    if policy.require_number && !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::NoNumber);
    }

    Ok(())
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password_strength(password, &PasswordPolicy::default())?;

    hash(password, DEFAULT_COST).map_err(|_| PasswordError::HashingFailed)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    verify(password, hash).map_err(|_| PasswordError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_password_validation() {
        let policy = PasswordPolicy::default();

        assert_matches!(
            validate_password_strength("short1", &policy),
            Err(PasswordError::TooShort(8))
        );
        assert_matches!(
            validate_password_strength("12345678", &policy),
            Err(PasswordError::NoLetter)
        );
        assert_matches!(
            validate_password_strength("password", &policy),
            Err(PasswordError::NoNumber)
        );
        assert_matches!(
            validate_password_strength(&"a1".repeat(40), &policy),
            Err(PasswordError::TooLong(72))
        );

        assert!(validate_password_strength("squat2024", &policy).is_ok());
    }

    #[test]
    fn test_password_hashing() {
        let password = "deadlift123";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("deadlift124", &hash).unwrap());
    }

    #[test]
    fn test_hash_rejects_weak_password() {
        let err = hash_password("weak").unwrap_err();
        assert!(err.is_policy_violation());
    }

    #[test]
    fn test_verify_against_garbage_hash_fails() {
        let err = verify_password("anything1", "not-a-bcrypt-hash").unwrap_err();
        assert!(!err.is_policy_violation());
    }
}
