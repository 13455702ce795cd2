//! Input validation utilities for the auth endpoints
use validator::ValidateEmail;

/// Validates email format according to RFC 5322
pub fn validate_email(email: &str) -> bool {
    email.validate_email()
}

/// Validates password strength
/// Requirements:
/// - Minimum 8 characters
/// - At least one letter and one number
pub fn validate_password(password: &str) -> bool {
    if password.len() < 8 {
        return false;
    }

    let has_alpha = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_numeric());

    has_alpha && has_digit
}

/// Validates username format
/// Requirements:
/// - Length between 3 and 32 characters
/// - Only alphanumeric, underscore, and hyphen allowed
/// - Must start with alphanumeric character
pub fn validate_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 32 {
        return false;
    }

    let first_char_valid = username
        .chars()
        .next()
        .map(|c| c.is_alphanumeric())
        .unwrap_or(false);

    if !first_char_valid {
        return false;
    }

    username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("user+tag@example.co.uk"));
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(!validate_email("invalid-email"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
    }

    #[test]
    fn test_validate_password_valid() {
        assert!(validate_password("letmein42"));
        assert!(validate_password("Correct1HorseBattery"));
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(!validate_password("abc1"));
    }

    #[test]
    fn test_validate_password_missing_digit() {
        assert!(!validate_password("passwordonly"));
    }

    #[test]
    fn test_validate_password_missing_letter() {
        assert!(!validate_password("1234567890"));
    }

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("user123"));
        assert!(validate_username("user-name"));
        assert!(validate_username("user_name"));
    }

    #[test]
    fn test_validate_username_too_short() {
        assert!(!validate_username("ab"));
    }

    #[test]
    fn test_validate_username_too_long() {
        assert!(!validate_username(&"a".repeat(33)));
    }

    #[test]
    fn test_validate_username_starts_with_special() {
        assert!(!validate_username("_username"));
        assert!(!validate_username("-username"));
    }

    #[test]
    fn test_validate_username_invalid_characters() {
        assert!(!validate_username("user@name"));
        assert!(!validate_username("user.name"));
        assert!(!validate_username("user name"));
    }
}
