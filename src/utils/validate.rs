use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{HotQuestionError, Result};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

const WEAK_PASSWORDS: [&str; 7] = [
    "password1",
    "qwerty123",
    "admin1234",
    "abcd1234",
    "teacher123",
    "student123",
    "welcome123",
];

pub fn validate_username(username: &str) -> Result<()> {
    // 长度 3..=32
    if !(3..=32).contains(&username.len()) {
        return Err(HotQuestionError::validation(
            "Username length must be between 3 and 32 characters",
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(HotQuestionError::validation(
            "Username must contain only letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(HotQuestionError::validation("Email format is invalid"));
    }
    Ok(())
}

/// 密码策略：至少 8 位，同时包含大小写字母与数字，且不在弱密码表中
pub fn validate_password(password: &str) -> Result<()> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(HotQuestionError::validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("alice@school.edu").is_ok());
        assert!(validate_email("alice@school").is_err());
        assert!(validate_email("@school.edu").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("SecurePass123").is_ok());

        let err = validate_password("Ab1").unwrap_err();
        assert!(err.message().contains("at least 8 characters"));

        let err = validate_password("abcd1234").unwrap_err();
        assert!(err.message().contains("uppercase"));
        assert!(err.message().contains("too common"));

        assert!(validate_password("AbcdEfgh").is_err());
    }
}
