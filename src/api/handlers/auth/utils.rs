//! Small helpers for account validation and password hashing.

use regex::Regex;

/// Fixed bcrypt cost for all password hashes.
pub(crate) const BCRYPT_COST: u32 = 10;

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Hash a password with the fixed cost factor.
///
/// # Errors
/// Returns an error if bcrypt rejects the input.
pub(crate) fn hash_password(password: &str) -> anyhow::Result<String> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|err| anyhow::anyhow!("bcrypt hash failed: {err}"))
}

/// Check a password against a stored hash.
///
/// When no hash exists (unknown username), a throwaway hash is computed so
/// the lookup costs the same as a real comparison and callers cannot probe
/// for account existence via timing.
pub(crate) fn verify_password(password: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) => bcrypt::verify(password, hash).unwrap_or(false),
        None => {
            let _ = bcrypt::hash(password, BCRYPT_COST);
            false
        }
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

/// Trim an optional field and drop it entirely when empty.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn hash_never_equals_plaintext() -> anyhow::Result<()> {
        let hash = hash_password("longenough")?;
        assert_ne!(hash, "longenough");
        assert!(hash.starts_with("$2"));
        Ok(())
    }

    #[test]
    fn verify_accepts_matching_password() -> anyhow::Result<()> {
        let hash = hash_password("longenough")?;
        assert!(verify_password("longenough", Some(&hash)));
        Ok(())
    }

    #[test]
    fn verify_rejects_wrong_password() -> anyhow::Result<()> {
        let hash = hash_password("longenough")?;
        assert!(!verify_password("different", Some(&hash)));
        Ok(())
    }

    #[test]
    fn verify_rejects_missing_hash() {
        assert!(!verify_password("anything", None));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", Some("not-a-bcrypt-hash")));
    }

    #[test]
    fn normalize_optional_drops_empty_values() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional(Some(" ana ".to_string())),
            Some("ana".to_string())
        );
    }

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}
