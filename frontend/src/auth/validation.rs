use crate::auth::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Mirrors what a browser `type="email"` input accepts: one `@`, something on
/// both sides and no whitespace. Deliverability is the provider's problem.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_plausible_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_plausible_email("a@b.com"));
        assert!(is_plausible_email("first.last+visa@sub.example.org"));
        assert!(is_plausible_email("  padded@example.com  "));
        assert!(is_plausible_email("user@localhost"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "plain", "@b.com", "a@", "a@@b.com", "a b@c.com", "a@b.com.", "a@.com"] {
            assert!(!is_plausible_email(email), "{email:?} should be rejected");
        }
    }

    #[test]
    fn password_length_boundary() {
        assert_eq!(
            validate_credentials("a@b.com", "short"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(validate_credentials("a@b.com", "abcdef"), Ok(()));
        // counted in characters, not bytes
        assert_eq!(
            validate_credentials("a@b.com", "pässw"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
    }

    #[test]
    fn email_is_checked_before_password() {
        assert_eq!(validate_credentials("nope", "x"), Err(ValidationError::InvalidEmail));
    }
}
