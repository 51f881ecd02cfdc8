use thiserror::Error;

/// What kind of failure the auth provider reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    DuplicateAccount,
    NetworkError,
    Unknown,
}

/// Failure returned by an identity provider call.
///
/// `message` is the provider's own text and is shown to the user as is.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::NetworkError, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Unknown, message)
    }

    /// Classify a provider error from its HTTP status and machine-readable code.
    pub fn from_provider(status: u16, code: Option<&str>, message: impl Into<String>) -> Self {
        let kind = match code {
            Some("invalid_credentials") | Some("invalid_grant") => AuthErrorKind::InvalidCredentials,
            Some("user_already_exists") | Some("email_exists") => AuthErrorKind::DuplicateAccount,
            _ => match status {
                502 | 503 | 504 => AuthErrorKind::NetworkError,
                _ => AuthErrorKind::Unknown,
            },
        };
        Self::new(kind, message)
    }
}

/// Client-side form checks that run before the provider is contacted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },
}

/// A controller operation was requested from a state that does not allow it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    #[error("cannot {operation} while the auth modal is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_provider_codes() {
        let err = AuthError::from_provider(400, Some("invalid_credentials"), "Invalid login credentials");
        assert_eq!(err.kind, AuthErrorKind::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid login credentials");

        let err = AuthError::from_provider(400, Some("invalid_grant"), "Invalid login credentials");
        assert_eq!(err.kind, AuthErrorKind::InvalidCredentials);

        let err = AuthError::from_provider(422, Some("user_already_exists"), "User already registered");
        assert_eq!(err.kind, AuthErrorKind::DuplicateAccount);

        let err = AuthError::from_provider(422, Some("email_exists"), "Email address already exists");
        assert_eq!(err.kind, AuthErrorKind::DuplicateAccount);
    }

    #[test]
    fn gateway_statuses_are_network_errors() {
        for status in [502, 503, 504] {
            let err = AuthError::from_provider(status, None, "Bad Gateway");
            assert_eq!(err.kind, AuthErrorKind::NetworkError);
        }
    }

    #[test]
    fn unrecognised_errors_fall_back_to_unknown() {
        let err = AuthError::from_provider(422, Some("weak_password"), "Password should be at least 6 characters.");
        assert_eq!(err.kind, AuthErrorKind::Unknown);
        assert_eq!(err.message, "Password should be at least 6 characters.");

        let err = AuthError::from_provider(500, None, "Internal Server Error");
        assert_eq!(err.kind, AuthErrorKind::Unknown);
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "Password must be at least 6 characters."
        );
        assert_eq!(ValidationError::InvalidEmail.to_string(), "Please enter a valid email address.");
    }
}
