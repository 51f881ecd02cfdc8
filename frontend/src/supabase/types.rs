//! Wire types of the hosted auth API.

use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::auth::provider::Identity;

#[derive(Serialize)]
pub struct PasswordCredentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: Identity,
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the server only sent the latter.
    pub fn stamped(mut self, now: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| now + secs);
        }
        self
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.map_or(false, |at| at <= now)
    }
}

/// Sign-up answers with a full session when the project auto-confirms
/// accounts, otherwise with the bare user awaiting confirmation.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(Session),
    User(Identity),
}

/// Error payloads come in a few generations; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_auth_error(self, status: u16) -> AuthError {
        let code = self.error_code.or_else(|| self.error.clone());
        let message = self
            .msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        AuthError::from_provider(status, code.as_deref(), message)
    }
}
