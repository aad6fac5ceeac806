//! User profile and authentication payloads

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub type UserId = i64;

const USERNAME_CHARS: std::ops::RangeInclusive<usize> = 3..=50;
const PASSWORD_CHARS: std::ops::RangeInclusive<usize> = 8..=100;

/// Profile returned by `GET /auth/me` and `POST /auth/signup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub is_active: bool,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Full name when set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.username.as_str())
    }
}

/// Body of `POST /auth/login`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::Validation("Username is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(Error::Validation("Password is required".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /auth/signup`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupPayload {
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub password: String,
}

impl SignupPayload {
    /// Credentials for the login that follows a successful signup.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::Validation("A valid email is required".to_string()));
        }
        if !USERNAME_CHARS.contains(&self.username.trim().chars().count()) {
            return Err(Error::Validation(format!(
                "Username must be {}-{} characters",
                USERNAME_CHARS.start(),
                USERNAME_CHARS.end()
            )));
        }
        if !PASSWORD_CHARS.contains(&self.password.chars().count()) {
            return Err(Error::Validation(format!(
                "Password must be {}-{} characters",
                PASSWORD_CHARS.start(),
                PASSWORD_CHARS.end()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for SignupPayload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SignupPayload")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response of `POST /auth/login`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, password: &str) -> SignupPayload {
        SignupPayload {
            email: "ada@example.com".to_string(),
            username: username.to_string(),
            full_name: None,
            password: password.to_string(),
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 1,
            "email": "ada@example.com",
            "username": "ada",
            "full_name": "Ada Lovelace",
            "is_active": true,
            "created_at": "2024-10-26T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(profile.display_name(), "Ada Lovelace");

        profile.full_name = Some("  ".to_string());
        assert_eq!(profile.display_name(), "ada");
    }

    #[test]
    fn signup_validation_mirrors_backend_limits() {
        assert!(signup("ada", "correct-horse").validate().is_ok());
        assert!(signup("ab", "correct-horse").validate().is_err());
        assert!(signup("ada", "short").validate().is_err());

        let mut bad_email = signup("ada", "correct-horse");
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn credentials_require_both_fields() {
        assert!(Credentials::new("ada", "x").validate().is_ok());
        assert!(Credentials::new(" ", "x").validate().is_err());
        assert!(Credentials::new("ada", "").validate().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", Credentials::new("ada", "hunter22"));
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("[REDACTED]"));

        let token = TokenResponse {
            access_token: "secret-access-token".to_string(),
            token_type: "bearer".to_string(),
        };
        assert!(!format!("{token:?}").contains("secret-access-token"));
    }
}
