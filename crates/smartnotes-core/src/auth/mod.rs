//! Session management: bearer token, user profile and durable token storage.
//!
//! A profile is only ever held for a token that the profile endpoint accepted.
//! Any failed validation drops both the token and the profile, in memory and
//! in durable storage.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::gateway::NotesGateway;
use crate::models::{Credentials, SignupPayload, UserProfile};
use crate::{Error, Result};

/// Durable storage for the single bearer token.
pub trait TokenPersistence: Send + Sync + 'static {
    fn load_token(&self) -> Result<Option<String>>;
    fn save_token(&self, token: &str) -> Result<()>;
    fn clear_token(&self) -> Result<()>;
}

/// Process-local token storage; nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenPersistence for MemoryTokenStore {
    fn load_token(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .lock()
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save_token(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Immutable view of the current authentication context.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<UserProfile>,
    feedback: Option<String>,
}

impl Session {
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Message from the most recent authentication failure.
    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("feedback", &self.feedback)
            .finish()
    }
}

pub struct SessionManager<G: NotesGateway, S: TokenPersistence> {
    gateway: Arc<G>,
    tokens: S,
    session: Session,
}

impl<G: NotesGateway, S: TokenPersistence> SessionManager<G, S> {
    pub fn new(gateway: Arc<G>, tokens: S) -> Self {
        Self {
            gateway,
            tokens,
            session: Session::default(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    /// Read the persisted token, if any. Does not validate it.
    pub fn restore(&self) -> Result<Option<String>> {
        Ok(self
            .tokens
            .load_token()?
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty()))
    }

    /// Restore the persisted token and validate it against the profile endpoint.
    ///
    /// Returns `Ok(None)` when no token was stored.
    pub async fn resume(&mut self) -> Result<Option<UserProfile>> {
        let Some(token) = self.restore()? else {
            self.session.token = None;
            self.session.user = None;
            return Ok(None);
        };
        self.session.token = Some(token);
        self.session.user = None;
        self.validate().await.map(Some)
    }

    /// Fetch the profile for the current token.
    ///
    /// On failure the token and profile are both dropped.
    pub async fn validate(&mut self) -> Result<UserProfile> {
        let Some(token) = self.session.token.clone() else {
            return Err(Error::Authentication("Not signed in".to_string()));
        };

        match self.gateway.fetch_profile(&token).await {
            Ok(profile) => {
                tracing::info!(user_id = profile.id, "Session validated");
                self.session.user = Some(profile.clone());
                self.session.feedback = None;
                Ok(profile)
            }
            Err(error) => {
                let message = error.message();
                tracing::warn!("Stored token rejected: {}", message);
                self.invalidate(&message);
                Err(Error::Authentication(message))
            }
        }
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<UserProfile> {
        self.session.feedback = None;
        let result = self.authenticate(credentials).await;
        self.record_failure(&result);
        result
    }

    /// Create the account, then log in with the same username/password.
    pub async fn signup(&mut self, payload: &SignupPayload) -> Result<UserProfile> {
        self.session.feedback = None;
        let result = self.register(payload).await;
        self.record_failure(&result);
        result
    }

    /// Drop the token and profile. Local only; no remote call.
    pub fn logout(&mut self) -> Result<()> {
        let result = self.clear();
        self.session.feedback = None;
        tracing::info!("Signed out");
        result
    }

    /// Drop the session after the remote rejected its token.
    pub fn invalidate(&mut self, reason: &str) {
        if let Err(error) = self.clear() {
            tracing::warn!("Failed to clear persisted token: {}", error);
        }
        self.session.feedback = Some(reason.to_string());
    }

    async fn register(&mut self, payload: &SignupPayload) -> Result<UserProfile> {
        payload.validate()?;
        let created = self
            .gateway
            .signup(payload)
            .await
            .map_err(into_authentication)?;
        tracing::info!(user_id = created.id, "Account created");
        self.authenticate(&payload.credentials()).await
    }

    async fn authenticate(&mut self, credentials: &Credentials) -> Result<UserProfile> {
        credentials.validate()?;
        let token = self
            .gateway
            .login(credentials)
            .await
            .map_err(into_authentication)?
            .access_token;
        let profile = self
            .gateway
            .fetch_profile(&token)
            .await
            .map_err(into_authentication)?;

        self.tokens.save_token(&token)?;
        self.session.token = Some(token);
        self.session.user = Some(profile.clone());
        tracing::info!(user_id = profile.id, "Signed in");
        Ok(profile)
    }

    /// Storage is cleared first; memory is cleared even if storage fails.
    fn clear(&mut self) -> Result<()> {
        let result = self.tokens.clear_token();
        self.session.token = None;
        self.session.user = None;
        result
    }

    fn record_failure<T>(&mut self, result: &Result<T>) {
        if let Err(error) = result {
            self.session.feedback = Some(error.message());
        }
    }
}

fn into_authentication(error: Error) -> Error {
    match error {
        Error::Authentication(_) | Error::Validation(_) | Error::TokenStorage(_) => error,
        other => Error::Authentication(other.message()),
    }
}
