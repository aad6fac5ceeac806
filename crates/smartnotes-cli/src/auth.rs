//! Bearer token persistence in the OS keychain, one entry per profile.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use smartnotes_core::auth::TokenPersistence;
use smartnotes_core::{Error, Result};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "smartnotes-cli";

#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    username: String,
}

impl KeyringTokenStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("access_token:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::TokenStorage(error.to_string()))
    }
}

impl TokenPersistence for KeyringTokenStore {
    #[cfg(not(test))]
    fn load_token(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::TokenStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_token(&self) -> Result<Option<String>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    fn save_token(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .map_err(|error| Error::TokenStorage(error.to_string()))
    }

    #[cfg(test)]
    fn save_token(&self, token: &str) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        guard.insert(self.username.clone(), token.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_token(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::TokenStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_token(&self) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::TokenStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}
