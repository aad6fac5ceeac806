//! Persistent CLI profile configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smartnotes_core::config::{normalize_api_base_url, API_BASE_URL_ENV};
use smartnotes_core::util::normalize_text_option;
use smartnotes_core::ClientConfig;

const CONFIG_FILE_NAME: &str = "cli-config.json";

/// Environment variable selecting the profile when `--profile` is absent.
pub const PROFILE_ENV: &str = "SMARTNOTES_PROFILE";

pub const DEFAULT_PROFILE_NAME: &str = "default";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub api_base_url: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("smartnotes").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    normalize_text_option(value.map(ToString::to_string))
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// `--profile`, then `SMARTNOTES_PROFILE`, then the active profile, then `default`.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        self.resolve_profile_name_with_env(explicit, std::env::var(PROFILE_ENV).ok().as_deref())
    }

    fn resolve_profile_name_with_env(&self, explicit: Option<&str>, env: Option<&str>) -> String {
        normalize_profile_name(explicit)
            .or_else(|| normalize_profile_name(env))
            .or_else(|| normalize_profile_name(self.active_profile.as_deref()))
            .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string())
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    /// Backend settings for `profile_name`. `SMARTNOTES_API_BASE_URL` wins over the file.
    pub fn client_config(&self, profile_name: &str) -> Result<ClientConfig, String> {
        let from_env = normalize_text_option(std::env::var(API_BASE_URL_ENV).ok());
        let from_profile = self.profile(profile_name).and_then(CliProfile::api_base_url);
        ClientConfig::resolve(from_env.or(from_profile)).map_err(|error| error.message())
    }

    fn normalize(&mut self) {
        self.active_profile = normalize_profile_name(self.active_profile.as_deref());
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
    }
}

impl CliProfile {
    pub fn api_base_url(&self) -> Option<String> {
        normalize_text_option(self.api_base_url.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = self.api_base_url() {
            normalize_api_base_url(&url).map_err(|error| error.message())?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.api_base_url = self
            .api_base_url()
            .map(|url| url.trim_end_matches('/').to_string());
    }
}
