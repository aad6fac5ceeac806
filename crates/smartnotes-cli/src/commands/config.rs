use std::env;

use smartnotes_core::config::API_BASE_URL_ENV;
use smartnotes_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::config_profiles::{default_config_path, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            no_activate,
        } => run_config_init(global_profile, api_base_url, no_activate),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_api_base_url = config
        .profile(&profile_name)
        .and_then(|profile| profile.api_base_url());

    let merged_api_base_url = merge_api_base_url(
        api_base_url,
        env::var(API_BASE_URL_ENV).ok(),
        existing_api_base_url,
    );

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(value) = merged_api_base_url {
        profile.api_base_url = Some(value);
    }
    profile.validate().map_err(CliError::Config)?;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let client_config = config
        .client_config(&profile_name)
        .map_err(CliError::Config)?;
    println!(
        "Backend: {}. Run `smartnotes auth login --username <name> --password <password>`.",
        client_config.api_base_url
    );
    Ok(())
}

/// Explicit flag, then environment, then whatever the profile already had.
pub fn merge_api_base_url(
    explicit: Option<String>,
    from_env: Option<String>,
    existing: Option<String>,
) -> Option<String> {
    normalize_text_option(explicit)
        .or_else(|| normalize_text_option(from_env))
        .or_else(|| normalize_text_option(existing))
}

pub fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let client_config = config
        .client_config(&profile_name)
        .map_err(CliError::Config)?;
    let path = default_config_path().map_err(CliError::Config)?;

    println!("config file:    {}", path.display());
    println!(
        "profile:        {}{}",
        profile_name,
        if config.profile(&profile_name).is_some() {
            ""
        } else {
            " (not configured)"
        }
    );
    println!(
        "active profile: {}",
        config.active_profile.as_deref().unwrap_or("(none)")
    );
    println!("api base url:   {}", client_config.api_base_url);
    Ok(())
}
