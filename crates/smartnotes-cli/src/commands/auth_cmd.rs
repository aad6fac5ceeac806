use smartnotes_core::models::{Credentials, SignupPayload};
use smartnotes_core::ClientPhase;

use crate::cli::AuthCommands;
use crate::commands::common::ProfileClient;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { username, password } => {
            let mut profile = ProfileClient::open(global_profile)?;
            let user = profile
                .client
                .login(&Credentials::new(username, password))
                .await?;
            println!(
                "Signed in profile '{}' as {} ({})",
                profile.profile_name,
                user.display_name(),
                user.username
            );
            Ok(())
        }
        AuthCommands::Signup {
            email,
            username,
            full_name,
            password,
        } => {
            let mut profile = ProfileClient::open(global_profile)?;
            let payload = SignupPayload {
                email: email.trim().to_string(),
                username: username.trim().to_string(),
                full_name: smartnotes_core::util::normalize_text_option(full_name),
                password,
            };
            let user = profile.client.signup(&payload).await?;
            println!(
                "Created account {} and signed in profile '{}'",
                user.username, profile.profile_name
            );
            Ok(())
        }
        AuthCommands::Status => {
            let mut profile = ProfileClient::open(global_profile)?;
            match profile.client.start().await {
                Ok(ClientPhase::Authenticated) => {
                    let snapshot = profile.client.snapshot().await;
                    if let Some(user) = snapshot.user {
                        println!(
                            "Profile '{}' is signed in as {} ({}, {} notes)",
                            profile.profile_name,
                            user.display_name(),
                            user.email,
                            snapshot.notes.len()
                        );
                    }
                }
                Ok(ClientPhase::Unauthenticated) => {
                    println!("Profile '{}' is not signed in.", profile.profile_name);
                }
                Err(error) => {
                    println!(
                        "Profile '{}' is not signed in: {}",
                        profile.profile_name,
                        error.message()
                    );
                }
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let mut profile = ProfileClient::open(global_profile)?;
            profile.client.logout().await?;
            println!("Signed out profile '{}'", profile.profile_name);
            Ok(())
        }
    }
}
