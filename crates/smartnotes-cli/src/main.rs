//! SmartNotes CLI - capture and manage notes from the terminal
//!
//! Every command talks to the SmartNotes backend through `smartnotes-core`;
//! the bearer token for each profile lives in the OS keychain.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::{run_add, AddOptions};
use crate::commands::auth_cmd::run_auth;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::flags::{run_set_flag, NoteFlag};
use crate::commands::list::run_list;
use crate::commands::regenerate::run_regenerate;
use crate::commands::show::run_show;
use crate::commands::tags::run_tags;
use crate::error::CliError;

const DEFAULT_LOG_DIRECTIVE: &str = "smartnotes=warn";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Some(Commands::Add {
            title,
            tags,
            pin,
            no_ai,
            content,
        }) => {
            let options = AddOptions {
                title,
                tags: &tags,
                pin,
                use_ai: !no_ai,
            };
            run_add(&content, options, profile).await?;
        }
        Some(Commands::List {
            search,
            archived,
            filter,
            json,
        }) => {
            run_list(
                search.as_deref(),
                archived,
                filter.as_deref(),
                json,
                profile,
            )
            .await?;
        }
        Some(Commands::Show { id, json }) => run_show(&id, json, profile).await?,
        Some(Commands::Edit {
            id,
            title,
            content,
            tags,
        }) => run_edit(&id, title, content, tags, profile).await?,
        Some(Commands::Pin { id }) => run_set_flag(&id, NoteFlag::Pinned, true, profile).await?,
        Some(Commands::Unpin { id }) => {
            run_set_flag(&id, NoteFlag::Pinned, false, profile).await?;
        }
        Some(Commands::Archive { id }) => {
            run_set_flag(&id, NoteFlag::Archived, true, profile).await?;
        }
        Some(Commands::Unarchive { id }) => {
            run_set_flag(&id, NoteFlag::Archived, false, profile).await?;
        }
        Some(Commands::Delete { id }) => run_delete(&id, profile).await?,
        Some(Commands::Regenerate { id }) => run_regenerate(&id, profile).await?,
        Some(Commands::Tags { archived }) => run_tags(archived, profile).await?,
        Some(Commands::Config { command }) => run_config(command, profile)?,
        Some(Commands::Auth { command }) => run_auth(command, profile).await?,
        None => {
            // Quick capture mode: smartnotes "my thought"
            if cli.note.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                run_add(&cli.note, AddOptions::default(), profile).await?;
            }
        }
    }

    Ok(())
}
