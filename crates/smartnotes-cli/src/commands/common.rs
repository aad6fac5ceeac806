use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::Serialize;
use smartnotes_core::models::MAX_TITLE_CHARS;
use smartnotes_core::{ClientPhase, HttpGateway, Note, NoteId, NotesClient};

use crate::auth::KeyringTokenStore;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub type CliClient = NotesClient<HttpGateway, KeyringTokenStore>;

/// Client bound to one CLI profile's backend URL and keychain entry.
pub struct ProfileClient {
    pub profile_name: String,
    pub client: CliClient,
}

impl ProfileClient {
    pub fn open(global_profile: Option<&str>) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = config.resolve_profile_name(global_profile);
        let client_config = config
            .client_config(&profile_name)
            .map_err(CliError::Config)?;
        let gateway = HttpGateway::new(&client_config)?;
        tracing::debug!(
            profile = %profile_name,
            base_url = gateway.base_url(),
            "Opening notes client"
        );
        let client = NotesClient::new(gateway, KeyringTokenStore::new(&profile_name));
        Ok(Self {
            profile_name,
            client,
        })
    }

    /// Restore the stored session and load the note listing; fails unless
    /// the session is still valid.
    pub async fn require_session(&mut self) -> Result<(), CliError> {
        let phase = self.client.start().await;
        self.signed_in(phase)
    }

    /// Restore the stored session without listing notes.
    pub async fn resume_session(&mut self) -> Result<(), CliError> {
        let phase = self.client.resume().await;
        self.signed_in(phase)
    }

    fn signed_in(&self, phase: smartnotes_core::Result<ClientPhase>) -> Result<(), CliError> {
        match phase {
            Ok(ClientPhase::Authenticated) => Ok(()),
            Ok(ClientPhase::Unauthenticated) => Err(CliError::NotSignedIn(self.profile_name.clone())),
            Err(error) => {
                tracing::warn!("Stored session rejected: {}", error);
                Err(CliError::NotSignedIn(self.profile_name.clone()))
            }
        }
    }
}

/// Open the profile's client and restore its session, for commands that act
/// on single notes and never read the listing.
pub async fn signed_in_client(global_profile: Option<&str>) -> Result<CliClient, CliError> {
    let mut profile = ProfileClient::open(global_profile)?;
    profile.resume_session().await?;
    Ok(profile.client)
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub content: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub ai_tags: Vec<String>,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub created_at: String,
    pub updated_at: String,
    pub relative_time: String,
}

pub fn parse_note_id(id: &str) -> Result<NoteId, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyNoteId);
    }
    trimmed
        .parse::<NoteId>()
        .map_err(|_| CliError::InvalidNoteId(trimmed.to_string()))
}

pub fn format_note_lines(notes: &[Note], now: DateTime<Utc>) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            let flags = note_flags(note);
            let title = truncate_chars(&collapse_whitespace(&note.title), 40);
            let relative_time = format_relative_time(note.updated_at, now);
            let tags = render_tags(note.user_tags());

            if tags.is_empty() {
                format!("{:>6}  {flags:<3}  {title:<40}  {relative_time}", note.id)
            } else {
                format!(
                    "{:>6}  {flags:<3}  {title:<40}  {relative_time:<10}  {tags}",
                    note.id
                )
            }
        })
        .collect()
}

pub fn format_note_detail(note: &Note, now: DateTime<Utc>) -> String {
    let mut lines = vec![
        format!("#{}  {}", note.id, note.title),
        format!(
            "updated {} ({})",
            format_relative_time(note.updated_at, now),
            format_timestamp(note.updated_at)
        ),
    ];
    let status = [
        note.is_pinned.then_some("pinned"),
        note.is_archived.then_some("archived"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();
    if !status.is_empty() {
        lines.push(format!("status: {}", status.join(", ")));
    }
    if !note.user_tags().is_empty() {
        lines.push(format!("tags: {}", render_tags(note.user_tags())));
    }
    if !note.ai_tag_list().is_empty() {
        lines.push(format!("ai tags: {}", render_tags(note.ai_tag_list())));
    }
    if let Some(summary) = note.ai_summary.as_deref().filter(|text| !text.trim().is_empty()) {
        lines.push(format!("summary: {}", summary.trim()));
    }
    lines.push(String::new());
    lines.push(note.content.clone());
    lines.join("\n")
}

pub fn note_to_list_item(note: &Note, now: DateTime<Utc>) -> NoteListItem {
    NoteListItem {
        id: note.id.get(),
        title: note.title.clone(),
        preview: note_preview(note, 80),
        content: note.content.clone(),
        summary: note.ai_summary.clone(),
        tags: note.user_tags().to_vec(),
        ai_tags: note.ai_tag_list().to_vec(),
        is_pinned: note.is_pinned,
        is_archived: note.is_archived,
        created_at: note.created_at.to_rfc3339(),
        updated_at: note.updated_at.to_rfc3339(),
        relative_time: format_relative_time(note.updated_at, now),
    }
}

fn note_flags(note: &Note) -> String {
    let mut flags = String::new();
    if note.is_pinned {
        flags.push('P');
    }
    if note.is_archived {
        flags.push('A');
    }
    flags
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.content.lines().next().unwrap_or("");
    truncate_chars(&collapse_whitespace(first_line), max_chars)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = text.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn render_tags(tags: &[String]) -> String {
    let mut tags = tags.to_vec();
    tags.sort();
    tags.into_iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds().max(0);
    let minute = 60;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// First non-blank line of `content`, collapsed and cut to the title limit.
pub fn derive_title(content: &str) -> Option<String> {
    let line = content.lines().find(|line| !line.trim().is_empty())?;
    Some(
        collapse_whitespace(line)
            .chars()
            .take(MAX_TITLE_CHARS)
            .collect(),
    )
}

pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized = Vec::new();
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#').trim();
        if !tag.is_empty() && !normalized.iter().any(|existing: &String| existing == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    let status = match Command::new(editor).arg(file_path).status() {
        Ok(status) => status,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // EDITOR may carry arguments, e.g. "code --wait".
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };
            Command::new(program).args(parts).arg(file_path).status()?
        }
        Err(err) => return Err(CliError::Io(err)),
    };

    if status.success() {
        Ok(())
    } else {
        Err(CliError::EditorFailed(format!(
            "`{editor}` exited with status {status}"
        )))
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("smartnotes-note-{}-{now}.md", std::process::id()))
}
