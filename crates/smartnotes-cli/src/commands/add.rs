use smartnotes_core::NewNote;

use crate::commands::common::{
    derive_title, normalize_tags, resolve_note_content, signed_in_client,
};
use crate::error::CliError;

pub struct AddOptions<'a> {
    pub title: Option<String>,
    pub tags: &'a [String],
    pub pin: bool,
    pub use_ai: bool,
}

impl Default for AddOptions<'_> {
    fn default() -> Self {
        Self {
            title: None,
            tags: &[],
            pin: false,
            use_ai: true,
        }
    }
}

pub async fn run_add(
    content_parts: &[String],
    options: AddOptions<'_>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let content = resolve_note_content(content_parts)?;
    let payload = build_new_note(content, options)?;

    let mut client = signed_in_client(global_profile).await?;
    let note = client.create_note(&payload).await?;

    println!("{}", note.id);
    if let Some(summary) = note.ai_summary.as_deref() {
        tracing::debug!(id = %note.id, "AI summary: {}", summary);
    }
    Ok(())
}

pub fn build_new_note(content: String, options: AddOptions<'_>) -> Result<NewNote, CliError> {
    let title = smartnotes_core::util::normalize_text_option(options.title)
        .or_else(|| derive_title(&content))
        .ok_or(CliError::EmptyContent)?;
    let payload = NewNote::new(title, content)
        .with_tags(normalize_tags(options.tags))
        .pinned(options.pin)
        .use_ai(options.use_ai);
    payload.validate()?;
    Ok(payload)
}
