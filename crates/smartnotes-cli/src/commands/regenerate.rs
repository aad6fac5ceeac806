use crate::commands::common::{parse_note_id, render_tags, signed_in_client};
use crate::error::CliError;

pub async fn run_regenerate(id: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let mut client = signed_in_client(global_profile).await?;

    let note = client.regenerate_note(note_id).await?;
    println!("{}", note.id);
    if let Some(summary) = note.ai_summary.as_deref() {
        println!("summary: {summary}");
    }
    if !note.ai_tag_list().is_empty() {
        println!("ai tags: {}", render_tags(note.ai_tag_list()));
    }
    Ok(())
}
