use smartnotes_core::NotePatch;

use crate::commands::common::{
    capture_editor_input_with_initial, normalize_tags, parse_note_id, signed_in_client,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title: Option<String>,
    content: Option<String>,
    tags: Option<Vec<String>>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let mut client = signed_in_client(global_profile).await?;

    let mut patch = NotePatch {
        title: title.map(|value| value.trim().to_string()),
        content: content.map(|value| value.trim().to_string()),
        tags: tags.map(|values| normalize_tags(&values)),
        ..NotePatch::default()
    };

    if patch.is_empty() {
        let note = client.fetch_note(note_id).await?;
        let Some(edited_content) = capture_editor_input_with_initial(&note.content)? else {
            return Err(CliError::EmptyEditedContent);
        };
        if edited_content == note.content {
            println!("{}", note.id);
            return Ok(());
        }
        patch.content = Some(edited_content);
    }

    let updated = client.update_note(note_id, &patch).await?;
    println!("{}", updated.id);
    Ok(())
}
