use chrono::Utc;
use smartnotes_core::Note;

use crate::commands::common::{
    format_note_lines, note_to_list_item, ProfileClient, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    search: Option<&str>,
    include_archived: bool,
    filter: Option<&str>,
    as_json: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let mut profile = ProfileClient::open(global_profile)?;
    // While signed out, filter setters only record the value; `start` then
    // performs the one listing with them.
    profile.client.submit_search(search.unwrap_or_default()).await?;
    profile.client.set_include_archived(include_archived).await?;
    profile.client.set_view_query(filter.unwrap_or_default());
    profile.require_session().await?;

    let notes = profile.client.visible_notes().await;
    print_notes(&notes, as_json)
}

pub fn print_notes(notes: &[Note], as_json: bool) -> Result<(), CliError> {
    let now = Utc::now();
    if as_json {
        let json_items = notes
            .iter()
            .map(|note| note_to_list_item(note, now))
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if notes.is_empty() {
        println!("No notes.");
    } else {
        for line in format_note_lines(notes, now) {
            println!("{line}");
        }
    }
    Ok(())
}
