use crate::commands::common::{parse_note_id, signed_in_client};
use crate::error::CliError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoteFlag {
    Pinned,
    Archived,
}

pub async fn run_set_flag(
    id: &str,
    flag: NoteFlag,
    value: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let mut client = signed_in_client(global_profile).await?;

    let note = match flag {
        NoteFlag::Pinned => client.set_pinned(note_id, value).await?,
        NoteFlag::Archived => client.set_archived(note_id, value).await?,
    };
    println!("{}", note.id);
    Ok(())
}
