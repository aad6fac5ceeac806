use crate::commands::common::{parse_note_id, signed_in_client};
use crate::error::CliError;

pub async fn run_delete(id: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let mut client = signed_in_client(global_profile).await?;

    client.delete_note(note_id).await?;
    println!("{note_id}");
    Ok(())
}
