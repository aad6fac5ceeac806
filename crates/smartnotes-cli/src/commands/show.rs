use chrono::Utc;

use crate::commands::common::{
    format_note_detail, note_to_list_item, parse_note_id, signed_in_client,
};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let mut client = signed_in_client(global_profile).await?;
    let note = client.fetch_note(note_id).await?;

    let now = Utc::now();
    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&note_to_list_item(&note, now))?
        );
    } else {
        println!("{}", format_note_detail(&note, now));
    }
    Ok(())
}
