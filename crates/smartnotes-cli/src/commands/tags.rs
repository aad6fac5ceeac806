use smartnotes_core::search::collect_tags;

use crate::commands::common::ProfileClient;
use crate::error::CliError;

pub async fn run_tags(include_archived: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let mut profile = ProfileClient::open(global_profile)?;
    profile.client.set_include_archived(include_archived).await?;
    profile.require_session().await?;

    for tag in collect_tags(&profile.client.store().snapshot().await) {
        println!("#{tag}");
    }
    Ok(())
}
