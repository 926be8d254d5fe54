//! Initialize command.

use console::style;

use crate::config::Settings;
use crate::repository::util::redact_url_password;

/// Create the review table and its indexes.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    ctx.init_schema().await?;

    let count = ctx.reviews().count().await?;
    println!(
        "{} Initialized review store at {} ({} reviews)",
        style("✓").green(),
        redact_url_password(&settings.database_url),
        count
    );

    ctx.close();
    Ok(())
}
