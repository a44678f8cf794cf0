//! Generate command - write the site to the public directory

use anyhow::Result;

use crate::client::ContentClient;
use crate::generator::Generator;
use crate::Spacetraveling;

/// Run the generate command
pub async fn run(app: &Spacetraveling) -> Result<()> {
    let client = ContentClient::new(&app.config)?;
    let generator = Generator::new(&app.config, &client, app.public_dir.clone())?;

    let summary = generator.generate().await?;
    tracing::info!(
        "Generated {} pages ({} skipped)",
        summary.pages_written,
        summary.pages_skipped
    );

    Ok(())
}
