//! Clean command - remove the public directory

use anyhow::Result;
use std::fs;

use crate::Spacetraveling;

/// Run the clean command
pub fn run(app: &Spacetraveling) -> Result<()> {
    if app.public_dir.exists() {
        fs::remove_dir_all(&app.public_dir)?;
        tracing::info!("Removed {:?}", app.public_dir);
    }

    Ok(())
}
