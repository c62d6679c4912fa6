use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use console::style;

use super::Context;

/// Merge settings from a JSON file into the config file.
#[derive(Parser)]
pub struct ImportSettingsCommand {
    /// JSON file with the settings keys to overwrite.
    #[arg(long)]
    pub file: PathBuf,
}

impl ImportSettingsCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let content = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let overrides: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", self.file.display()))?;

        let config = ctx.config.update(|config| {
            config.generation.merge_json(overrides)?;
            config.generation.validate()
        })?;

        tracing::info!(file = ?self.file, apps = config.generation.type_settings.len(), "Imported settings");
        println!(
            "{} Settings imported into {}",
            style("✓").green(),
            style(ctx.config.path().display()).cyan()
        );
        Ok(())
    }
}

/// Set or clear the generation pause flag.
pub fn set_paused(ctx: &Context, paused: bool) -> Result<()> {
    ctx.config.update(|config| {
        config.environment.generation_paused = paused;
        Ok(())
    })?;

    let state = if paused { "paused" } else { "resumed" };
    tracing::info!(paused, "Updated generation pause flag");
    println!("{} Type generation {}", style("✓").green(), style(state).bold());
    Ok(())
}
