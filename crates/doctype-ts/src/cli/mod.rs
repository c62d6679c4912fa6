mod generate;
mod settings;

pub use generate::{GenerateAllCommand, GenerateDoctypeCommand, GenerateModuleCommand};
pub use settings::ImportSettingsCommand;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use doctype_ts_codegen::{load_bench, GeneratorOptions, TypeGenerator};
use doctype_ts_core::{ConfigFile, EnvironmentProvider, SiteEnvironment};

/// doctype-ts - TypeScript interfaces for DocType schemas
#[derive(Parser)]
#[command(name = "doctype-ts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true, default_value = "doctype-ts.toml")]
    pub config: PathBuf,

    /// Apps directory to load DocTypes from (defaults to <bench_root>/apps).
    #[arg(long, global = true)]
    pub apps_dir: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate the type file of one DocType.
    GenerateDoctype(GenerateDoctypeCommand),

    /// Generate the type files of every DocType in a module.
    GenerateModule(GenerateModuleCommand),

    /// Generate types for every configured app.
    Generate(GenerateAllCommand),

    /// Merge settings from a JSON file into the config file.
    ImportSettings(ImportSettingsCommand),

    /// Pause type generation.
    Pause,

    /// Resume type generation.
    Resume,
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        let log_level = if self.verbose { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()))
            .with_writer(std::io::stderr)
            .init();

        dotenvy::dotenv().ok();

        if !self.config.exists() {
            anyhow::bail!(
                "Configuration file not found: {}\nCreate one with a [generation] and an [environment] table.",
                self.config.display()
            );
        }

        let ctx = Context {
            config: ConfigFile::new(&self.config),
            apps_dir: self.apps_dir,
        };

        match self.command {
            Commands::GenerateDoctype(cmd) => cmd.execute(&ctx),
            Commands::GenerateModule(cmd) => cmd.execute(&ctx),
            Commands::Generate(cmd) => cmd.execute(&ctx),
            Commands::ImportSettings(cmd) => cmd.execute(&ctx),
            Commands::Pause => settings::set_paused(&ctx, true),
            Commands::Resume => settings::set_paused(&ctx, false),
        }
    }
}

/// What every command runs against.
pub struct Context {
    pub config: ConfigFile,
    pub apps_dir: Option<PathBuf>,
}

impl Context {
    /// Apps directory from the command line or the configured bench root.
    pub fn apps_dir(&self) -> Result<PathBuf> {
        match &self.apps_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.config.load()?.environment.apps_dir()),
        }
    }

    /// Load the bench's DocTypes and build a generator reading settings
    /// and environment flags from the config file.
    pub fn generator(&self, options: GeneratorOptions) -> Result<TypeGenerator> {
        let apps_dir = self.apps_dir()?;
        let registry = load_bench(&apps_dir)
            .with_context(|| format!("Failed to load DocTypes from {}", apps_dir.display()))?;
        tracing::debug!(apps_dir = ?apps_dir, doctypes = registry.len(), "Loaded DocTypes");

        let environment = EnvironmentOverride {
            config: self.config.clone(),
            apps_dir: self.apps_dir.clone(),
        };
        Ok(TypeGenerator::new(
            Arc::new(registry),
            Arc::new(self.config.clone()),
            Arc::new(environment),
            options,
        ))
    }
}

/// Environment from the config file, with `--apps-dir` applied on top.
struct EnvironmentOverride {
    config: ConfigFile,
    apps_dir: Option<PathBuf>,
}

impl EnvironmentProvider for EnvironmentOverride {
    fn environment(&self) -> doctype_ts_core::Result<SiteEnvironment> {
        let mut environment = self.config.environment()?;
        if let Some(dir) = &self.apps_dir {
            environment.apps_dir = Some(dir.clone());
        }
        Ok(environment)
    }
}
