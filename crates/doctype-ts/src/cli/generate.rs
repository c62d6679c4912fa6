use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use console::style;
use doctype_ts_codegen::{GenerationOutcome, GeneratorOptions, PassReport};
use indicatif::{ProgressBar, ProgressStyle};

use super::Context;

/// Generate the type file of one DocType.
#[derive(Parser)]
pub struct GenerateDoctypeCommand {
    /// App the DocType belongs to.
    #[arg(long)]
    pub app: String,

    /// DocType name.
    #[arg(long)]
    pub doctype: String,

    /// Generate missing child table types too.
    #[arg(long)]
    pub child_tables: bool,

    /// Include custom fields.
    #[arg(long)]
    pub custom_fields: bool,
}

impl GenerateDoctypeCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let options = GeneratorOptions::new(self.app)
            .with_child_tables(self.child_tables)
            .with_custom_fields(self.custom_fields);
        let generator = ctx.generator(options)?;

        let pb = spinner(format!("Generating {}...", self.doctype))?;
        let report = generator.generate_doctype(&self.doctype);
        pb.finish_and_clear();

        print_report(&report?);
        Ok(())
    }
}

/// Generate the type files of every DocType in a module.
#[derive(Parser)]
pub struct GenerateModuleCommand {
    /// App the module belongs to.
    #[arg(long)]
    pub app: String,

    /// Module name.
    #[arg(long)]
    pub module: String,

    /// Generate missing child table types too.
    #[arg(long)]
    pub child_tables: bool,

    /// Include custom fields.
    #[arg(long)]
    pub custom_fields: bool,
}

impl GenerateModuleCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let options = GeneratorOptions::new(self.app)
            .with_child_tables(self.child_tables)
            .with_custom_fields(self.custom_fields);
        let generator = ctx.generator(options)?;

        let pb = spinner(format!("Generating module {}...", self.module))?;
        let report = generator.generate_module(&self.module);
        pb.finish_and_clear();

        print_report(&report?);
        Ok(())
    }
}

/// Generate types for every configured app.
#[derive(Parser)]
pub struct GenerateAllCommand {
    /// Write index.ts barrel files into each output tree.
    #[arg(long)]
    pub indexes: bool,
}

impl GenerateAllCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let options = GeneratorOptions::default()
            .with_child_tables(true)
            .with_indexes(self.indexes);
        let generator = ctx.generator(options)?;

        let pb = spinner("Generating types for all apps...".to_string())?;
        let report = generator.export_all_apps();
        pb.finish_and_clear();

        print_report(&report?);
        Ok(())
    }
}

fn spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn print_report(report: &PassReport) {
    println!();
    for entry in &report.outcomes {
        match &entry.outcome {
            GenerationOutcome::Generated(path) => println!(
                "  {} {} {}",
                style("✓").green(),
                entry.doctype,
                style(path.display()).dim()
            ),
            GenerationOutcome::Failed(reason) => println!(
                "  {} {} {}",
                style("✗").red(),
                entry.doctype,
                style(reason).red()
            ),
            skipped => println!(
                "  {} {} {}",
                style("-").dim(),
                entry.doctype,
                style(skipped).dim()
            ),
        }
    }

    let children = report
        .records
        .len()
        .saturating_sub(report.generated());
    println!();
    println!(
        "  {} generated, {} skipped, {} failed",
        style(report.generated()).green(),
        style(report.skipped()).yellow(),
        style(report.failed()).red()
    );
    if children > 0 {
        println!("  {} child table types generated on demand", style(children).cyan());
    }
    for map in &report.map_files {
        println!("  {} {}", style("📁").dim(), style(map.display()).cyan());
    }
    if !report.index_files.is_empty() {
        println!("  {} index files written", style(report.index_files.len()).cyan());
    }
}
