//! Generation entry points and the guard policy around them.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use doctype_ts_core::{
    EnvironmentProvider, GenerationSettings, SchemaDescriptor, SchemaFilter, SchemaRegistry,
    SettingsProvider,
};

use super::compiler::{CompileOptions, SchemaCompiler};
use super::doctype_map::write_doctype_maps;
use super::index::write_indexes;
use super::pass::{GeneratedTypeRecord, GenerationPass};
use super::paths::resolve_output;
use super::Error;

/// Apps whose schemas are never generated from update notifications.
const CORE_APPS: &[&str] = &["frappe", "erpnext"];

/// Options fixed for the lifetime of a generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// App that single-schema and module passes generate for.
    pub app_name: String,
    /// Generate missing child table types on demand.
    pub generate_child_tables: bool,
    /// Include fields from custom field fixtures.
    pub custom_fields: bool,
    /// Write `index.ts` barrels into every output tree after a pass.
    pub write_indexes: bool,
}

impl GeneratorOptions {
    /// Options for an app with everything else off.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    pub fn with_child_tables(mut self, enabled: bool) -> Self {
        self.generate_child_tables = enabled;
        self
    }

    pub fn with_custom_fields(mut self, enabled: bool) -> Self {
        self.custom_fields = enabled;
        self
    }

    pub fn with_indexes(mut self, enabled: bool) -> Self {
        self.write_indexes = enabled;
        self
    }

    fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            generate_child_tables: self.generate_child_tables,
            custom_fields: self.custom_fields,
        }
    }
}

/// What happened to one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Type file written.
    Generated(PathBuf),
    /// Generation is paused in the environment.
    SkippedPaused,
    /// Developer mode is off.
    SkippedUnsafeMode,
    /// The schema is not eligible.
    SkippedInvalid(String),
    /// A migration, install, patch or setup wizard is running.
    SkippedBulkOperation,
    /// The schema belongs to a framework core app.
    SkippedCoreApp,
    /// No output directory could be resolved for the schema's app.
    SkippedUnconfigured,
    /// Generation was attempted and failed.
    Failed(String),
}

impl GenerationOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, GenerationOutcome::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        !self.is_generated() && !self.is_failed()
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationOutcome::Generated(path) => write!(f, "generated {}", path.display()),
            GenerationOutcome::SkippedPaused => write!(f, "skipped: generation paused"),
            GenerationOutcome::SkippedUnsafeMode => write!(f, "skipped: developer mode is off"),
            GenerationOutcome::SkippedInvalid(reason) => write!(f, "skipped: {}", reason),
            GenerationOutcome::SkippedBulkOperation => {
                write!(f, "skipped: bulk operation in progress")
            }
            GenerationOutcome::SkippedCoreApp => write!(f, "skipped: core app"),
            GenerationOutcome::SkippedUnconfigured => write!(f, "skipped: app not configured"),
            GenerationOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome of one schema within a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOutcome {
    pub doctype: String,
    pub outcome: GenerationOutcome,
}

/// Summary of a top-level generation call.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    /// Outcomes of the schemas the pass was asked for, in visiting order.
    pub outcomes: Vec<SchemaOutcome>,
    /// Every type file written, child tables included.
    pub records: Vec<GeneratedTypeRecord>,
    /// `DocTypeMap` files written at the end of the pass.
    pub map_files: Vec<PathBuf>,
    /// `index.ts` files written at the end of the pass.
    pub index_files: Vec<PathBuf>,
}

impl PassReport {
    pub fn generated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_generated()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_failed()).count()
    }

    /// Outcome for a schema, if the pass visited it.
    pub fn outcome(&self, doctype: &str) -> Option<&GenerationOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.doctype == doctype)
            .map(|o| &o.outcome)
    }
}

/// Generates TypeScript interfaces from a schema registry.
pub struct TypeGenerator {
    registry: Arc<dyn SchemaRegistry>,
    settings: Arc<dyn SettingsProvider>,
    environment: Arc<dyn EnvironmentProvider>,
    options: GeneratorOptions,
}

impl TypeGenerator {
    /// Create a new generator.
    pub fn new(
        registry: Arc<dyn SchemaRegistry>,
        settings: Arc<dyn SettingsProvider>,
        environment: Arc<dyn EnvironmentProvider>,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            registry,
            settings,
            environment,
            options,
        }
    }

    /// Generate the type file of one schema of the configured app.
    pub fn generate_doctype(&self, doctype: &str) -> Result<PassReport, Error> {
        let app = self.app_name()?;
        let mut pass = self.begin_pass()?;

        let outcome = self.generate_named(&mut pass, &app, doctype);
        Ok(self.finish_pass(pass, vec![outcome]))
    }

    /// Generate every schema of a module of the configured app, child tables
    /// first.
    pub fn generate_module(&self, module: &str) -> Result<PassReport, Error> {
        let app = self.app_name()?;
        let mut pass = self.begin_pass()?;

        tracing::info!(app = %app, module = %module, "Generating module types");
        let outcomes = self.generate_module_in(&mut pass, &app, module);
        Ok(self.finish_pass(pass, outcomes))
    }

    /// Generate every module of every configured app.
    pub fn export_all_apps(&self) -> Result<PassReport, Error> {
        let mut pass = self.begin_pass()?;
        let apps: Vec<String> = pass.settings().app_names().map(str::to_string).collect();

        let mut outcomes = Vec::new();
        for app in &apps {
            let modules = match self.registry.list_modules(app) {
                Ok(modules) => modules,
                Err(e) => {
                    tracing::error!(app = %app, error = %e, "Failed to list modules");
                    outcomes.push(SchemaOutcome {
                        doctype: app.clone(),
                        outcome: GenerationOutcome::Failed(e.to_string()),
                    });
                    continue;
                }
            };
            tracing::info!(app = %app, modules = modules.len(), "Exporting app types");
            for module in &modules {
                outcomes.extend(self.generate_module_in(&mut pass, app, module));
            }
        }
        Ok(self.finish_pass(pass, outcomes))
    }

    /// React to a schema being saved.
    ///
    /// The owning app is looked up from the schema's module.
    pub fn on_schema_update(&self, schema: &SchemaDescriptor) -> Result<GenerationOutcome, Error> {
        let mut pass = self.begin_pass()?;
        let app = self
            .registry
            .module_app(&schema.module)?
            .or_else(|| schema.app.clone())
            .unwrap_or_default();

        let outcome = self.generate_schema(&mut pass, &app, schema, true);
        let report = self.finish_pass(
            pass,
            vec![SchemaOutcome {
                doctype: schema.name.clone(),
                outcome,
            }],
        );
        Ok(report
            .outcomes
            .into_iter()
            .next()
            .map(|o| o.outcome)
            .unwrap_or(GenerationOutcome::SkippedUnconfigured))
    }

    fn app_name(&self) -> Result<String, Error> {
        let app = self.options.app_name.trim();
        if app.is_empty() {
            return Err(Error::InvalidArgument("app name is required".to_string()));
        }
        Ok(app.to_string())
    }

    fn begin_pass(&self) -> Result<GenerationPass, Error> {
        Ok(GenerationPass::new(self.settings.settings()?))
    }

    /// Child tables first, then the rest. A module whose schemas cannot be
    /// listed yields a single failed outcome named after the module.
    fn generate_module_in(
        &self,
        pass: &mut GenerationPass,
        app: &str,
        module: &str,
    ) -> Vec<SchemaOutcome> {
        let names = self
            .registry
            .list_schemas(&SchemaFilter::module(module, true))
            .and_then(|mut names| {
                names.extend(self.registry.list_schemas(&SchemaFilter::module(module, false))?);
                Ok(names)
            });

        match names {
            Ok(names) => names
                .iter()
                .map(|name| self.generate_named(pass, app, name))
                .collect(),
            Err(e) => {
                tracing::error!(module = %module, error = %e, "Failed to list module schemas");
                vec![SchemaOutcome {
                    doctype: module.to_string(),
                    outcome: GenerationOutcome::Failed(e.to_string()),
                }]
            }
        }
    }

    fn generate_named(&self, pass: &mut GenerationPass, app: &str, doctype: &str) -> SchemaOutcome {
        let outcome = match self.registry.get_schema(doctype) {
            Ok(Some(schema)) => self.generate_schema(pass, app, &schema, false),
            Ok(None) => {
                tracing::error!(doctype = %doctype, "Schema not found");
                GenerationOutcome::Failed(format!("schema not found: {}", doctype))
            }
            Err(e) => {
                tracing::error!(doctype = %doctype, error = %e, "Failed to load schema");
                GenerationOutcome::Failed(e.to_string())
            }
        };
        SchemaOutcome {
            doctype: doctype.to_string(),
            outcome,
        }
    }

    fn generate_schema(
        &self,
        pass: &mut GenerationPass,
        app: &str,
        schema: &SchemaDescriptor,
        on_update: bool,
    ) -> GenerationOutcome {
        let environment = match self.environment.environment() {
            Ok(environment) => environment,
            Err(e) => {
                tracing::error!(doctype = %schema.name, error = %e, "Failed to read environment");
                return GenerationOutcome::Failed(e.to_string());
            }
        };

        if environment.generation_paused {
            tracing::info!(doctype = %schema.name, "Type generation is paused");
            return GenerationOutcome::SkippedPaused;
        }
        if !environment.developer_mode {
            tracing::debug!(doctype = %schema.name, "Developer mode is off, skipping");
            return GenerationOutcome::SkippedUnsafeMode;
        }
        if let Some(reason) = invalid_reason(schema, pass.settings()) {
            tracing::info!(doctype = %schema.name, reason = %reason, "Ignoring schema");
            return GenerationOutcome::SkippedInvalid(reason);
        }
        if on_update {
            if environment.bulk_operation_in_progress {
                tracing::info!(
                    doctype = %schema.name,
                    "Skipping type generation during patch, migrate, install or setup wizard"
                );
                return GenerationOutcome::SkippedBulkOperation;
            }
            if CORE_APPS.contains(&app) {
                tracing::debug!(doctype = %schema.name, app = %app, "Ignoring core app schema");
                return GenerationOutcome::SkippedCoreApp;
            }
        }
        if app.is_empty() {
            tracing::info!(doctype = %schema.name, module = %schema.module, "No app owns module, skipping");
            return GenerationOutcome::SkippedUnconfigured;
        }

        let location = match resolve_output(app, &schema.module, pass.settings(), &environment) {
            Ok(Some(location)) => location,
            Ok(None) => return GenerationOutcome::SkippedUnconfigured,
            Err(e) => {
                tracing::error!(doctype = %schema.name, error = %e, "Failed to prepare output directory");
                return GenerationOutcome::Failed(e.to_string());
            }
        };
        pass.track_tree(&location.tree_root);

        tracing::info!(doctype = %schema.name, "Generating type definition file");
        let mut compiler =
            SchemaCompiler::new(self.registry.as_ref(), self.options.compile_options(), pass);
        match compiler.write_schema(schema, &location) {
            Ok(path) => GenerationOutcome::Generated(path),
            Err(e) => {
                tracing::error!(doctype = %schema.name, error = %e, "Type generation failed");
                GenerationOutcome::Failed(e.to_string())
            }
        }
    }

    /// Flush the pass's records into `DocTypeMap`s and optional indexes.
    fn finish_pass(&self, mut pass: GenerationPass, outcomes: Vec<SchemaOutcome>) -> PassReport {
        let extension = pass.settings().file_extension();
        let trees = pass.trees().to_vec();
        let records = pass.take_records();

        let map_files = if trees.is_empty() {
            Vec::new()
        } else {
            write_doctype_maps(&trees, &records, extension).unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to write DocTypeMap");
                Vec::new()
            })
        };

        let mut index_files = Vec::new();
        if self.options.write_indexes {
            for tree in &trees {
                match write_indexes(tree) {
                    Ok(files) => index_files.extend(files),
                    Err(e) => {
                        tracing::error!(tree = ?tree, error = %e, "Failed to write index files")
                    }
                }
            }
        }

        PassReport {
            outcomes,
            records,
            map_files,
            index_files,
        }
    }
}

/// Reason a schema is not eligible for generation, if any.
fn invalid_reason(schema: &SchemaDescriptor, settings: &GenerationSettings) -> Option<String> {
    if schema.is_virtual {
        return Some("virtual schema".to_string());
    }
    if schema.is_custom && !settings.include_custom_doctypes {
        return Some("custom schema".to_string());
    }
    None
}
