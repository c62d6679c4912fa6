//! State of one top-level generation call.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use doctype_ts_core::GenerationSettings;

use super::Error;

/// Progress of a schema within a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    NotStarted,
    InProgress,
    /// Written to the given file.
    Done(PathBuf),
}

/// A type file written during a pass, pending inclusion in a `DocTypeMap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTypeRecord {
    /// Original schema name.
    pub doctype: String,
    /// Generated TypeScript identifier.
    pub type_name: String,
    /// Root of the output tree the file lives in.
    pub tree_root: PathBuf,
    /// Path of the file relative to `tree_root`, `/`-separated, no extension.
    pub relative_path: String,
}

impl GeneratedTypeRecord {
    /// Import specifier relative to the tree root.
    pub fn import_path(&self) -> String {
        format!("./{}", self.relative_path)
    }
}

/// Visited-set, identifier claims and records for one pass.
#[derive(Debug)]
pub struct GenerationPass {
    settings: GenerationSettings,
    states: HashMap<String, GenerationState>,
    stack: Vec<String>,
    identifiers: HashMap<String, String>,
    records: Vec<GeneratedTypeRecord>,
    trees: Vec<PathBuf>,
}

impl GenerationPass {
    /// Start a pass against a settings snapshot.
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings,
            states: HashMap::new(),
            stack: Vec::new(),
            identifiers: HashMap::new(),
            records: Vec::new(),
            trees: Vec::new(),
        }
    }

    /// Settings the pass runs with.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Current state of a schema.
    pub fn state(&self, doctype: &str) -> GenerationState {
        self.states
            .get(doctype)
            .cloned()
            .unwrap_or(GenerationState::NotStarted)
    }

    /// Mark a schema as being generated and claim its identifier.
    ///
    /// Fails if the schema is already in progress further up the stack, or
    /// if another schema of this pass holds the identifier.
    pub fn begin(&mut self, doctype: &str, type_name: &str) -> Result<(), Error> {
        if self.state(doctype) == GenerationState::InProgress {
            return Err(self.cycle_error(doctype));
        }
        self.check_identifier(type_name, doctype)?;
        self.identifiers
            .insert(type_name.to_string(), doctype.to_string());
        self.states
            .insert(doctype.to_string(), GenerationState::InProgress);
        self.stack.push(doctype.to_string());
        Ok(())
    }

    /// Mark a schema as written and record it.
    pub fn finish(&mut self, record: GeneratedTypeRecord, path: PathBuf) {
        self.stack.retain(|d| d != &record.doctype);
        self.states
            .insert(record.doctype.clone(), GenerationState::Done(path));
        self.identifiers
            .insert(record.type_name.clone(), record.doctype.clone());
        self.records.push(record);
    }

    /// Roll a schema back to not started after a failure, releasing its
    /// identifier.
    pub fn abort(&mut self, doctype: &str) {
        self.stack.retain(|d| d != doctype);
        self.states.remove(doctype);
        self.identifiers.retain(|_, owner| owner != doctype);
    }

    /// Error describing the reference chain that leads back to `doctype`.
    pub fn cycle_error(&self, doctype: &str) -> Error {
        let start = self
            .stack
            .iter()
            .position(|d| d == doctype)
            .unwrap_or(0);
        let mut chain: Vec<&str> = self.stack[start..].iter().map(String::as_str).collect();
        chain.push(doctype);
        Error::Cycle {
            chain: chain.join(" -> "),
        }
    }

    /// Ensure no other schema in this pass produced the same identifier.
    pub fn check_identifier(&self, type_name: &str, doctype: &str) -> Result<(), Error> {
        match self.identifiers.get(type_name) {
            Some(existing) if existing != doctype => Err(Error::IdentifierCollision {
                identifier: type_name.to_string(),
                existing: existing.clone(),
                incoming: doctype.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Remember an output tree touched by this pass.
    pub fn track_tree(&mut self, tree_root: &Path) {
        if !self.trees.iter().any(|t| t == tree_root) {
            self.trees.push(tree_root.to_path_buf());
        }
    }

    /// Output trees touched by this pass, in first-seen order.
    pub fn trees(&self) -> &[PathBuf] {
        &self.trees
    }

    /// Records accumulated so far.
    pub fn records(&self) -> &[GeneratedTypeRecord] {
        &self.records
    }

    /// Drain the accumulated records.
    pub fn take_records(&mut self) -> Vec<GeneratedTypeRecord> {
        std::mem::take(&mut self.records)
    }
}
