use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, info_span};

use ripper_extract::find_and_rip_files;
use ripper_model::{FileDefinition, FileInstance};

use crate::cli::{CheckArgs, ExecArgs};
use crate::summary::{print_check_summary, print_pass_summary};

/// The outcome of one batch pass over one definition.
pub struct BatchOutcome {
    /// Position of the definition in the definitions file (1-based).
    pub definition: usize,
    pub file_type: String,
    pub instances: Vec<FileInstance>,
}

/// The outcome of one full pass over all definitions.
pub struct PassResult {
    pub batches: Vec<BatchOutcome>,
}

impl PassResult {
    pub fn total_files(&self) -> usize {
        self.batches.iter().map(|b| b.instances.len()).sum()
    }

    pub fn total_records(&self) -> usize {
        self.batches
            .iter()
            .flat_map(|b| &b.instances)
            .map(FileInstance::len)
            .sum()
    }
}

/// Load and validate every file definition in a JSON definitions file.
///
/// The file holds either a single definition object or an array of them.
pub fn load_definitions(path: &Path) -> Result<Vec<FileDefinition>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read definitions file {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("parse definitions file {}", path.display()))?;
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    if items.is_empty() {
        anyhow::bail!("definitions file {} is empty", path.display());
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            FileDefinition::from_value(item)
                .with_context(|| format!("definition {} is invalid", index + 1))
        })
        .collect()
}

/// Run one batch pass over every definition and exit.
pub fn run_exec_once(args: &ExecArgs) -> Result<PassResult> {
    let definitions = load_definitions(&args.definitions_file)?;
    run_pass(&definitions)
}

/// Run batch passes forever, sleeping between passes.
///
/// Returns only on error.
pub fn run_exec_continuously(args: &ExecArgs) -> Result<()> {
    let definitions = load_definitions(&args.definitions_file)?;
    let interval = Duration::from_secs(args.interval_minutes * 60);
    loop {
        let result = run_pass(&definitions)?;
        print_pass_summary(&result);
        info!(
            interval_minutes = args.interval_minutes,
            "pass complete, sleeping"
        );
        thread::sleep(interval);
    }
}

fn run_pass(definitions: &[FileDefinition]) -> Result<PassResult> {
    let mut batches = Vec::with_capacity(definitions.len());
    for (index, definition) in definitions.iter().enumerate() {
        let span = info_span!("batch", definition = index + 1);
        let _guard = span.enter();
        let instances = find_and_rip_files(definition)
            .with_context(|| format!("batch run for definition {}", index + 1))?;
        batches.push(BatchOutcome {
            definition: index + 1,
            file_type: definition.file_type().to_string(),
            instances,
        });
    }
    Ok(PassResult { batches })
}

/// Validate a definitions file and print what it declares.
pub fn run_check(args: &CheckArgs) -> Result<()> {
    let definitions = load_definitions(&args.definitions_file)?;
    print_check_summary(&definitions);
    Ok(())
}
