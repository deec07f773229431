// Cleaning pipeline: an ordered list of stages, each owning the table while it runs

pub mod cleaner;
pub mod processing;
pub mod registry;

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::ScoreConfig;
use crate::error::{CleanerError, Result};
use crate::table::Table;

pub use cleaner::{clean_all, Cleaner, PipelineReport};
pub use registry::StageRegistry;

/// Common trait for all pipeline stages
///
/// A stage declares the columns it needs and the columns it adds, so the
/// pipeline can check the whole column flow before touching any data.
pub trait Stage: Send + Sync {
    /// Get the name of this stage
    fn name(&self) -> &'static str;

    /// Columns that must exist when this stage starts
    fn required_columns(&self) -> Vec<&'static str>;

    /// Columns this stage appends
    fn produced_columns(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// The column set after this stage, given the column set before it
    fn plan(&self, mut columns: Vec<String>) -> Vec<String> {
        columns.extend(self.produced_columns().into_iter().map(String::from));
        columns
    }

    /// Transform the table
    fn apply(&self, table: Table) -> Result<StageOutput>;
}

/// What a stage hands to the next one
#[derive(Debug)]
pub struct StageOutput {
    pub table: Table,
    pub cells_changed: usize,
}

impl StageOutput {
    pub fn new(table: Table, cells_changed: usize) -> Self {
        Self {
            table,
            cells_changed,
        }
    }
}

/// Result of executing a single stage
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub rows: usize,
    pub cells_changed: usize,
    pub duration_secs: f64,
}

/// A fixed-order sequence of stages
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// The full clean: every stage except the location normalizer, in the
    /// order the column dependencies require
    pub fn clean_all(score: &ScoreConfig) -> Result<Self> {
        let registry = StageRegistry::new(score.clone());
        Self::from_order(&registry, &crate::constants::default_stage_order())
    }

    /// Build the named stages in order. Every name must be registered.
    pub fn from_order(registry: &StageRegistry, names: &[&str]) -> Result<Self> {
        let stages = names
            .iter()
            .map(|name| registry.get(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(stages))
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Walk the column flow without touching data. Fails on the first stage
    /// whose required columns would not exist when it runs.
    pub fn validate(&self, headers: &[String]) -> Result<()> {
        let mut columns = headers.to_vec();
        for stage in &self.stages {
            for required in stage.required_columns() {
                if !columns.iter().any(|c| c == required) {
                    return Err(CleanerError::missing_column(stage.name(), required));
                }
            }
            for produced in stage.produced_columns() {
                if columns.iter().any(|c| c == produced) {
                    return Err(CleanerError::DuplicateColumn(produced.to_string()));
                }
            }
            columns = stage.plan(columns);
        }
        Ok(())
    }

    /// Run every stage in order
    pub fn run(&self, table: Table) -> Result<(Table, Vec<StageReport>)> {
        self.run_with(table, |_, _| Ok(()))
    }

    /// Run every stage in order, calling `after_stage` with each stage's output
    pub fn run_with<F>(&self, mut table: Table, mut after_stage: F) -> Result<(Table, Vec<StageReport>)>
    where
        F: FnMut(&dyn Stage, &Table) -> Result<()>,
    {
        let mut reports = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let name = stage.name();
            for required in stage.required_columns() {
                table.require_column(name, required)?;
            }

            info!(stage = name, rows = table.len(), "Running stage");
            let started = Instant::now();

            let output = match stage.apply(table) {
                Ok(output) => output,
                Err(e) => {
                    error!(stage = name, "Stage failed: {}", e);
                    crate::metrics::stages::record_stage_failure(name);
                    return Err(e);
                }
            };

            let duration_secs = started.elapsed().as_secs_f64();
            table = output.table;
            debug!(
                stage = name,
                cells_changed = output.cells_changed,
                "Stage finished in {:.3}s",
                duration_secs
            );
            crate::metrics::stages::record_stage(name, table.len(), output.cells_changed, duration_secs);

            reports.push(StageReport {
                stage: name.to_string(),
                rows: table.len(),
                cells_changed: output.cells_changed,
                duration_secs,
            });

            after_stage(stage.as_ref(), &table)?;
        }

        Ok((table, reports))
    }
}
