//! Pipeline driver: reads the listings file, runs the stages in order, and
//! writes the result only when every stage succeeded.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::constants::SNAPSHOT_SUFFIX;
use crate::error::{CleanerError, Result};
use crate::pipeline::{Pipeline, StageRegistry, StageReport};
use crate::table::Table;

/// Result of a complete cleaning run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_sha256: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rows: usize,
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json_content = serde_json::to_string_pretty(self)?;
        fs::write(path, json_content)?;
        Ok(())
    }
}

/// Main driver for cleaning listing files
pub struct Cleaner {
    config: Config,
    registry: StageRegistry,
}

impl std::fmt::Debug for Cleaner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cleaner")
            .field("config", &self.config)
            .field("stages", &self.registry.list_stages())
            .finish()
    }
}

impl Cleaner {
    pub fn new(config: Config) -> Result<Self> {
        config.score.validate()?;
        let registry = StageRegistry::new(config.score.clone());
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Clean `input` into the configured output file and return its path
    pub fn clean_all(&self, input: &Path) -> Result<PathBuf> {
        let output = self.config.output.path.clone();
        self.run(input, &output)?;
        Ok(output)
    }

    /// Run the full pipeline from `input` to `output`
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub fn run(&self, input: &Path, output: &Path) -> Result<PipelineReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let t_run = Instant::now();
        info!(%run_id, "Starting cleaning run");

        let bytes = fs::read(input)?;
        let input_sha256 = hex::encode(Sha256::digest(&bytes));
        let table = Table::from_reader(bytes.as_slice())?;
        info!(rows = table.len(), columns = table.headers().len(), "Loaded input table");

        let pipeline = Pipeline::clean_all(&self.config.score)?;
        pipeline.validate(table.headers())?;

        let snapshot_dir = self.config.output.intermediate_dir.as_deref();
        if let Some(dir) = snapshot_dir {
            fs::create_dir_all(dir)?;
        }

        let (table, stages) = pipeline.run_with(table, |stage, table| match snapshot_dir {
            Some(dir) => write_snapshot(dir, stage.name(), table),
            None => Ok(()),
        })?;

        write_atomically(&table, output)?;

        let duration_secs = t_run.elapsed().as_secs_f64();
        crate::metrics::runs::record_run(table.len(), duration_secs);
        info!(
            rows = table.len(),
            output = %output.display(),
            "Cleaning run finished in {:.3}s",
            duration_secs
        );

        Ok(PipelineReport {
            run_id,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            input_sha256,
            started_at,
            finished_at: Utc::now(),
            rows: table.len(),
            stages,
        })
    }

    /// Run one registered stage from `input` to `output`
    #[instrument(skip_all, fields(stage = name, input = %input.display(), output = %output.display()))]
    pub fn run_stage(&self, name: &str, input: &Path, output: &Path) -> Result<StageReport> {
        let stage = self.registry.get(name)?;
        let table = Table::from_path(input)?;

        let pipeline = Pipeline::new(vec![stage]);
        pipeline.validate(table.headers())?;
        let (table, mut reports) = pipeline.run(table)?;

        write_atomically(&table, output)?;
        reports
            .pop()
            .ok_or_else(|| CleanerError::Config(format!("stage '{}' produced no report", name)))
    }
}

/// Clean `input` with the default configuration, writing `cleaned_dataset.csv`
pub fn clean_all(input: &Path) -> Result<PathBuf> {
    Cleaner::new(Config::default())?.clean_all(input)
}

/// Write `table` next to `output` and move it into place once complete, so a
/// failed write never leaves a partial output file behind
fn write_atomically(table: &Table, output: &Path) -> Result<()> {
    let file_name = output
        .file_name()
        .ok_or_else(|| {
            CleanerError::Config(format!("output path has no file name: {}", output.display()))
        })?
        .to_string_lossy();
    let partial = output.with_file_name(format!(".{}.partial", file_name));

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    if let Err(e) = table.to_path(&partial).and_then(|_| Ok(fs::rename(&partial, output)?)) {
        if let Err(cleanup) = fs::remove_file(&partial) {
            warn!("Failed to remove partial output {}: {}", partial.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}

fn write_snapshot(dir: &Path, stage: &str, table: &Table) -> Result<()> {
    let path = dir.join(format!("{}{}", stage, SNAPSHOT_SUFFIX));
    table.to_path(&path)?;
    info!(stage, path = %path.display(), "Wrote stage snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomically_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let table = Table::new(vec!["a".into()]);

        write_atomically(&table, &output).unwrap();

        assert!(output.exists());
        assert!(!dir.path().join(".out.csv.partial").exists());
    }

    #[test]
    fn test_write_atomically_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("nested").join("out.csv");

        write_atomically(&Table::new(vec!["a".into()]), &output).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_output_without_file_name_is_rejected() {
        let err = write_atomically(&Table::new(vec![]), Path::new("/")).unwrap_err();
        assert!(matches!(err, CleanerError::Config(_)));
    }

    #[test]
    fn test_cleaner_rejects_invalid_score_config() {
        let mut config = Config::default();
        config.score.scale_max = 0.0;
        assert!(Cleaner::new(config).is_err());
    }
}
