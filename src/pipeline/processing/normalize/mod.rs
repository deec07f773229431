use tracing::debug;

use crate::error::{CleanerError, Result};
use crate::pipeline::{Stage, StageOutput};
use crate::table::{Table, Value};

pub mod normalizers;

pub use normalizers::{
    HeadquartersNormalizer, LocationNormalizer, NameNormalizer, RevenueNormalizer,
    SalaryNormalizer, SizeNormalizer,
};

/// Trait for normalizing the cells of a single column
///
/// Implementations are pure text-to-value transforms; they never look at
/// other cells or other rows.
pub trait FieldNormalizer: Send + Sync {
    /// Stage name this normalizer runs under
    fn stage_name(&self) -> &'static str;

    /// The column this normalizer rewrites
    fn column(&self) -> &'static str;

    /// Normalize one cell
    fn normalize(&self, value: &Value) -> Result<Value>;
}

/// Runs a field normalizer over every row of its column
pub struct NormalizeStage<N: FieldNormalizer> {
    inner: N,
}

impl<N: FieldNormalizer> NormalizeStage<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

impl<N: FieldNormalizer> Stage for NormalizeStage<N> {
    fn name(&self) -> &'static str {
        self.inner.stage_name()
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![self.inner.column()]
    }

    fn apply(&self, mut table: Table) -> Result<StageOutput> {
        let column = self.inner.column();
        let idx = table.require_column(self.name(), column)?;

        let changed = table.map_column(idx, |value| {
            self.inner.normalize(value).map_err(|e| {
                crate::metrics::normalize::parse_error(column);
                e
            })
        })?;

        debug!(column, changed, "Normalized column");
        Ok(StageOutput::new(table, changed))
    }
}

/// Split `text` on `delimiter`, requiring exactly two parts
pub(crate) fn split_pair<'a>(
    column: &str,
    raw: &str,
    text: &'a str,
    delimiter: &str,
) -> Result<(&'a str, &'a str)> {
    let mut parts = text.split(delimiter);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Ok((first, second)),
        _ => Err(CleanerError::parse(
            column,
            raw,
            format!(
                "expected exactly one {:?} delimiter, found {}",
                delimiter,
                text.matches(delimiter).count()
            ),
        )),
    }
}

/// A cell that a strict normalizer cannot work on
pub(crate) fn missing_value(column: &str) -> CleanerError {
    CleanerError::parse(column, "", "value is missing")
}
