use tracing::info;

use crate::constants::{SENTINEL, SENTINEL_NUMBER, SENTINEL_STAGE, UNKNOWN};
use crate::error::Result;
use crate::pipeline::{Stage, StageOutput};
use crate::table::{Table, Value};

/// Replaces the `-1` sentinel with `Unknown` in every column
pub struct SentinelResolver;

impl SentinelResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SentinelResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// True for the sentinel as text (`-1`, `-1.0`) or as a number
pub fn is_sentinel(value: &Value) -> bool {
    match value {
        Value::Missing => false,
        Value::Number(n) => *n == SENTINEL_NUMBER,
        Value::Text(s) => s == SENTINEL || s.parse::<f64>() == Ok(SENTINEL_NUMBER),
    }
}

impl Stage for SentinelResolver {
    fn name(&self) -> &'static str {
        SENTINEL_STAGE
    }

    fn required_columns(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn apply(&self, mut table: Table) -> Result<StageOutput> {
        let replaced = table.map_cells(|value| is_sentinel(value).then(|| Value::text(UNKNOWN)));
        info!(replaced, "Resolved sentinel values");
        Ok(StageOutput::new(table, replaced))
    }
}
