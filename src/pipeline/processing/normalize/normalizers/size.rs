use crate::constants::{SIZE_COLUMN, SIZE_STAGE, UNKNOWN};
use crate::error::Result;
use crate::pipeline::processing::normalize::{missing_value, split_pair, FieldNormalizer};
use crate::table::Value;

const OPEN_ENDED_SIZE: &str = "10000+ Employees";

/// Rewrites employee-count buckets (`1001 to 5000 employees` -> `1001-5000 Employees`)
pub struct SizeNormalizer;

impl SizeNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SizeNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn clean_size(raw: &str) -> Result<String> {
    if raw.contains(" to ") {
        let (low, high) = split_pair(SIZE_COLUMN, raw, raw, " to ")?;
        let range = format!("{}-{}", low, high);
        let (count, _) = split_pair(SIZE_COLUMN, raw, &range, "employees")?;
        Ok(format!("{} Employees", count.trim()))
    } else if raw.contains('+') {
        Ok(OPEN_ENDED_SIZE.to_string())
    } else {
        crate::metrics::normalize::fallback(SIZE_COLUMN);
        Ok(UNKNOWN.to_string())
    }
}

impl FieldNormalizer for SizeNormalizer {
    fn stage_name(&self) -> &'static str {
        SIZE_STAGE
    }

    fn column(&self) -> &'static str {
        SIZE_COLUMN
    }

    fn normalize(&self, value: &Value) -> Result<Value> {
        if value.is_missing() {
            return Err(missing_value(SIZE_COLUMN));
        }
        clean_size(&value.render()).map(Value::Text)
    }
}
