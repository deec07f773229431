use crate::constants::{HEADQUARTERS_COLUMN, HEADQUARTERS_STAGE, SENTINEL, UNKNOWN};
use crate::error::{CleanerError, Result};
use crate::pipeline::processing::normalize::{missing_value, FieldNormalizer};
use crate::table::Value;

/// Marker carried by US headquarters: `"<city>, <ST>, (US)"`
const US_MARKER: &str = "(US)";

/// Keeps only the city of a headquarters location
pub struct HeadquartersNormalizer;

impl HeadquartersNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeadquartersNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// City segment of `"<city>, <country>"` or `"<city>, <ST>, (US)"`.
///
/// The segment count is strict: anything else is a parse error.
pub fn clean_headquarters(raw: &str) -> Result<String> {
    if raw.contains(SENTINEL) {
        return Ok(UNKNOWN.to_string());
    }

    let expected = if raw.contains(US_MARKER) { 3 } else { 2 };
    let segments: Vec<&str> = raw.split(',').collect();
    if segments.len() != expected {
        return Err(CleanerError::parse(
            HEADQUARTERS_COLUMN,
            raw,
            format!(
                "expected {} comma-separated segments, found {}",
                expected,
                segments.len()
            ),
        ));
    }

    Ok(segments[0].to_string())
}

impl FieldNormalizer for HeadquartersNormalizer {
    fn stage_name(&self) -> &'static str {
        HEADQUARTERS_STAGE
    }

    fn column(&self) -> &'static str {
        HEADQUARTERS_COLUMN
    }

    fn normalize(&self, value: &Value) -> Result<Value> {
        if value.is_missing() {
            return Err(missing_value(HEADQUARTERS_COLUMN));
        }
        clean_headquarters(&value.render()).map(Value::Text)
    }
}
