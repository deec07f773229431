use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{LOCATION_COLUMN, LOCATION_STAGE};
use crate::error::Result;
use crate::pipeline::processing::normalize::FieldNormalizer;
use crate::table::Value;

static STATE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([A-Za-z]{2})").expect("state suffix pattern is valid"));

/// Reduces `"<city>, <ST>"` to the two-letter state code.
///
/// Not part of the full clean; run it on its own through the `location` stage.
pub struct LocationNormalizer;

impl LocationNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocationNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn extract_state(raw: &str) -> Option<&str> {
    STATE_SUFFIX
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl FieldNormalizer for LocationNormalizer {
    fn stage_name(&self) -> &'static str {
        LOCATION_STAGE
    }

    fn column(&self) -> &'static str {
        LOCATION_COLUMN
    }

    fn normalize(&self, value: &Value) -> Result<Value> {
        let raw = value.render();
        Ok(match extract_state(&raw) {
            Some(state) => Value::text(state),
            None => {
                crate::metrics::normalize::fallback(LOCATION_COLUMN);
                Value::Missing
            }
        })
    }
}
