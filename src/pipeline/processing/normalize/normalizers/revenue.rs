use crate::constants::{REVENUE_COLUMN, REVENUE_STAGE, UNKNOWN};
use crate::error::Result;
use crate::pipeline::processing::normalize::{missing_value, split_pair, FieldNormalizer};
use crate::table::Value;

const MILLION_ZEROS: &str = ",000,000";
const BILLION_ZEROS: &str = ",000,000,000";
const BELOW_ONE_MILLION: &str = "<$1,000,000";
const ABOVE_TEN_BILLION: &str = "$10,000,000,000+";

/// Spells out revenue buckets in whole dollars
/// (`$1 to $5 million (USD)` -> `$1,000,000-$5,000,000`)
pub struct RevenueNormalizer;

impl RevenueNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RevenueNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rules are checked in order: mixed-unit range, million range, billion
/// range, "Less than", open-ended "+", then `Unknown`.
pub fn clean_revenue(raw: &str) -> Result<String> {
    if raw.contains(" to ") {
        let million = raw.contains("million");
        let billion = raw.contains("billion");

        if million && billion {
            let (range, _) = split_pair(REVENUE_COLUMN, raw, raw, " (")?;
            Ok(range
                .replace(" million", MILLION_ZEROS)
                .replace(" billion", BILLION_ZEROS))
        } else if million {
            expand_single_unit(raw, " m", MILLION_ZEROS)
        } else if billion {
            expand_single_unit(raw, " b", BILLION_ZEROS)
        } else {
            crate::metrics::normalize::fallback(REVENUE_COLUMN);
            Ok(UNKNOWN.to_string())
        }
    } else if raw.contains("Less") {
        Ok(BELOW_ONE_MILLION.to_string())
    } else if raw.contains('+') {
        Ok(ABOVE_TEN_BILLION.to_string())
    } else {
        crate::metrics::normalize::fallback(REVENUE_COLUMN);
        Ok(UNKNOWN.to_string())
    }
}

/// `$<low> to $<high> <unit> (USD)` with one unit for both bounds.
/// `unit_marker` is the text where the unit word starts (" m" or " b").
fn expand_single_unit(raw: &str, unit_marker: &str, zeros: &str) -> Result<String> {
    let (low, high) = split_pair(REVENUE_COLUMN, raw, raw, " to ")?;
    let range = format!("{}{}-{}", low, zeros, high);
    let (bounds, _) = split_pair(REVENUE_COLUMN, raw, &range, unit_marker)?;
    Ok(format!("{}{}", bounds, zeros).trim().to_string())
}

impl FieldNormalizer for RevenueNormalizer {
    fn stage_name(&self) -> &'static str {
        REVENUE_STAGE
    }

    fn column(&self) -> &'static str {
        REVENUE_COLUMN
    }

    fn normalize(&self, value: &Value) -> Result<Value> {
        if value.is_missing() {
            return Err(missing_value(REVENUE_COLUMN));
        }
        clean_revenue(&value.render()).map(Value::Text)
    }
}
