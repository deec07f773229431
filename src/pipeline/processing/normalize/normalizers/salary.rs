use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::constants::{SALARY_COLUMN, SALARY_STAGE};
use crate::error::Result;
use crate::pipeline::processing::normalize::FieldNormalizer;
use crate::table::Value;

/// `$30K-$60K`, with the second dollar sign optional
static SALARY_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\d+)K-\$?(\d+)K").expect("salary range pattern is valid"));

/// Replaces a salary range with its midpoint in dollars (`$30K-$60K` -> `$45,000.00`)
pub struct SalaryNormalizer;

impl SalaryNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SalaryNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Midpoint of the first `$<low>K-$<high>K` range found in `raw`
pub fn average_salary(raw: &str) -> Option<f64> {
    let caps = SALARY_RANGE.captures(raw)?;
    let low: f64 = caps[1].parse().ok()?;
    let high: f64 = caps[2].parse().ok()?;
    Some((low + high) / 2.0 * 1000.0)
}

/// Dollar amount with thousands separators and two decimals
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("${}{}.{}", sign, grouped, cents)
}

/// Formatted midpoint, or `None` when `raw` holds no salary range
pub fn clean_salary(raw: &str) -> Option<String> {
    average_salary(raw).map(format_currency)
}

impl FieldNormalizer for SalaryNormalizer {
    fn stage_name(&self) -> &'static str {
        SALARY_STAGE
    }

    fn column(&self) -> &'static str {
        SALARY_COLUMN
    }

    fn normalize(&self, value: &Value) -> Result<Value> {
        if value.is_missing() {
            return Ok(Value::Missing);
        }

        let raw = value.render();
        match clean_salary(&raw) {
            Some(cleaned) => Ok(Value::Text(cleaned)),
            None => {
                debug!(value = %raw, "No salary range found, leaving value missing");
                crate::metrics::normalize::fallback(SALARY_COLUMN);
                Ok(Value::Missing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_of_range() {
        assert_eq!(clean_salary("$30K-$60K").as_deref(), Some("$45,000.00"));
        assert_eq!(clean_salary("$137K-$171K").as_deref(), Some("$154,000.00"));
    }

    #[test]
    fn test_ignores_trailing_source_note() {
        assert_eq!(
            clean_salary("$111K-$181K (Glassdoor est.)").as_deref(),
            Some("$146,000.00")
        );
    }

    #[test]
    fn test_optional_dollar_on_upper_bound() {
        assert_eq!(clean_salary("$75K-131K").as_deref(), Some("$103,000.00"));
    }

    #[test]
    fn test_odd_sum_keeps_cents_format() {
        assert_eq!(clean_salary("$31K-$60K").as_deref(), Some("$45,500.00"));
    }

    #[test]
    fn test_malformed_is_missing() {
        let normalizer = SalaryNormalizer::new();
        assert_eq!(normalizer.normalize(&Value::text("Competitive")).unwrap(), Value::Missing);
        assert_eq!(normalizer.normalize(&Value::text("-1")).unwrap(), Value::Missing);
        assert_eq!(normalizer.normalize(&Value::Missing).unwrap(), Value::Missing);
    }

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.0), "$999.00");
        assert_eq!(format_currency(1000.0), "$1,000.00");
        assert_eq!(format_currency(1_234_567.5), "$1,234,567.50");
    }

    #[test]
    fn test_every_well_formed_range_formats_midpoint() {
        for (low, high) in [(10u32, 20u32), (56, 97), (100, 250), (5, 5)] {
            let raw = format!("${}K-${}K", low, high);
            let expected = format_currency(f64::from(low + high) / 2.0 * 1000.0);
            assert_eq!(clean_salary(&raw), Some(expected));
        }
        assert_eq!(clean_salary("$56K-$97K").as_deref(), Some("$76,500.00"));
    }
}
