use crate::constants::{COMPANY_NAME_COLUMN, NAME_STAGE};
use crate::error::Result;
use crate::pipeline::processing::normalize::FieldNormalizer;
use crate::table::Value;

/// Drops the rating line some exports append under the company name
pub struct NameNormalizer;

impl NameNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// First line of `raw`, trimmed
pub fn clean_name(raw: &str) -> &str {
    raw.split('\n').next().unwrap_or_default().trim()
}

impl FieldNormalizer for NameNormalizer {
    fn stage_name(&self) -> &'static str {
        NAME_STAGE
    }

    fn column(&self) -> &'static str {
        COMPANY_NAME_COLUMN
    }

    fn normalize(&self, value: &Value) -> Result<Value> {
        Ok(Value::text(clean_name(&value.render())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_rating_line() {
        assert_eq!(clean_name("Acme Corp\n3.5"), "Acme Corp");
        assert_eq!(clean_name("  Globex \r\n4.1"), "Globex");
    }

    #[test]
    fn test_single_line_is_trimmed() {
        assert_eq!(clean_name(" Initech "), "Initech");
    }

    #[test]
    fn test_non_text_values_are_coerced() {
        let normalizer = NameNormalizer::new();
        assert_eq!(normalizer.normalize(&Value::Number(42.5)).unwrap(), Value::text("42.5"));
        assert_eq!(normalizer.normalize(&Value::Missing).unwrap(), Value::text(""));
    }
}
