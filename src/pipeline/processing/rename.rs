use once_cell::sync::Lazy;
use regex::{NoExpand, Regex, RegexBuilder};
use tracing::info;

use crate::constants::RENAME_STAGE;
use crate::error::Result;
use crate::pipeline::{Stage, StageOutput};
use crate::table::Table;

/// Header substitutions, applied in order. Each one matches case-insensitively
/// anywhere in the header, and a header can be hit by several of them.
pub const RENAME_RULES: &[(&str, &str)] = &[
    ("id", "Unique ID"),
    ("Rating", "Company Rating"),
    ("Location", "Company Location"),
    ("Headquarters", "Headquarters Location"),
    ("Founded", "Date Founded"),
    ("Type of ownership", "Type of Ownership"),
    ("Size", "Number of Employees"),
    ("Revenue", "Revenue (USD)"),
];

static COMPILED_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    RENAME_RULES
        .iter()
        .map(|(pattern, replacement)| {
            let regex = RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
                .expect("escaped literal is a valid pattern");
            (regex, *replacement)
        })
        .collect()
});

/// Gives the headers longer, descriptive names. Cell values are untouched.
///
/// Not idempotent: a second pass rewrites `Unique ID` to `Unique Unique ID`.
pub struct ColumnRenamer;

impl ColumnRenamer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ColumnRenamer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn rename_header(header: &str) -> String {
    COMPILED_RULES
        .iter()
        .fold(header.to_string(), |current, (regex, replacement)| {
            regex.replace_all(&current, NoExpand(*replacement)).into_owned()
        })
}

impl Stage for ColumnRenamer {
    fn name(&self) -> &'static str {
        RENAME_STAGE
    }

    fn required_columns(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn plan(&self, columns: Vec<String>) -> Vec<String> {
        columns.iter().map(|c| rename_header(c)).collect()
    }

    fn apply(&self, mut table: Table) -> Result<StageOutput> {
        let renamed = table.rename_headers(rename_header);
        info!(renamed, "Renamed column headers");
        Ok(StageOutput::new(table, renamed))
    }
}
