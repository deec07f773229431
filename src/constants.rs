/// Column names as they appear in the raw listings export.
/// Every content stage matches on these exact (case-sensitive) names, so they
/// must all run before the renamer rewrites the headers.
pub const SALARY_COLUMN: &str = "Salary Estimate";
pub const RATING_COLUMN: &str = "Rating";
pub const LOCATION_COLUMN: &str = "Location";
pub const HEADQUARTERS_COLUMN: &str = "Headquarters";
pub const COMPANY_NAME_COLUMN: &str = "Company Name";
pub const SIZE_COLUMN: &str = "Size";
pub const REVENUE_COLUMN: &str = "Revenue";

/// Derived column appended by the score stage
pub const QUALITY_SCORE_COLUMN: &str = "Quality Score";

/// Dataset-wide marker for "unknown / not applicable"
pub const SENTINEL: &str = "-1";
pub const SENTINEL_NUMBER: f64 = -1.0;

/// Human-readable replacement for the sentinel and for unrecognized buckets
pub const UNKNOWN: &str = "Unknown";

/// Default output file for a full run
pub const DEFAULT_OUTPUT_FILE: &str = "cleaned_dataset.csv";

/// Suffix for per-stage debug snapshots (`salary_cleaned_dataset.csv`, ...)
pub const SNAPSHOT_SUFFIX: &str = "_cleaned_dataset.csv";

// Stage names, used by the registry and the CLI
pub const SALARY_STAGE: &str = "salary";
pub const LOCATION_STAGE: &str = "location";
pub const HEADQUARTERS_STAGE: &str = "headquarters";
pub const NAME_STAGE: &str = "name";
pub const SIZE_STAGE: &str = "size";
pub const REVENUE_STAGE: &str = "revenue";
pub const SCORE_STAGE: &str = "score";
pub const RENAME_STAGE: &str = "rename";
pub const SENTINEL_STAGE: &str = "sentinel";

/// Stages of a full clean, in execution order. `location` is deliberately absent.
pub fn default_stage_order() -> Vec<&'static str> {
    vec![
        SALARY_STAGE,
        HEADQUARTERS_STAGE,
        NAME_STAGE,
        SIZE_STAGE,
        REVENUE_STAGE,
        SCORE_STAGE,
        RENAME_STAGE,
        SENTINEL_STAGE,
    ]
}

/// Every stage that can be invoked by name, full-clean stages first
pub fn get_supported_stages() -> Vec<&'static str> {
    let mut stages = default_stage_order();
    stages.push(LOCATION_STAGE);
    stages
}
