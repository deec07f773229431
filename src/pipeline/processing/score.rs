//! Quality score: a 0-10 blend of normalized salary and company rating.
//!
//! Both rescaling steps use the min and max of the whole column, so the score
//! of one row depends on every other row.

use tracing::{info, warn};

use crate::config::ScoreConfig;
use crate::constants::{QUALITY_SCORE_COLUMN, RATING_COLUMN, SALARY_COLUMN, SCORE_STAGE, SENTINEL_NUMBER};
use crate::error::{CleanerError, Result};
use crate::pipeline::{Stage, StageOutput};
use crate::table::{Table, Value};

/// A company rating after the sentinel has been interpreted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Rated(f64),
    Unrated,
}

/// Appends the `Quality Score` column
pub struct QualityScoreStage {
    pub config: ScoreConfig,
}

impl QualityScoreStage {
    pub fn new() -> Self {
        Self {
            config: ScoreConfig::default(),
        }
    }

    pub fn with_config(config: ScoreConfig) -> Self {
        Self { config }
    }

    /// Score every row. `salaries` holds formatted salary cells, `ratings` raw
    /// rating cells; a row with no usable salary or rating gets no score.
    pub fn compute_scores(&self, salaries: &[&Value], ratings: &[&Value]) -> Result<Vec<Option<f64>>> {
        let salary_values: Vec<Option<f64>> = salaries.iter().map(|v| salary_to_number(v)).collect();
        let salary_norm = min_max_scale(&salary_values, 1.0);

        let raw_scores = salary_norm
            .iter()
            .zip(ratings)
            .map(|(salary, rating)| -> Result<Option<f64>> {
                let rating = parse_rating(rating)?;
                Ok(self.blend(*salary, rating))
            })
            .collect::<Result<Vec<_>>>()?;

        let factor = 10f64.powi(self.config.precision as i32);
        Ok(min_max_scale(&raw_scores, self.config.scale_max)
            .into_iter()
            .map(|score| score.map(|s| (s * factor).round_ties_even() / factor))
            .collect())
    }

    /// Weighted salary and rating; an unrated company is scored on salary alone
    fn blend(&self, salary_norm: Option<f64>, rating: Option<Rating>) -> Option<f64> {
        match (salary_norm?, rating?) {
            (salary, Rating::Unrated) => Some(salary),
            (salary, Rating::Rated(r)) => Some(
                self.config.salary_weight * salary
                    + self.config.rating_weight * (r / self.config.rating_scale),
            ),
        }
    }
}

impl Default for QualityScoreStage {
    fn default() -> Self {
        Self::new()
    }
}

/// Digits of a formatted salary read as one integer (`$45,000.00` -> 4500000).
/// The decimal point is dropped along with every other non-digit.
pub fn salary_to_number(value: &Value) -> Option<f64> {
    let digits: String = value
        .render()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Missing ratings stay `None`; text that is not a number cannot be scored
pub fn parse_rating(value: &Value) -> Result<Option<Rating>> {
    if value.is_missing() {
        return Ok(None);
    }
    match value.as_number() {
        Some(r) if r == SENTINEL_NUMBER => Ok(Some(Rating::Unrated)),
        Some(r) => Ok(Some(Rating::Rated(r))),
        None => Err(CleanerError::parse(
            RATING_COLUMN,
            &value.render(),
            "rating is not a number",
        )),
    }
}

/// Rescale present values to [0, upper] as `upper * (v - min) / (max - min)`.
/// When every present value is equal there is no spread to measure and each
/// one maps to 0.
pub fn min_max_scale(values: &[Option<f64>], upper: f64) -> Vec<Option<f64>> {
    let present = values.iter().flatten().copied();
    let min = present.clone().fold(f64::INFINITY, f64::min);
    let max = present.fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;

    values
        .iter()
        .map(|value| {
            value.map(|v| {
                if spread > 0.0 {
                    upper * (v - min) / spread
                } else {
                    0.0
                }
            })
        })
        .collect()
}

impl Stage for QualityScoreStage {
    fn name(&self) -> &'static str {
        SCORE_STAGE
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![SALARY_COLUMN, RATING_COLUMN]
    }

    fn produced_columns(&self) -> Vec<&'static str> {
        vec![QUALITY_SCORE_COLUMN]
    }

    fn apply(&self, mut table: Table) -> Result<StageOutput> {
        let salary_idx = table.require_column(SCORE_STAGE, SALARY_COLUMN)?;
        let rating_idx = table.require_column(SCORE_STAGE, RATING_COLUMN)?;

        let salaries: Vec<&Value> = table.rows().iter().map(|row| &row[salary_idx]).collect();
        let ratings: Vec<&Value> = table.rows().iter().map(|row| &row[rating_idx]).collect();
        let scores = self.compute_scores(&salaries, &ratings)?;

        let unscored = scores.iter().filter(|s| s.is_none()).count();
        if unscored > 0 {
            warn!(unscored, "Rows without a usable salary or rating get no quality score");
        }
        info!(rows = scores.len(), "Computed quality scores");

        let scored = scores.len() - unscored;
        let column = scores
            .into_iter()
            .map(|s| s.map(Value::Number).unwrap_or(Value::Missing))
            .collect();
        table.push_column(QUALITY_SCORE_COLUMN, column)?;

        Ok(StageOutput::new(table, scored))
    }
}
