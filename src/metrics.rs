//! Cleaner metrics
//!
//! Counters and histograms emitted through the `metrics` facade. Nothing is
//! exported unless the embedding application installs a recorder.

pub mod stages {
    /// Record one completed stage
    pub fn record_stage(stage: &'static str, rows: usize, cells_changed: usize, duration_secs: f64) {
        ::metrics::counter!("cleaner_stage_runs_total", "stage" => stage).increment(1);
        ::metrics::counter!("cleaner_rows_processed_total", "stage" => stage).increment(rows as u64);
        ::metrics::counter!("cleaner_cells_changed_total", "stage" => stage)
            .increment(cells_changed as u64);
        ::metrics::histogram!("cleaner_stage_duration_seconds", "stage" => stage)
            .record(duration_secs);
    }

    /// Record a stage that aborted the run
    pub fn record_stage_failure(stage: &'static str) {
        ::metrics::counter!("cleaner_stage_failures_total", "stage" => stage).increment(1);
    }
}

pub mod normalize {
    /// A cell whose shape no rule accepts
    pub fn parse_error(column: &'static str) {
        ::metrics::counter!("cleaner_parse_errors_total", "column" => column).increment(1);
    }

    /// A cell mapped to a defined fallback (`Unknown` or missing)
    pub fn fallback(column: &'static str) {
        ::metrics::counter!("cleaner_fallbacks_total", "column" => column).increment(1);
    }
}

pub mod runs {
    pub fn record_run(rows: usize, duration_secs: f64) {
        ::metrics::counter!("cleaner_runs_total").increment(1);
        ::metrics::histogram!("cleaner_run_rows").record(rows as f64);
        ::metrics::histogram!("cleaner_run_duration_seconds").record(duration_secs);
    }
}
