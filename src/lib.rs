pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod table;

pub use config::Config;
pub use error::{CleanerError, Result};
pub use pipeline::{clean_all, Cleaner, Pipeline, PipelineReport, Stage, StageRegistry};
pub use table::{Table, Value};
