// Pipeline processing: field normalization, scoring, and final cleanup

pub mod normalize;
pub mod rename;
pub mod score;
pub mod sentinel;

pub use normalize::{FieldNormalizer, NormalizeStage};
pub use rename::ColumnRenamer;
pub use score::QualityScoreStage;
pub use sentinel::SentinelResolver;
