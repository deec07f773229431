use std::collections::HashMap;

use crate::config::ScoreConfig;
use crate::constants::*;
use crate::error::{CleanerError, Result};
use crate::pipeline::processing::normalize::{
    HeadquartersNormalizer, LocationNormalizer, NameNormalizer, NormalizeStage,
    RevenueNormalizer, SalaryNormalizer, SizeNormalizer,
};
use crate::pipeline::processing::{ColumnRenamer, QualityScoreStage, SentinelResolver};
use crate::pipeline::Stage;

type StageFactory = Box<dyn Fn() -> Box<dyn Stage> + Send + Sync>;

/// Registry of every stage that can be run by name
pub struct StageRegistry {
    factories: HashMap<String, StageFactory>,
}

impl StageRegistry {
    /// Create a new registry with the built-in stages
    pub fn new(score: ScoreConfig) -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };

        registry.register(SALARY_STAGE, || Box::new(NormalizeStage::new(SalaryNormalizer::new())));
        registry.register(LOCATION_STAGE, || Box::new(NormalizeStage::new(LocationNormalizer::new())));
        registry.register(HEADQUARTERS_STAGE, || {
            Box::new(NormalizeStage::new(HeadquartersNormalizer::new()))
        });
        registry.register(NAME_STAGE, || Box::new(NormalizeStage::new(NameNormalizer::new())));
        registry.register(SIZE_STAGE, || Box::new(NormalizeStage::new(SizeNormalizer::new())));
        registry.register(REVENUE_STAGE, || Box::new(NormalizeStage::new(RevenueNormalizer::new())));
        registry.register(SCORE_STAGE, move || {
            Box::new(QualityScoreStage::with_config(score.clone()))
        });
        registry.register(RENAME_STAGE, || Box::new(ColumnRenamer::new()));
        registry.register(SENTINEL_STAGE, || Box::new(SentinelResolver::new()));

        registry
    }

    /// Register a stage under `name`, replacing any existing one
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Stage> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// Build a fresh instance of the stage registered under `name`
    pub fn build(&self, name: &str) -> Option<Box<dyn Stage>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Like `build`, but an unregistered name is an error
    pub fn get(&self, name: &str) -> Result<Box<dyn Stage>> {
        self.build(name)
            .ok_or_else(|| CleanerError::UnknownStage(name.to_string()))
    }

    /// Registered stage names: built-ins in pipeline order, then any extras sorted
    pub fn list_stages(&self) -> Vec<String> {
        let builtin = get_supported_stages();
        let mut names: Vec<String> = builtin
            .iter()
            .filter(|name| self.factories.contains_key(**name))
            .map(|name| name.to_string())
            .collect();

        let mut extras: Vec<String> = self
            .factories
            .keys()
            .filter(|name| !builtin.contains(&name.as_str()))
            .cloned()
            .collect();
        extras.sort();
        names.extend(extras);
        names
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::new(ScoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::StageOutput;
    use crate::table::Table;

    struct Passthrough;

    impl Stage for Passthrough {
        fn name(&self) -> &'static str {
            "passthrough"
        }

        fn required_columns(&self) -> Vec<&'static str> {
            Vec::new()
        }

        fn apply(&self, table: Table) -> Result<StageOutput> {
            Ok(StageOutput::new(table, 0))
        }
    }

    #[test]
    fn test_registry_has_built_in_stages() {
        let registry = StageRegistry::default();
        assert_eq!(
            registry.list_stages(),
            vec![
                "salary", "headquarters", "name", "size", "revenue", "score", "rename",
                "sentinel", "location"
            ]
        );
    }

    #[test]
    fn test_registry_returns_error_for_unknown_stage() {
        let registry = StageRegistry::default();
        let err = registry.get("unknown_stage").err().unwrap();
        assert!(matches!(err, CleanerError::UnknownStage(ref name) if name == "unknown_stage"));
    }

    #[test]
    fn test_built_stage_matches_name() {
        let registry = StageRegistry::default();
        for name in registry.list_stages() {
            assert_eq!(registry.get(&name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_location_declares_its_column() {
        let registry = StageRegistry::default();
        let stage = registry.get(LOCATION_STAGE).unwrap();
        assert_eq!(stage.required_columns(), vec!["Location"]);
    }

    #[test]
    fn test_register_extra_stage() {
        let mut registry = StageRegistry::default();
        registry.register("passthrough", || Box::new(Passthrough));

        assert_eq!(registry.list_stages().last().map(String::as_str), Some("passthrough"));
        assert!(registry.build("passthrough").is_some());
    }
}
