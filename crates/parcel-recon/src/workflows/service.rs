//! Request/response layer shared by the HTTP router and the CLI.

use serde::{Deserialize, Serialize};

use super::edits::{
    ClassifierRules, EditClassifier, EditFeedValidator, EditIntentRecord, ReferenceRecord,
    RulesError, ValidationRun,
};
use super::samples;
use super::snapshots::{default_matcher, ChangeReport, PropertyRecord, SnapshotComparator};
use super::source::{CsvFileSource, DataSource, DataSourceError};
use crate::config::AppConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifyRequest {
    pub intents: Vec<EditIntentRecord>,
    /// Falls back to the service's registry when omitted.
    #[serde(default)]
    pub registry: Option<Vec<ReferenceRecord>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompareRequest {
    pub current: Vec<PropertyRecord>,
    pub reference: Vec<PropertyRecord>,
    /// Replaces the configured parent list for this request.
    #[serde(default)]
    pub known_parents: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error(transparent)]
    Source(#[from] DataSourceError),
}

/// Holds the classifier tables, default registry, and known parents for request handling.
#[derive(Debug, Clone)]
pub struct ReconciliationService {
    validator: EditFeedValidator,
    registry: Vec<ReferenceRecord>,
    known_parents: Vec<String>,
}

impl ReconciliationService {
    pub fn new(validator: EditFeedValidator, registry: Vec<ReferenceRecord>) -> Self {
        Self {
            validator,
            registry,
            known_parents: Vec::new(),
        }
    }

    pub fn with_known_parents(mut self, known_parents: Vec<String>) -> Self {
        self.known_parents = known_parents;
        self
    }

    /// Rules file, registry CSV, and parent list from configuration; samples fill the gaps.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let rules = match &config.rules_path {
            Some(path) => ClassifierRules::from_path(path)?,
            None => ClassifierRules::standard(),
        };
        let registry = match &config.registry_path {
            Some(path) => CsvFileSource::<ReferenceRecord>::new(path).load()?,
            None => samples::registry_source().load()?,
        };
        let validator = EditFeedValidator::new(EditClassifier::new(rules))
            .with_progress_interval(config.feed.progress_interval);

        Ok(Self::new(validator, registry).with_known_parents(config.known_parents.clone()))
    }

    pub fn registry(&self) -> &[ReferenceRecord] {
        &self.registry
    }

    pub fn known_parents(&self) -> &[String] {
        &self.known_parents
    }

    pub fn classify(&self, request: &ClassifyRequest) -> ValidationRun {
        let registry = request.registry.as_deref().unwrap_or(&self.registry);
        self.validator.validate(&request.intents, registry)
    }

    pub fn compare(&self, request: &CompareRequest) -> ChangeReport {
        let parents = request
            .known_parents
            .as_deref()
            .unwrap_or(&self.known_parents);
        SnapshotComparator::new(default_matcher(parents)).report(&request.current, &request.reference)
    }
}

impl Default for ReconciliationService {
    fn default() -> Self {
        Self::new(EditFeedValidator::default(), samples::registry_records())
    }
}
