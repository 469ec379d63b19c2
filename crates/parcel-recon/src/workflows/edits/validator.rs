use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use super::classifier::EditClassifier;
use super::domain::{ClassificationResult, EditIntentRecord, ReferenceRecord, VerdictTier};
use super::locator::RecordLocator;

const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Per-tier tally of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub by_tier: BTreeMap<VerdictTier, usize>,
}

impl ValidationSummary {
    fn record(&mut self, tier: VerdictTier) {
        self.total += 1;
        *self.by_tier.entry(tier).or_default() += 1;
    }

    pub fn count(&self, tier: VerdictTier) -> usize {
        self.by_tier.get(&tier).copied().unwrap_or(0)
    }
}

/// Results index-aligned with the intents that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationRun {
    pub results: Vec<ClassificationResult>,
    pub summary: ValidationSummary,
}

/// Runs locate + classify over a whole edit feed.
#[derive(Debug, Clone)]
pub struct EditFeedValidator {
    classifier: EditClassifier,
    progress_interval: usize,
}

impl Default for EditFeedValidator {
    fn default() -> Self {
        Self::new(EditClassifier::default())
    }
}

impl EditFeedValidator {
    pub fn new(classifier: EditClassifier) -> Self {
        Self {
            classifier,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn validate(
        &self,
        intents: &[EditIntentRecord],
        registry: &[ReferenceRecord],
    ) -> ValidationRun {
        let locator = RecordLocator::new(registry);
        let total = intents.len();
        let mut results = Vec::with_capacity(total);
        let mut summary = ValidationSummary::default();

        info!(total, registry = registry.len(), "validating edit feed");

        for (index, intent) in intents.iter().enumerate() {
            let located = locator.locate_with_key(&intent.identifier);
            if located.is_none() {
                debug!(row = index, identifier = %intent.identifier.describe(), "no registry match");
            }

            let result = self
                .classifier
                .classify(intent, located.map(|hit| hit.record));
            summary.record(result.tier);
            results.push(result);

            let processed = index + 1;
            if processed % self.progress_interval == 0 || processed == total {
                info!("processed {processed}/{total} records");
            }
        }

        ValidationRun { results, summary }
    }
}
