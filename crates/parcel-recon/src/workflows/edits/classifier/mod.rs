mod config;
mod rules;

pub use config::{CategoryRules, ClassifierRules, RulesError};

use std::sync::OnceLock;

use super::domain::{
    ClassificationResult, EditCategory, EditIntentRecord, ReferenceRecord, VerdictTier,
};
use crate::workflows::text::excerpt;
use rules::{RowContext, Verdict};

/// Stateless classifier applying the keyword tables to one feed row at a time.
#[derive(Debug, Clone, Default)]
pub struct EditClassifier {
    rules: ClassifierRules,
}

impl EditClassifier {
    pub fn new(rules: ClassifierRules) -> Self {
        Self { rules }
    }

    /// Shared classifier over the built-in tables.
    pub fn standard() -> &'static EditClassifier {
        static STANDARD: OnceLock<EditClassifier> = OnceLock::new();
        STANDARD.get_or_init(EditClassifier::default)
    }

    pub fn category_for(&self, code: &str) -> EditCategory {
        self.rules.category_for(code)
    }

    /// Maps an edit intent and its resolved registry record to an advisory verdict.
    ///
    /// Never fails: a missing record yields [`VerdictTier::NotFound`], and every text field
    /// has already been normalized to a present/absent state by the time it gets here.
    pub fn classify(
        &self,
        intent: &EditIntentRecord,
        resolved: Option<&ReferenceRecord>,
    ) -> ClassificationResult {
        let normalized = intent.normalized_code();
        let code = if normalized.is_empty() {
            "none"
        } else {
            normalized.as_str()
        };
        let category = self.category_for(&normalized);
        let limit = self.rules.excerpt_chars;
        let comments_excerpt = excerpt(intent.comments.trim(), limit);

        let Some(record) = resolved else {
            return ClassificationResult {
                tier: VerdictTier::NotFound,
                category,
                message: format!(
                    "{}: {} ({code}) property ({}) not found in registry. Comments: '{}'",
                    VerdictTier::NotFound.label(),
                    category.label(),
                    intent.identifier.describe(),
                    comments_excerpt
                ),
                evidence: Vec::new(),
            };
        };

        let ctx = RowContext::new(code, intent, record);
        let category_rules = self.rules.rules_for(category);
        let Verdict {
            tier,
            outcome,
            evidence,
        } = match category {
            EditCategory::NewEntity => rules::new_entity(&ctx, category_rules),
            EditCategory::AddressChange => {
                rules::address_change(&ctx, category_rules, &self.rules.old_address_marker)
            }
            EditCategory::Retirement => rules::retirement(&ctx, category_rules),
            EditCategory::NoChange => rules::no_change(&ctx, category_rules),
            EditCategory::ReferenceUpdate => rules::reference_update(&ctx, category_rules),
            EditCategory::Unclassified => rules::unclassified(&ctx, &self.rules),
        };

        ClassificationResult {
            tier,
            category,
            message: format!(
                "{}: {} Memo: '{}' | Comments: '{}'",
                tier.label(),
                outcome,
                excerpt(record.memo.trim(), limit),
                comments_excerpt
            ),
            evidence,
        }
    }
}

/// Classifies with the built-in keyword tables.
pub fn classify(
    intent: &EditIntentRecord,
    resolved: Option<&ReferenceRecord>,
) -> ClassificationResult {
    EditClassifier::standard().classify(intent, resolved)
}
