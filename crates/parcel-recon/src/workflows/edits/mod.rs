//! Edit feed triage: locate each feed row in the registry, then classify the intended edit.
//!
//! Nothing here mutates either data set. Verdicts are advisory and are written back to an
//! annotated copy of the feed for a human reviewer.

pub mod classifier;
pub mod domain;
pub mod feed;
pub mod locator;
pub mod validator;

#[cfg(test)]
mod tests;

pub use classifier::{classify, CategoryRules, ClassifierRules, EditClassifier, RulesError};
pub use domain::{
    AddressComponents, ClassificationResult, EditCategory, EditIntentRecord, EvidenceHit,
    EvidenceSource, PropertyIdentifier, ReferenceRecord, RegistryStatus, VerdictTier,
};
pub use feed::{EditFeed, FeedError, FeedLocation, VALIDATION_COLUMN};
pub use locator::{locate, KeyKind, Located, RecordLocator};
pub use validator::{EditFeedValidator, ValidationRun, ValidationSummary};
