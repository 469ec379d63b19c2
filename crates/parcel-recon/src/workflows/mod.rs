pub mod edits;
pub mod router;
pub mod samples;
pub mod service;
pub mod snapshots;
pub mod source;
pub mod text;

pub use router::reconciliation_router;
pub use service::{ClassifyRequest, CompareRequest, ReconciliationService, ServiceError};
