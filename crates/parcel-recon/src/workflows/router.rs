use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use super::edits::ValidationRun;
use super::service::{ClassifyRequest, CompareRequest, ReconciliationService};
use super::snapshots::ChangeReport;

/// Router exposing the edit classifier and snapshot comparator.
pub fn reconciliation_router(service: Arc<ReconciliationService>) -> Router {
    Router::new()
        .route("/api/v1/edits/classify", post(classify_handler))
        .route("/api/v1/snapshots/compare", post(compare_handler))
        .with_state(service)
}

pub(crate) async fn classify_handler(
    State(service): State<Arc<ReconciliationService>>,
    Json(request): Json<ClassifyRequest>,
) -> Json<ValidationRun> {
    Json(service.classify(&request))
}

pub(crate) async fn compare_handler(
    State(service): State<Arc<ReconciliationService>>,
    Json(request): Json<CompareRequest>,
) -> Json<ChangeReport> {
    Json(service.compare(&request))
}
