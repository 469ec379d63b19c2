use metrics_exporter_prometheus::PrometheusHandle;
use parcel_recon::error::AppError;
use parcel_recon::workflows::edits::ClassifierRules;
use parcel_recon::workflows::source::{CsvFileSource, DataSource, InMemorySource};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads records from a CSV when a path is given, otherwise from the bundled fallback.
pub(crate) fn load_records<T>(
    path: Option<&Path>,
    fallback: InMemorySource<T>,
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let source: Box<dyn DataSource<Record = T>> = match path {
        Some(path) => Box::new(CsvFileSource::<T>::new(path)),
        None => Box::new(fallback),
    };
    let records = source.load()?;
    info!(source = source.name(), records = records.len(), "records loaded");
    Ok(records)
}

pub(crate) fn load_rules(path: Option<&Path>) -> Result<ClassifierRules, AppError> {
    match path {
        Some(path) => {
            let rules = ClassifierRules::from_path(path)?;
            info!(path = %path.display(), "classifier rules loaded");
            Ok(rules)
        }
        None => Ok(ClassifierRules::standard()),
    }
}
