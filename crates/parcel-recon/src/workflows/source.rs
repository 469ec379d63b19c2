//! Suppliers of registry and snapshot records.

use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: csv::Error,
    },
    #[error("invalid record in {}: {source}", path.display())]
    Record {
        path: PathBuf,
        source: csv::Error,
    },
}

/// Anything that can hand over a full, ordered collection of records.
pub trait DataSource: Send + Sync {
    type Record;

    fn name(&self) -> &str;

    fn load(&self) -> Result<Vec<Self::Record>, DataSourceError>;
}

/// Fixed records held in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource<T> {
    name: String,
    records: Vec<T>,
}

impl<T> InMemorySource<T> {
    pub fn new(name: impl Into<String>, records: Vec<T>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl<T: Clone + Send + Sync> DataSource for InMemorySource<T> {
    type Record = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<T>, DataSourceError> {
        Ok(self.records.clone())
    }
}

/// Header-driven CSV file; column names map through the record's serde aliases.
#[derive(Debug, Clone)]
pub struct CsvFileSource<T> {
    path: PathBuf,
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> CsvFileSource<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> DataSource for CsvFileSource<T> {
    type Record = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<T>, DataSourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|source| DataSourceError::Open {
                path: self.path.clone(),
                source,
            })?;

        reader
            .deserialize()
            .map(|row| {
                row.map_err(|source| DataSourceError::Record {
                    path: self.path.clone(),
                    source,
                })
            })
            .collect()
    }
}
