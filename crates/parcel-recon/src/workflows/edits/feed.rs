//! Edit feed plumbing: fetch the CSV, map rows to intents, write the annotated copy back.

use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;

use serde::Deserialize;

use super::domain::{
    AddressComponents, ClassificationResult, EditIntentRecord, PropertyIdentifier,
};
use crate::workflows::text::optional_text;

/// Column appended to every row of the annotated feed.
pub const VALIDATION_COLUMN: &str = "validation_status";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read edit feed {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to download edit feed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("invalid edit feed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("edit feed {location} is empty")]
    Empty { location: String },
    #[error("edit feed row {row} has {fields} fields but the header has {columns}")]
    RowTooLong {
        row: usize,
        fields: usize,
        columns: usize,
    },
    #[error("expected {rows} classification results, got {results}")]
    ResultCountMismatch { rows: usize, results: usize },
    #[error("failed to write annotated feed: {0}")]
    Output(std::io::Error),
}

/// Where the edit feed is retrieved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Path(PathBuf),
    Url(String),
}

impl FeedLocation {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lowered = trimmed.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    /// Raw feed bytes with any UTF-8 BOM removed.
    pub async fn fetch(&self) -> Result<Vec<u8>, FeedError> {
        let bytes = match self {
            FeedLocation::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| FeedError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            FeedLocation::Url(url) => reqwest::get(url)
                .await?
                .error_for_status()?
                .bytes()
                .await?
                .to_vec(),
        };

        let content = strip_bom(&bytes);
        if content.iter().all(u8::is_ascii_whitespace) {
            return Err(FeedError::Empty {
                location: self.to_string(),
            });
        }

        Ok(content.to_vec())
    }

    pub async fn load(&self) -> Result<EditFeed, FeedError> {
        let bytes = self.fetch().await?;
        EditFeed::from_reader(bytes.as_slice())
    }
}

impl fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedLocation::Path(path) => write!(f, "{}", path.display()),
            FeedLocation::Url(url) => write!(f, "{url}"),
        }
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// A parsed edit feed that remembers its original rows for write-back.
///
/// Cell values are kept verbatim; only header names are trimmed.
#[derive(Debug, Clone)]
pub struct EditFeed {
    headers: csv::StringRecord,
    rows: Vec<csv::StringRecord>,
    intents: Vec<EditIntentRecord>,
}

impl EditFeed {
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, FeedError> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw).map_err(csv::Error::from)?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(strip_bom(&raw));
        let headers = csv_reader.headers()?.clone();
        let columns = headers.len();
        let mut rows = Vec::new();
        let mut intents = Vec::new();

        for (index, record) in csv_reader.records().enumerate() {
            let mut record = record?;
            if record.len() > columns {
                return Err(FeedError::RowTooLong {
                    row: index + 1,
                    fields: record.len(),
                    columns,
                });
            }
            // Short rows are padded so the verdict lands under its own header.
            while record.len() < columns {
                record.push_field("");
            }
            let row: FeedRow = record.deserialize(Some(&headers))?;
            intents.push(row.into_intent());
            rows.push(record);
        }

        Ok(Self {
            headers,
            rows,
            intents,
        })
    }

    pub fn intents(&self) -> &[EditIntentRecord] {
        &self.intents
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-emits every original row with the verdict message in [`VALIDATION_COLUMN`].
    pub fn write_validated<W: Write>(
        &self,
        results: &[ClassificationResult],
        writer: W,
    ) -> Result<(), FeedError> {
        if results.len() != self.rows.len() {
            return Err(FeedError::ResultCountMismatch {
                rows: self.rows.len(),
                results: results.len(),
            });
        }

        let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        let mut header = self.headers.clone();
        header.push_field(VALIDATION_COLUMN);
        csv_writer.write_record(&header)?;

        for (row, result) in self.rows.iter().zip(results) {
            let mut annotated = row.clone();
            annotated.push_field(&result.message);
            csv_writer.write_record(&annotated)?;
        }

        csv_writer.flush().map_err(FeedError::Output)
    }
}

#[derive(Debug, Deserialize)]
struct FeedRow {
    #[serde(default, deserialize_with = "optional_text")]
    propnum: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    spi: Option<String>,
    #[serde(default, alias = "property pfi", deserialize_with = "optional_text")]
    property_pfi: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    edit_code: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    comments: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    plan_number: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    blg_unit_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    blg_unit_id_1: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    house_number_1: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    house_suffix_1: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    road_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    road_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    locality_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    council_val: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    vicmap_val: Option<String>,
}

impl FeedRow {
    fn into_intent(self) -> EditIntentRecord {
        EditIntentRecord {
            identifier: PropertyIdentifier {
                primary_key: self.propnum,
                alternate_key: self.spi,
                secondary_key: self.property_pfi,
            },
            edit_code: self.edit_code.unwrap_or_default(),
            address: AddressComponents {
                unit_type: self.blg_unit_type,
                unit_id: self.blg_unit_id_1,
                house_number: self.house_number_1,
                house_suffix: self.house_suffix_1,
                road_name: self.road_name,
                road_type: self.road_type,
                locality: self.locality_name,
                full_override: self.council_val,
            },
            comments: self.comments.unwrap_or_default(),
            plan_number: self.plan_number,
            reference_value: self.vicmap_val,
        }
    }
}
