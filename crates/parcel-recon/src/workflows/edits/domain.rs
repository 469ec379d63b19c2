use serde::{Deserialize, Deserializer, Serialize};

use crate::workflows::text::{
    collapse_whitespace, normalize_optional, optional_text, required_text,
};

/// The three cross-reference keys shared by the edit feed and the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyIdentifier {
    /// Principal property number (propnum).
    #[serde(default, deserialize_with = "optional_text")]
    pub primary_key: Option<String>,
    /// Composite lot/plan code (SPI).
    #[serde(default, deserialize_with = "optional_text")]
    pub alternate_key: Option<String>,
    /// Canonical feature identifier (PFI); registries may store a longer form.
    #[serde(default, deserialize_with = "optional_text")]
    pub secondary_key: Option<String>,
}

impl PropertyIdentifier {
    pub fn new(
        primary_key: Option<&str>,
        alternate_key: Option<&str>,
        secondary_key: Option<&str>,
    ) -> Self {
        Self {
            primary_key: normalize_optional(primary_key),
            alternate_key: normalize_optional(alternate_key),
            secondary_key: normalize_optional(secondary_key),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary_key.is_none() && self.alternate_key.is_none() && self.secondary_key.is_none()
    }

    /// Human readable `propnum/spi/pfi` triple used in not-found verdicts.
    pub fn describe(&self) -> String {
        let part = |value: &Option<String>| value.clone().unwrap_or_else(|| "n/a".to_string());
        format!(
            "propnum {}, spi {}, pfi {}",
            part(&self.primary_key),
            part(&self.alternate_key),
            part(&self.secondary_key)
        )
    }
}

/// Registry lifecycle state of a parcel or assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegistryStatus {
    Active,
    Inactive,
}

impl RegistryStatus {
    /// Registries use `C` (current) for active entries; anything unrecognised is inactive.
    pub fn from_code(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "c" | "a" | "current" | "active" => Self::Active,
            _ => Self::Inactive,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RegistryStatus::Active => "Active",
            RegistryStatus::Inactive => "Inactive",
        }
    }
}

impl<'de> Deserialize<'de> for RegistryStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_code(raw.as_deref().unwrap_or_default()))
    }
}

/// The authoritative registry's view of one parcel/assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    #[serde(default, alias = "propnum", deserialize_with = "optional_text")]
    pub primary_key: Option<String>,
    #[serde(default, alias = "spi", deserialize_with = "optional_text")]
    pub alternate_key: Option<String>,
    #[serde(
        default,
        alias = "property_pfi",
        alias = "property_PFI",
        deserialize_with = "optional_text"
    )]
    pub secondary_key: Option<String>,
    #[serde(
        default,
        alias = "address_full",
        alias = "full_address",
        deserialize_with = "required_text"
    )]
    pub address: String,
    pub status: RegistryStatus,
    #[serde(default, alias = "Memo", deserialize_with = "required_text")]
    pub memo: String,
    #[serde(default, alias = "lot_number", deserialize_with = "optional_text")]
    pub lot: Option<String>,
    #[serde(default, alias = "plan_number", deserialize_with = "optional_text")]
    pub plan: Option<String>,
}

impl ReferenceRecord {
    pub fn is_active(&self) -> bool {
        self.status == RegistryStatus::Active
    }
}

/// Structured address columns carried by an edit feed row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    #[serde(default, deserialize_with = "optional_text")]
    pub unit_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub unit_id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub house_number: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub house_suffix: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub road_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub road_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub locality: Option<String>,
    /// Free-form council value; replaces the constructed address when it looks complete.
    #[serde(default, deserialize_with = "optional_text")]
    pub full_override: Option<String>,
}

impl AddressComponents {
    /// Lower-cased, whitespace-collapsed address proposed by the feed row.
    pub fn proposed_address(&self) -> String {
        if let Some(candidate) = self.full_override.as_deref() {
            if looks_like_full_address(candidate) {
                return collapse_whitespace(candidate).to_lowercase();
            }
        }

        let mut parts: Vec<&str> = Vec::new();
        if let Some(unit_id) = self.unit_id.as_deref() {
            if let Some(unit_type) = self.unit_type.as_deref() {
                parts.push(unit_type);
            }
            parts.push(unit_id);
        }
        if let Some(number) = self.house_number.as_deref() {
            parts.push(number.strip_suffix(".0").unwrap_or(number));
        }
        for part in [
            &self.house_suffix,
            &self.road_name,
            &self.road_type,
            &self.locality,
        ]
        .into_iter()
        .flatten()
        {
            parts.push(part);
        }

        collapse_whitespace(&parts.join(" ")).to_lowercase()
    }
}

fn looks_like_full_address(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.chars().count() > 10
        && trimmed.chars().any(char::is_alphabetic)
        && trimmed.chars().any(|c| c.is_ascii_digit())
}

/// One row of the incoming property-edit feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditIntentRecord {
    #[serde(default)]
    pub identifier: PropertyIdentifier,
    /// Raw edit code as supplied by the feed; matched case-insensitively.
    #[serde(default, deserialize_with = "required_text")]
    pub edit_code: String,
    #[serde(default)]
    pub address: AddressComponents,
    #[serde(default, deserialize_with = "required_text")]
    pub comments: String,
    /// Plan the edit relates to; verbatim mentions in memo or comments count as evidence.
    #[serde(default, deserialize_with = "optional_text")]
    pub plan_number: Option<String>,
    /// Address currently held by the reference mapping (the "old" address).
    #[serde(default, deserialize_with = "optional_text")]
    pub reference_value: Option<String>,
}

impl EditIntentRecord {
    pub fn normalized_code(&self) -> String {
        self.edit_code.trim().to_ascii_uppercase()
    }
}

/// Edit-code families, each with its own evidence rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditCategory {
    NewEntity,
    AddressChange,
    Retirement,
    NoChange,
    ReferenceUpdate,
    Unclassified,
}

impl EditCategory {
    pub const fn label(self) -> &'static str {
        match self {
            EditCategory::NewEntity => "New/Related entity",
            EditCategory::AddressChange => "Address change",
            EditCategory::Retirement => "Retirement",
            EditCategory::NoChange => "No change",
            EditCategory::ReferenceUpdate => "Crefno update",
            EditCategory::Unclassified => "Unclassified edit",
        }
    }

    /// Snake-case name used as a table key in rules files.
    pub const fn key(self) -> &'static str {
        match self {
            EditCategory::NewEntity => "new_entity",
            EditCategory::AddressChange => "address_change",
            EditCategory::Retirement => "retirement",
            EditCategory::NoChange => "no_change",
            EditCategory::ReferenceUpdate => "reference_update",
            EditCategory::Unclassified => "unclassified",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        [
            EditCategory::NewEntity,
            EditCategory::AddressChange,
            EditCategory::Retirement,
            EditCategory::NoChange,
            EditCategory::ReferenceUpdate,
            EditCategory::Unclassified,
        ]
        .into_iter()
        .find(|category| category.key() == normalized)
    }
}

/// Verdict tier attached to every classified feed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictTier {
    Ok,
    Review,
    NeedsReview,
    NeedsGeneralReview,
    NotFound,
}

impl VerdictTier {
    pub const fn label(self) -> &'static str {
        match self {
            VerdictTier::Ok => "OK",
            VerdictTier::Review => "Review",
            VerdictTier::NeedsReview => "Needs Review",
            VerdictTier::NeedsGeneralReview => "Needs General Review",
            VerdictTier::NotFound => "Not Found",
        }
    }
}

/// Where a piece of corroborating (or contradicting) evidence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    Memo,
    Comments,
    Status,
    Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceHit {
    pub source: EvidenceSource,
    pub detail: String,
}

impl EvidenceHit {
    pub(crate) fn new(source: EvidenceSource, detail: impl Into<String>) -> Self {
        Self {
            source,
            detail: detail.into(),
        }
    }
}

/// Audit-grade verdict for a single feed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub tier: VerdictTier,
    pub category: EditCategory,
    pub message: String,
    pub evidence: Vec<EvidenceHit>,
}
