use serde::{Deserialize, Serialize};

use crate::workflows::text::{optional_text, required_text};

/// One property in a full point-in-time snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(deserialize_with = "required_text")]
    pub propnum: String,
    #[serde(
        default,
        alias = "property_PFI",
        alias = "property_pfi",
        deserialize_with = "optional_text"
    )]
    pub pfi: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub spi: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub plan_number: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub lot_number: Option<String>,
    #[serde(default, alias = "address_full", deserialize_with = "required_text")]
    pub full_address: String,
}

impl PropertyRecord {
    pub fn new(propnum: impl Into<String>, full_address: impl Into<String>) -> Self {
        Self {
            propnum: propnum.into(),
            full_address: full_address.into(),
            ..Self::default()
        }
    }

    pub fn with_pfi(mut self, pfi: impl Into<String>) -> Self {
        self.pfi = Some(pfi.into());
        self
    }

    pub fn with_spi(mut self, spi: impl Into<String>) -> Self {
        self.spi = Some(spi.into());
        self
    }

    pub fn with_lot_on_plan(mut self, lot: impl Into<String>, plan: impl Into<String>) -> Self {
        self.lot_number = Some(lot.into());
        self.plan_number = Some(plan.into());
        self
    }

    /// Plan number, falling back to the plan half of a `lot\plan` SPI.
    pub fn plan(&self) -> Option<&str> {
        self.plan_number.as_deref().or_else(|| {
            self.spi
                .as_deref()
                .and_then(|spi| spi.rsplit_once('\\'))
                .map(|(_, plan)| plan.trim())
                .filter(|plan| !plan.is_empty())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    NewProperty,
    AddressUpdate,
    ImplicitRetirement,
    MissingFromCurrent,
}

impl ChangeCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ChangeCategory::NewProperty => "New Property (Subdivision)",
            ChangeCategory::AddressUpdate => "Address Update",
            ChangeCategory::ImplicitRetirement => "Parent Parcel (Implicitly Retired)",
            ChangeCategory::MissingFromCurrent => "Missing from Current Data",
        }
    }
}

/// Edit code a reviewer would submit to apply the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposedEditCode {
    /// Create property and address.
    #[serde(rename = "E")]
    CreateProperty,
    /// Site/address edit.
    #[serde(rename = "S")]
    SiteAddress,
    /// Handled automatically downstream.
    #[serde(rename = "none")]
    NoAction,
    #[serde(rename = "flag for review")]
    FlagForReview,
}

impl ProposedEditCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ProposedEditCode::CreateProperty => "E",
            ProposedEditCode::SiteAddress => "S",
            ProposedEditCode::NoAction => "none",
            ProposedEditCode::FlagForReview => "flag for review",
        }
    }
}

pub const PENDING_REVIEW: &str = "Pending";

/// One proposed change for human review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub category: ChangeCategory,
    pub justification: String,
    pub propnum: String,
    pub reference_pfi: Option<String>,
    pub attribute_changed: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub proposed_edit_code: ProposedEditCode,
    pub review_status: String,
    pub notes: String,
}
