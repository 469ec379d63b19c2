//! Sample registry, snapshot, and feed records used by the demo command and tests.

use crate::workflows::edits::{
    AddressComponents, EditIntentRecord, PropertyIdentifier, ReferenceRecord, RegistryStatus,
};
use crate::workflows::snapshots::PropertyRecord;
use crate::workflows::source::InMemorySource;

/// Parent parcel the sample subdivision was cut from.
pub const SAMPLE_PARENT_SPI: &str = "1\\PS123456";

struct RegistryRow<'a> {
    propnum: &'a str,
    spi: &'a str,
    pfi: &'a str,
    address: &'a str,
    lot: Option<&'a str>,
    plan: Option<&'a str>,
    status: &'a str,
    memo: &'a str,
}

impl RegistryRow<'_> {
    fn build(&self) -> ReferenceRecord {
        ReferenceRecord {
            primary_key: Some(self.propnum.to_string()),
            alternate_key: Some(self.spi.to_string()),
            secondary_key: Some(self.pfi.to_string()),
            address: self.address.to_string(),
            status: RegistryStatus::from_code(self.status),
            memo: self.memo.to_string(),
            lot: self.lot.map(str::to_string),
            plan: self.plan.map(str::to_string),
        }
    }
}

pub fn registry_records() -> Vec<ReferenceRecord> {
    [
        RegistryRow {
            propnum: "171763.0",
            spi: "2\\PS828727",
            pfi: "PFI_RATES_171763",
            address: "71 GOWRIE STREET TATURA",
            lot: Some("2"),
            plan: Some("PS828727"),
            status: "C",
            memo: "New child parcel from subdivision PS828727. Processing complete. council approved.",
        },
        RegistryRow {
            propnum: "171764.0",
            spi: "1\\PS828727",
            pfi: "PFI_RATES_171764",
            address: "71a gowrie street tatura",
            lot: Some("1"),
            plan: Some("PS828727"),
            status: "C",
            memo: "Address allocation for 71A GOWRIE STREET TATURA completed 2024-05-01. Verified update.",
        },
        RegistryRow {
            propnum: "181833.0",
            spi: "1\\PS849482",
            pfi: "PFI_RATES_181833",
            address: "320 VERNEY ROAD SHEPPARTON NORTH",
            lot: None,
            plan: None,
            status: "C",
            memo: "Standard active property. No significant actions recorded recently.",
        },
        RegistryRow {
            propnum: "199533.0",
            spi: "3\\PS423158",
            pfi: "130692255.0",
            address: "OLD ADDRESS FOR 3\\PS423158",
            lot: Some("3"),
            plan: Some("PS423158"),
            status: "I",
            memo: "Parcel retired as per council resolution CR123/2024 on 2024-01-01. No longer active. Part of multi-assessment removal.",
        },
        RegistryRow {
            propnum: "1001",
            spi: "1\\PS123456",
            pfi: "PFI_RATES_1001",
            address: "10 OLD STREET, SHEPPARTON",
            lot: Some("1"),
            plan: Some("PS123456"),
            status: "C",
            memo: "Property active. Parent parcel for subdivision PS800001 initiated 2024-03-15. Children are props 2001, 2002. This parcel (1001) to be retired upon completion.",
        },
        RegistryRow {
            propnum: "3001",
            spi: "5\\LP67890",
            pfi: "PFI_RATES_3001",
            address: "25 MAIN ROAD, KIALLA",
            lot: Some("5"),
            plan: Some("LP67890"),
            status: "C",
            memo: "Address change request processed 2024-02-20. Old address: 25 OLD TRACK, KIALLA. Road name officially changed by council.",
        },
    ]
    .iter()
    .map(|row| row.build())
    .collect()
}

fn intent(
    identifier: PropertyIdentifier,
    edit_code: &str,
    comments: &str,
    plan_number: Option<&str>,
) -> EditIntentRecord {
    EditIntentRecord {
        identifier,
        edit_code: edit_code.to_string(),
        comments: comments.to_string(),
        plan_number: plan_number.map(str::to_string),
        ..EditIntentRecord::default()
    }
}

/// A small edit feed exercising every edit-code family against [`registry_records`].
pub fn edit_intents() -> Vec<EditIntentRecord> {
    let mut address_change = intent(
        PropertyIdentifier::new(Some("171764.0"), Some("1\\PS828727"), None),
        "S",
        "Assigning new address 71A",
        Some("PS828727"),
    );
    address_change.address = AddressComponents {
        house_number: Some("71.0".to_string()),
        house_suffix: Some("A".to_string()),
        road_name: Some("GOWRIE".to_string()),
        road_type: Some("STREET".to_string()),
        locality: Some("TATURA".to_string()),
        full_override: Some("71A Gowrie Street  Tatura".to_string()),
        ..AddressComponents::default()
    };

    let mut road_rename = intent(
        PropertyIdentifier::new(Some("3001"), None, None),
        "CHGADD",
        "Road name change",
        None,
    );
    road_rename.address = AddressComponents {
        house_number: Some("25".to_string()),
        road_name: Some("MAIN".to_string()),
        road_type: Some("ROAD".to_string()),
        locality: Some("KIALLA".to_string()),
        ..AddressComponents::default()
    };
    road_rename.reference_value = Some("25 OLD TRACK, KIALLA".to_string());

    vec![
        intent(
            PropertyIdentifier::new(Some("171763.0"), Some("2\\PS828727"), None),
            "A",
            "New child parcel from subdivision PS828727",
            Some("PS828727"),
        ),
        address_change,
        intent(
            PropertyIdentifier::new(Some("181833.0"), None, None),
            "NC",
            "",
            None,
        ),
        intent(
            PropertyIdentifier::new(Some("nan"), Some("3\\PS423158"), None),
            "R",
            "Removing propnum 199533 after consolidation",
            Some("PS423158"),
        ),
        intent(
            PropertyIdentifier::new(Some("1001"), None, None),
            "R",
            "Retiring parent after subdivision PS800001",
            Some("PS123456"),
        ),
        road_rename,
        intent(
            PropertyIdentifier::new(None, None, Some("RATES_181833")),
            "C",
            "Crefno updated",
            None,
        ),
        intent(
            PropertyIdentifier::new(Some("424242"), None, None),
            "ZZ",
            "Unknown property",
            None,
        ),
    ]
}

pub fn current_snapshot() -> Vec<PropertyRecord> {
    vec![
        PropertyRecord::new("7001", "1 INDEPENDENCE WAY, SPRINGFIELD")
            .with_spi("3\\PS800001")
            .with_lot_on_plan("3", "PS800001"),
        PropertyRecord::new("7002", "2 INDEPENDENCE WAY, SPRINGFIELD")
            .with_spi("4\\PS800001")
            .with_lot_on_plan("4", "PS800001"),
        PropertyRecord::new("5002", "10 MAIN ROAD, SPRINGFIELD")
            .with_spi("2\\PS123456")
            .with_lot_on_plan("2", "PS123456"),
        PropertyRecord::new("5003", "12 MAIN STREET, SPRINGFIELD")
            .with_spi("5\\LP55555")
            .with_lot_on_plan("5", "LP55555"),
    ]
}

pub fn reference_snapshot() -> Vec<PropertyRecord> {
    vec![
        PropertyRecord::new("6001", "10 OLD FARM ROAD, SPRINGFIELD")
            .with_pfi("PFI_6001")
            .with_spi(SAMPLE_PARENT_SPI),
        PropertyRecord::new("5002", "10 MAIN STREET, SPRINGFIELD")
            .with_pfi("PFI_5002")
            .with_spi("2\\PS123456"),
        PropertyRecord::new("5003", "12 MAIN STREET, SPRINGFIELD")
            .with_pfi("PFI_5003")
            .with_spi("5\\LP55555"),
        PropertyRecord::new("9999", "5 FORGOTTEN AVENUE, SPRINGFIELD")
            .with_pfi("PFI_9999")
            .with_spi("1\\LP98765"),
    ]
}

pub fn registry_source() -> InMemorySource<ReferenceRecord> {
    InMemorySource::new("sample registry", registry_records())
}

pub fn current_source() -> InMemorySource<PropertyRecord> {
    InMemorySource::new("sample current snapshot", current_snapshot())
}

pub fn reference_source() -> InMemorySource<PropertyRecord> {
    InMemorySource::new("sample reference snapshot", reference_snapshot())
}
