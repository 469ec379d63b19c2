use crate::workflows::samples;
use crate::workflows::snapshots::{
    compare, default_matcher, ChangeCategory, KnownParentMatcher, PropertyRecord,
    ProposedEditCode, SnapshotComparator,
};

#[test]
fn unmatched_current_record_is_a_new_property() {
    let current = vec![PropertyRecord::new("7001", "1 INDEPENDENCE WAY")
        .with_lot_on_plan("3", "PS800001")];

    let changes = compare(&current, &[]);

    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert_eq!(change.category, ChangeCategory::NewProperty);
    assert_eq!(change.propnum, "7001");
    assert_eq!(change.proposed_edit_code, ProposedEditCode::CreateProperty);
    assert_eq!(change.attribute_changed, "ALL");
    assert_eq!(change.old_value, None);
    assert_eq!(change.new_value.as_deref(), Some("1 INDEPENDENCE WAY"));
    assert_eq!(change.review_status, "Pending");
    assert!(change.justification.contains("New lot 3 on plan PS800001"));
}

#[test]
fn differing_address_is_an_update() {
    let current = vec![PropertyRecord::new("5002", "10 MAIN ROAD")];
    let reference = vec![PropertyRecord::new("5002", "10 MAIN STREET").with_pfi("PFI_5002")];

    let changes = compare(&current, &reference);

    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert_eq!(change.category, ChangeCategory::AddressUpdate);
    assert_eq!(change.old_value.as_deref(), Some("10 MAIN STREET"));
    assert_eq!(change.new_value.as_deref(), Some("10 MAIN ROAD"));
    assert_eq!(change.reference_pfi.as_deref(), Some("PFI_5002"));
    assert_eq!(change.proposed_edit_code, ProposedEditCode::SiteAddress);
    assert_eq!(change.attribute_changed, "full_address");
}

#[test]
fn address_comparison_is_exact_and_case_sensitive() {
    let current = vec![
        PropertyRecord::new("1", "12 MAIN STREET"),
        PropertyRecord::new("2", "12 Main Street"),
    ];
    let reference = vec![
        PropertyRecord::new("1", "12 MAIN STREET"),
        PropertyRecord::new("2", "12 MAIN STREET"),
    ];

    let changes = compare(&current, &reference);

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].propnum, "2");
}

#[test]
fn reference_only_record_without_parent_match_is_flagged() {
    let reference = vec![PropertyRecord::new("9999", "5 FORGOTTEN AVENUE")
        .with_pfi("PFI_9999")
        .with_spi("1\\LP98765")];

    let changes = compare(&[], &reference);

    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert_eq!(change.category, ChangeCategory::MissingFromCurrent);
    assert_eq!(change.proposed_edit_code, ProposedEditCode::FlagForReview);
    assert_eq!(change.attribute_changed, "status");
    assert_eq!(change.old_value.as_deref(), Some("Active in reference"));
    assert_eq!(change.new_value.as_deref(), Some("Retired/Missing in current"));
    assert!(change.notes.contains("Manual investigation required"));
}

#[test]
fn known_parent_is_implicitly_retired() {
    let comparator = SnapshotComparator::new(KnownParentMatcher::new([samples::SAMPLE_PARENT_SPI]));

    let changes = comparator.compare(&[], &samples::reference_snapshot());

    let parent = changes
        .iter()
        .find(|change| change.propnum == "6001")
        .expect("parent reported");
    assert_eq!(parent.category, ChangeCategory::ImplicitRetirement);
    assert_eq!(parent.proposed_edit_code, ProposedEditCode::NoAction);
    assert!(parent.notes.is_empty());
    assert_eq!(parent.review_status, "Pending");
}

#[test]
fn sample_snapshots_produce_ordered_report() {
    let comparator = SnapshotComparator::new(default_matcher([samples::SAMPLE_PARENT_SPI]));

    let report = comparator.report(&samples::current_snapshot(), &samples::reference_snapshot());

    let observed: Vec<(ChangeCategory, &str)> = report
        .changes
        .iter()
        .map(|change| (change.category, change.propnum.as_str()))
        .collect();
    assert_eq!(
        observed,
        vec![
            (ChangeCategory::NewProperty, "7001"),
            (ChangeCategory::NewProperty, "7002"),
            (ChangeCategory::AddressUpdate, "5002"),
            (ChangeCategory::ImplicitRetirement, "6001"),
            (ChangeCategory::MissingFromCurrent, "9999"),
        ]
    );
    assert_eq!(report.count(ChangeCategory::NewProperty), 2);
    assert_eq!(report.count(ChangeCategory::MissingFromCurrent), 1);
}

#[test]
fn comparison_is_deterministic_and_leaves_inputs_untouched() {
    let current = samples::current_snapshot();
    let reference = samples::reference_snapshot();
    let comparator = SnapshotComparator::new(default_matcher(Vec::<String>::new()));

    let first = comparator.compare(&current, &reference);
    let second = comparator.compare(&current.clone(), &reference.clone());

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
    assert_eq!(current, samples::current_snapshot());
    assert_eq!(reference, samples::reference_snapshot());
}

#[test]
fn duplicate_keys_keep_first_occurrence() {
    let current = vec![
        PropertyRecord::new("5002", "10 MAIN ROAD"),
        PropertyRecord::new("5002", "99 OTHER ROAD"),
    ];
    let reference = vec![PropertyRecord::new("5002", "10 MAIN ROAD")];

    assert!(compare(&current, &reference).is_empty());
}

#[test]
fn change_records_serialize_review_codes() {
    let changes = compare(&[], &[PropertyRecord::new("9999", "5 FORGOTTEN AVENUE")]);

    let json = serde_json::to_value(&changes[0]).expect("change serializes");

    assert_eq!(json["category"], "missing_from_current");
    assert_eq!(json["proposed_edit_code"], "flag for review");
    assert_eq!(json["review_status"], "Pending");
    assert!(json["reference_pfi"].is_null());
}
