use super::common::*;
use crate::workflows::edits::classifier::{classify, ClassifierRules, EditClassifier, RulesError};
use crate::workflows::edits::domain::{
    AddressComponents, EditCategory, EditIntentRecord, EvidenceSource, PropertyIdentifier,
    VerdictTier,
};
use crate::workflows::edits::locator::locate;

#[test]
fn new_child_parcel_with_memo_evidence_is_ok() {
    let record = active(
        "171763.0",
        "New child parcel from subdivision PS828727. Processing complete. council approved.",
    );
    let intent = intent(
        "171763.0",
        "A",
        "New child parcel from subdivision PS828727 lodged by council",
    );

    let result = classify(&intent, Some(&record));

    assert_eq!(result.tier, VerdictTier::Ok);
    assert_eq!(result.category, EditCategory::NewEntity);
    assert!(
        result.message.starts_with("OK: New/Related entity (A) aligns with registry memo"),
        "unexpected message: {}",
        result.message
    );
    assert!(result
        .evidence
        .iter()
        .any(|hit| hit.source == EvidenceSource::Memo && hit.detail.contains("subdivision")));
}

#[test]
fn retirement_against_inactive_record_with_memo_is_ok() {
    let record = inactive(
        "199533.0",
        "Parcel retired as per council resolution CR123/2024 on 2024-01-01.",
    );
    let intent = intent("199533.0", "r", "");

    let result = classify(&intent, Some(&record));

    assert_eq!(result.tier, VerdictTier::Ok);
    assert_eq!(result.category, EditCategory::Retirement);
    assert!(result.message.contains("Inactive status and registry memo"));
    assert!(result.message.contains("(R)"));
    assert!(result
        .evidence
        .iter()
        .any(|hit| hit.source == EvidenceSource::Status && hit.detail.contains("Inactive")));
    assert!(result
        .evidence
        .iter()
        .any(|hit| hit.detail == "keyword 'retired'"));
}

#[test]
fn retirement_against_inactive_record_without_memo_detail_is_still_ok() {
    let record = inactive("5", "Transferred to new owner.");
    let result = classify(&intent("5", "DELPROP", ""), Some(&record));

    assert_eq!(result.tier, VerdictTier::Ok);
    assert!(result.message.contains("less specific"));
}

#[test]
fn retirement_against_active_record_is_downgraded() {
    let with_memo = active("1001", "Parent parcel for subdivision PS800001.");
    let result = classify(&intent("1001", "R", ""), Some(&with_memo));
    assert_eq!(result.tier, VerdictTier::Review);

    let plain = active("1001", "Standard property.");
    let comments_only = classify(&intent("1001", "RET", "Retiring after merge"), Some(&plain));
    assert_eq!(comments_only.tier, VerdictTier::Review);

    let nothing = classify(&intent("1001", "RET", "tidy up"), Some(&plain));
    assert_eq!(nothing.tier, VerdictTier::NeedsReview);
}

#[test]
fn empty_identifiers_are_not_found() {
    let registry = vec![active("1001", "memo")];
    let intent = EditIntentRecord {
        identifier: PropertyIdentifier::new(Some("nan"), Some(""), None),
        edit_code: "A".to_string(),
        comments: "New lot".to_string(),
        ..EditIntentRecord::default()
    };

    let result = classify(&intent, locate(&intent.identifier, &registry));

    assert_eq!(result.tier, VerdictTier::NotFound);
    assert!(result.message.starts_with("Not Found: New/Related entity (A)"));
    assert!(result.message.contains("propnum n/a, spi n/a, pfi n/a"));
    assert!(result.evidence.is_empty());
}

#[test]
fn address_comparison_ignores_case_and_spacing() {
    let mut record = active("171764.0", "Road name change processed 2024-05-01.");
    record.address = " 71 gowrie  street tatura ".to_string();
    let mut intent = intent("171764.0", "S", "");
    intent.address = AddressComponents {
        full_override: Some("71 Gowrie Street Tatura".to_string()),
        ..AddressComponents::default()
    };

    let result = classify(&intent, Some(&record));

    assert_eq!(result.tier, VerdictTier::Ok);
    assert!(result.message.contains("address and memo agree on '71 gowrie street tatura'"));
    assert!(result
        .evidence
        .iter()
        .any(|hit| hit.source == EvidenceSource::Address));
}

#[test]
fn constructed_address_strips_float_house_numbers() {
    let components = AddressComponents {
        unit_type: Some("UNIT".to_string()),
        unit_id: Some("2".to_string()),
        house_number: Some("71.0".to_string()),
        house_suffix: None,
        road_name: Some("GOWRIE".to_string()),
        road_type: Some("STREET".to_string()),
        locality: Some("TATURA".to_string()),
        full_override: Some("n/a".to_string()),
    };

    assert_eq!(components.proposed_address(), "unit 2 71 gowrie street tatura");

    let without_unit_id = AddressComponents {
        unit_id: None,
        ..components
    };
    assert_eq!(without_unit_id.proposed_address(), "71 gowrie street tatura");
}

#[test]
fn address_change_uses_recorded_old_address() {
    let mut record = active(
        "3001",
        "Address change request processed. Old address: 25 OLD TRACK, KIALLA.",
    );
    record.address = "25 MAIN ROAD, KIALLA".to_string();
    let mut intent = intent("3001", "chgadd", "");
    intent.address = AddressComponents {
        house_number: Some("25".to_string()),
        road_name: Some("MAIN".to_string()),
        road_type: Some("ROAD".to_string()),
        locality: Some("KIALLA".to_string()),
        ..AddressComponents::default()
    };
    intent.reference_value = Some("25 OLD TRACK, KIALLA".to_string());

    let result = classify(&intent, Some(&record));

    assert_eq!(result.tier, VerdictTier::Ok);
    assert!(result
        .message
        .contains("from '25 old track, kialla' to '25 main road kialla'"));
}

#[test]
fn address_change_without_support_needs_review() {
    let record = active("3002", "Standard active property.");
    let result = classify(&intent("3002", "SC", "tidy up"), Some(&record));

    assert_eq!(result.tier, VerdictTier::NeedsReview);
    assert_eq!(result.category, EditCategory::AddressChange);
}

#[test]
fn plan_number_in_memo_counts_as_evidence() {
    let record = active("8001", "Works on PS900001 complete.");
    let mut intent = intent("8001", "E", "");
    intent.plan_number = Some("PS900001".to_string());

    let result = classify(&intent, Some(&record));

    assert_eq!(result.tier, VerdictTier::Ok);
    assert!(result.message.contains("activity for plan PS900001"));
    assert!(result
        .evidence
        .iter()
        .any(|hit| hit.detail == "plan number 'ps900001'"));
}

#[test]
fn new_entity_tiers_follow_status_and_evidence() {
    let inactive_record = inactive("8002", "Lot created on severance.");
    let review = classify(&intent("8002", "NEWPROP", ""), Some(&inactive_record));
    assert_eq!(review.tier, VerdictTier::Review);

    let quiet = active("8003", "Standard property.");
    let comments_only = classify(&intent("8003", "E", "Adding propnum for lot 4"), Some(&quiet));
    assert_eq!(comments_only.tier, VerdictTier::Ok);
    assert!(comments_only.message.contains("memo does not explicitly confirm"));

    let unsupported = classify(&intent("8003", "E", "misc"), Some(&quiet));
    assert_eq!(unsupported.tier, VerdictTier::NeedsReview);
}

#[test]
fn no_change_checks_for_conflicting_memo_activity() {
    let blank = active("181833.0", "");
    assert_eq!(
        classify(&intent("181833.0", "NC", ""), Some(&blank)).tier,
        VerdictTier::Ok
    );

    let quiet = active(
        "181833.0",
        "Standard active property. No significant actions recorded recently.",
    );
    assert_eq!(
        classify(&intent("181833.0", "n", ""), Some(&quiet)).tier,
        VerdictTier::Ok
    );

    let busy = active("181833.0", "Subdivision pending approval.");
    let result = classify(&intent("181833.0", "NOCHANGE", ""), Some(&busy));
    assert_eq!(result.tier, VerdictTier::Review);
    assert!(result.message.contains("mentions 'subdivision'"));
}

#[test]
fn reference_update_depends_on_comments() {
    let record = active("2001", "Anything.");

    let noted = classify(&intent("2001", "crefno", "Council reference corrected"), Some(&record));
    assert_eq!(noted.tier, VerdictTier::Ok);
    assert_eq!(noted.category, EditCategory::ReferenceUpdate);

    let unclear = classify(&intent("2001", "C", "see ticket"), Some(&record));
    assert_eq!(unclear.tier, VerdictTier::Review);
}

#[test]
fn unclassified_codes_use_token_overlap() {
    let record = active("2001", "Boundary adjusted after survey.");

    let brief = classify(&intent("2001", "ZZ", "ok"), Some(&record));
    assert_eq!(brief.tier, VerdictTier::NeedsGeneralReview);
    assert_eq!(brief.category, EditCategory::Unclassified);

    let overlap = classify(&intent("2001", "ZZ", "Boundary realignment"), Some(&record));
    assert_eq!(overlap.tier, VerdictTier::Ok);
    assert!(overlap.message.contains("shared term 'boundary'"));

    let differs = classify(&intent("2001", "ZZ", "Something unrelated"), Some(&record));
    assert_eq!(differs.tier, VerdictTier::Review);
}

#[test]
fn blank_code_is_reported_as_none() {
    let record = active("2001", "Anything.");
    let result = classify(&intent("2001", "  ", ""), Some(&record));

    assert_eq!(result.category, EditCategory::Unclassified);
    assert!(result.message.contains("Edit code none"));
}

#[test]
fn messages_quote_bounded_excerpts() {
    let memo = "Parcel retired as per council resolution CR123/2024 on 2024-01-01. No longer active.";
    let record = inactive("199533.0", memo);
    let comments = "x".repeat(80);

    let result = classify(&intent("199533.0", "R", &comments), Some(&record));

    let memo_excerpt: String = memo.chars().take(50).collect();
    assert!(result.message.contains(&format!("Memo: '{memo_excerpt}...'")));
    assert!(result
        .message
        .ends_with(&format!("Comments: '{}...'", "x".repeat(50))));
}

#[test]
fn classification_does_not_mutate_inputs() {
    let record = active("171763.0", "New child parcel from subdivision PS828727.");
    let intent = intent("171763.0", "A", "subdivision");
    let record_before = record.clone();
    let intent_before = intent.clone();

    let first = classify(&intent, Some(&record));
    let second = classify(&intent, Some(&record));

    assert_eq!(first, second);
    assert_eq!(record, record_before);
    assert_eq!(intent, intent_before);
}

#[test]
fn rules_file_overrides_one_family_and_keeps_the_rest() {
    let rules = ClassifierRules::from_toml_str(
        r#"
excerpt_chars = 20

[categories.address_change]
codes = ["s", "ZZ"]
memo_keywords = ["Realigned"]
"#,
    )
    .expect("rules parse");

    assert_eq!(rules.excerpt_chars, 20);
    assert_eq!(rules.category_for("zz"), EditCategory::AddressChange);
    assert_eq!(rules.category_for("SC"), EditCategory::Unclassified);
    assert_eq!(rules.category_for("a"), EditCategory::NewEntity);
    assert_eq!(
        rules.rules_for(EditCategory::AddressChange).memo_keywords,
        vec!["realigned".to_string()]
    );

    let classifier = EditClassifier::new(rules);
    let record = active("4001", "Road realigned by council.");
    let result = classifier.classify(&intent("4001", "ZZ", ""), Some(&record));
    assert_eq!(result.category, EditCategory::AddressChange);
    assert_eq!(result.tier, VerdictTier::Ok);
    assert!(result.message.contains("Memo: 'Road realigned by co...'"));
}

#[test]
fn rules_file_rejects_codes_claimed_twice() {
    let err = ClassifierRules::from_toml_str(
        r#"
[categories.retirement]
codes = ["R", "A"]
"#,
    )
    .expect_err("duplicate code rejected");

    match err {
        RulesError::DuplicateCode {
            code,
            first,
            second,
        } => {
            assert_eq!(code, "A");
            assert_eq!(first, EditCategory::NewEntity);
            assert_eq!(second, EditCategory::Retirement);
        }
        other => panic!("expected duplicate code error, got {other:?}"),
    }
}

#[test]
fn rules_file_rejects_unknown_families_and_zero_excerpts() {
    assert!(matches!(
        ClassifierRules::from_toml_str("[categories.teleport]\ncodes = [\"T\"]\n"),
        Err(RulesError::Parse(_))
    ));
    assert!(matches!(
        ClassifierRules::from_toml_str("excerpt_chars = 0\n"),
        Err(RulesError::ZeroExcerpt)
    ));
}

#[test]
fn standard_rules_round_trip_through_toml() {
    let standard = ClassifierRules::standard();
    let rendered = toml::to_string(&standard).expect("rules serialize");

    let parsed = ClassifierRules::from_toml_str(&rendered).expect("rules parse");

    assert_eq!(parsed, standard);
}
