use crate::workflows::edits::domain::{
    EditIntentRecord, PropertyIdentifier, ReferenceRecord, RegistryStatus,
};

pub(super) fn registry_record(
    propnum: &str,
    spi: &str,
    pfi: &str,
    status: RegistryStatus,
    memo: &str,
) -> ReferenceRecord {
    ReferenceRecord {
        primary_key: Some(propnum.to_string()),
        alternate_key: Some(spi.to_string()),
        secondary_key: Some(pfi.to_string()),
        address: format!("{propnum} TEST STREET TATURA"),
        status,
        memo: memo.to_string(),
        lot: None,
        plan: None,
    }
}

pub(super) fn active(propnum: &str, memo: &str) -> ReferenceRecord {
    registry_record(
        propnum,
        &format!("1\\PS{propnum}"),
        &format!("PFI_{propnum}"),
        RegistryStatus::Active,
        memo,
    )
}

pub(super) fn inactive(propnum: &str, memo: &str) -> ReferenceRecord {
    registry_record(
        propnum,
        &format!("1\\PS{propnum}"),
        &format!("PFI_{propnum}"),
        RegistryStatus::Inactive,
        memo,
    )
}

pub(super) fn by_propnum(propnum: &str) -> PropertyIdentifier {
    PropertyIdentifier::new(Some(propnum), None, None)
}

pub(super) fn intent(propnum: &str, edit_code: &str, comments: &str) -> EditIntentRecord {
    EditIntentRecord {
        identifier: by_propnum(propnum),
        edit_code: edit_code.to_string(),
        comments: comments.to_string(),
        ..EditIntentRecord::default()
    }
}
