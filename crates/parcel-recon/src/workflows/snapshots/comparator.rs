use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    ChangeCategory, ChangeRecord, PropertyRecord, ProposedEditCode, PENDING_REVIEW,
};
use super::matcher::{NoParentMatcher, ParentParcelMatcher};

const STATUS_ATTRIBUTE: &str = "status";
const ACTIVE_IN_REFERENCE: &str = "Active in reference";
const MISSING_IN_CURRENT: &str = "Retired/Missing in current";
const MANUAL_INVESTIGATION: &str =
    "Manual investigation required to confirm if property should be retired.";

/// Change records plus a per-category tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    pub summary: BTreeMap<ChangeCategory, usize>,
    pub changes: Vec<ChangeRecord>,
}

impl ChangeReport {
    fn from_changes(changes: Vec<ChangeRecord>) -> Self {
        let mut summary = BTreeMap::new();
        for change in &changes {
            *summary.entry(change.category).or_default() += 1;
        }
        Self { summary, changes }
    }

    pub fn count(&self, category: ChangeCategory) -> usize {
        self.summary.get(&category).copied().unwrap_or(0)
    }
}

/// First-occurrence-wins index over a snapshot that keeps the snapshot's order.
struct KeyedSnapshot<'a> {
    ordered: Vec<&'a PropertyRecord>,
    by_key: HashMap<&'a str, &'a PropertyRecord>,
}

impl<'a> KeyedSnapshot<'a> {
    fn build(label: &str, records: &'a [PropertyRecord]) -> Self {
        let mut ordered = Vec::with_capacity(records.len());
        let mut by_key = HashMap::with_capacity(records.len());
        for record in records {
            let key = record.propnum.as_str();
            if by_key.contains_key(key) {
                warn!(snapshot = label, propnum = key, "duplicate propnum ignored");
                continue;
            }
            by_key.insert(key, record);
            ordered.push(record);
        }
        Self { ordered, by_key }
    }

    fn get(&self, key: &str) -> Option<&'a PropertyRecord> {
        self.by_key.get(key).copied()
    }

    fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }
}

/// Diffs a current snapshot against a reference snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotComparator<M = NoParentMatcher> {
    matcher: M,
}

impl<M: ParentParcelMatcher> SnapshotComparator<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    /// Current-driven records first, in current's order, then reference-driven ones.
    pub fn compare(
        &self,
        current: &[PropertyRecord],
        reference: &[PropertyRecord],
    ) -> Vec<ChangeRecord> {
        let current = KeyedSnapshot::build("current", current);
        let reference = KeyedSnapshot::build("reference", reference);
        let mut changes = Vec::new();
        let mut new_properties = Vec::new();

        for record in &current.ordered {
            match reference.get(&record.propnum) {
                None => {
                    changes.push(new_property(record));
                    new_properties.push(*record);
                }
                Some(previous) if previous.full_address != record.full_address => {
                    changes.push(address_update(record, previous));
                }
                Some(_) => {}
            }
        }

        for record in &reference.ordered {
            if current.contains(&record.propnum) {
                continue;
            }
            let is_parent = self.matcher.is_parent(record, &new_properties);
            changes.push(missing_from_current(record, is_parent));
        }

        info!(changes = changes.len(), "snapshot comparison complete");
        changes
    }

    pub fn report(&self, current: &[PropertyRecord], reference: &[PropertyRecord]) -> ChangeReport {
        ChangeReport::from_changes(self.compare(current, reference))
    }
}

fn new_property(record: &PropertyRecord) -> ChangeRecord {
    let lot = record.lot_number.as_deref().unwrap_or("n/a");
    let plan = record.plan().unwrap_or("n/a");
    ChangeRecord {
        category: ChangeCategory::NewProperty,
        justification: format!("New lot {lot} on plan {plan} not found in reference snapshot."),
        propnum: record.propnum.clone(),
        reference_pfi: None,
        attribute_changed: "ALL".to_string(),
        old_value: None,
        new_value: Some(record.full_address.clone()),
        proposed_edit_code: ProposedEditCode::CreateProperty,
        review_status: PENDING_REVIEW.to_string(),
        notes: String::new(),
    }
}

fn address_update(record: &PropertyRecord, previous: &PropertyRecord) -> ChangeRecord {
    ChangeRecord {
        category: ChangeCategory::AddressUpdate,
        justification: "Address details differ between current and reference snapshots."
            .to_string(),
        propnum: record.propnum.clone(),
        reference_pfi: previous.pfi.clone(),
        attribute_changed: "full_address".to_string(),
        old_value: Some(previous.full_address.clone()),
        new_value: Some(record.full_address.clone()),
        proposed_edit_code: ProposedEditCode::SiteAddress,
        review_status: PENDING_REVIEW.to_string(),
        notes: String::new(),
    }
}

fn missing_from_current(record: &PropertyRecord, is_parent: bool) -> ChangeRecord {
    let (category, justification, code, notes) = if is_parent {
        (
            ChangeCategory::ImplicitRetirement,
            "Parent parcel of new subdivision. Retirement is handled by the reference registry upon child creation.",
            ProposedEditCode::NoAction,
            "",
        )
    } else {
        (
            ChangeCategory::MissingFromCurrent,
            "Property in reference snapshot not found in the current active property list.",
            ProposedEditCode::FlagForReview,
            MANUAL_INVESTIGATION,
        )
    };

    ChangeRecord {
        category,
        justification: justification.to_string(),
        propnum: record.propnum.clone(),
        reference_pfi: record.pfi.clone(),
        attribute_changed: STATUS_ATTRIBUTE.to_string(),
        old_value: Some(ACTIVE_IN_REFERENCE.to_string()),
        new_value: Some(MISSING_IN_CURRENT.to_string()),
        proposed_edit_code: code,
        review_status: PENDING_REVIEW.to_string(),
        notes: notes.to_string(),
    }
}

/// Compares with no parent-parcel detection.
pub fn compare(current: &[PropertyRecord], reference: &[PropertyRecord]) -> Vec<ChangeRecord> {
    SnapshotComparator::new(NoParentMatcher).compare(current, reference)
}
