//! Snapshot diffing between a current property list and a reference registry extract.

pub mod comparator;
pub mod domain;
pub mod matcher;

#[cfg(test)]
mod tests;

pub use comparator::{compare, ChangeReport, SnapshotComparator};
pub use domain::{ChangeCategory, ChangeRecord, PropertyRecord, ProposedEditCode};
pub use matcher::{
    default_matcher, AnyOf, KnownParentMatcher, NoParentMatcher, ParentParcelMatcher,
    SubdivisionPlanMatcher,
};
