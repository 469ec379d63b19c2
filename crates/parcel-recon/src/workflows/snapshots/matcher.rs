//! Decides whether a property missing from the current snapshot is the parent of a
//! subdivision whose children already show up as new properties.

use std::collections::BTreeSet;
use std::fmt;

use super::domain::PropertyRecord;

pub trait ParentParcelMatcher: Send + Sync {
    /// `new_properties` are the current-snapshot records flagged as new in the first pass.
    fn is_parent(&self, missing: &PropertyRecord, new_properties: &[&PropertyRecord]) -> bool;
}

impl<M: ParentParcelMatcher + ?Sized> ParentParcelMatcher for Box<M> {
    fn is_parent(&self, missing: &PropertyRecord, new_properties: &[&PropertyRecord]) -> bool {
        (**self).is_parent(missing, new_properties)
    }
}

/// Never treats a missing property as a parent; every one gets flagged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParentMatcher;

impl ParentParcelMatcher for NoParentMatcher {
    fn is_parent(&self, _missing: &PropertyRecord, _new_properties: &[&PropertyRecord]) -> bool {
        false
    }
}

/// Matches when the missing property's plan is the plan of any newly created lot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubdivisionPlanMatcher;

impl ParentParcelMatcher for SubdivisionPlanMatcher {
    fn is_parent(&self, missing: &PropertyRecord, new_properties: &[&PropertyRecord]) -> bool {
        let Some(plan) = missing.plan() else {
            return false;
        };
        new_properties
            .iter()
            .filter_map(|record| record.plan())
            .any(|candidate| candidate.eq_ignore_ascii_case(plan))
    }
}

/// Matches an explicit list of subdivided parents by SPI or propnum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownParentMatcher {
    identifiers: BTreeSet<String>,
}

impl KnownParentMatcher {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            identifiers: identifiers
                .into_iter()
                .map(|id| id.as_ref().trim().to_ascii_uppercase())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    fn knows(&self, value: Option<&str>) -> bool {
        value.is_some_and(|value| {
            self.identifiers
                .contains(&value.trim().to_ascii_uppercase())
        })
    }
}

impl ParentParcelMatcher for KnownParentMatcher {
    fn is_parent(&self, missing: &PropertyRecord, _new_properties: &[&PropertyRecord]) -> bool {
        self.knows(missing.spi.as_deref()) || self.knows(Some(&missing.propnum))
    }
}

/// True when any inner matcher is.
#[derive(Default)]
pub struct AnyOf {
    matchers: Vec<Box<dyn ParentParcelMatcher>>,
}

impl AnyOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M: ParentParcelMatcher + 'static>(mut self, matcher: M) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl fmt::Debug for AnyOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyOf")
            .field("matchers", &self.matchers.len())
            .finish()
    }
}

impl ParentParcelMatcher for AnyOf {
    fn is_parent(&self, missing: &PropertyRecord, new_properties: &[&PropertyRecord]) -> bool {
        self.matchers
            .iter()
            .any(|matcher| matcher.is_parent(missing, new_properties))
    }
}

/// Plan correlation plus an explicit parent list.
pub fn default_matcher<I, S>(known_parents: I) -> AnyOf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    AnyOf::new()
        .with(SubdivisionPlanMatcher)
        .with(KnownParentMatcher::new(known_parents))
}
