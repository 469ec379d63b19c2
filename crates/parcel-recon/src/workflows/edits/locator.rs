use serde::Serialize;

use super::domain::{PropertyIdentifier, ReferenceRecord};

/// Identifier kinds in the order the locator tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Primary,
    Alternate,
    Secondary,
}

impl KeyKind {
    pub const PRIORITY: [KeyKind; 3] = [KeyKind::Primary, KeyKind::Alternate, KeyKind::Secondary];

    fn requested(self, identifier: &PropertyIdentifier) -> Option<&str> {
        let raw = match self {
            KeyKind::Primary => identifier.primary_key.as_deref(),
            KeyKind::Alternate => identifier.alternate_key.as_deref(),
            KeyKind::Secondary => identifier.secondary_key.as_deref(),
        }?;
        let key = raw.trim();
        (!key.is_empty() && !key.eq_ignore_ascii_case("nan")).then_some(key)
    }

    fn matches(self, record: &ReferenceRecord, key: &str) -> bool {
        match self {
            KeyKind::Primary => record.primary_key.as_deref() == Some(key),
            KeyKind::Alternate => record.alternate_key.as_deref() == Some(key),
            // Registries may hold a longer canonical PFI than the feed.
            KeyKind::Secondary => record
                .secondary_key
                .as_deref()
                .is_some_and(|stored| stored.ends_with(key)),
        }
    }
}

/// A registry hit together with the identifier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'a> {
    pub key: KeyKind,
    pub record: &'a ReferenceRecord,
}

/// Resolves feed identifiers against one registry snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RecordLocator<'a> {
    registry: &'a [ReferenceRecord],
}

impl<'a> RecordLocator<'a> {
    pub fn new(registry: &'a [ReferenceRecord]) -> Self {
        Self { registry }
    }

    pub fn locate(&self, identifier: &PropertyIdentifier) -> Option<&'a ReferenceRecord> {
        self.locate_with_key(identifier).map(|hit| hit.record)
    }

    /// Tries each populated key in priority order, stopping at the first kind with any hit.
    /// Active records win over inactive ones within that kind.
    pub fn locate_with_key(&self, identifier: &PropertyIdentifier) -> Option<Located<'a>> {
        for kind in KeyKind::PRIORITY {
            let Some(key) = kind.requested(identifier) else {
                continue;
            };

            let mut first_inactive = None;
            for record in self.registry {
                if !kind.matches(record, key) {
                    continue;
                }
                if record.is_active() {
                    return Some(Located { key: kind, record });
                }
                first_inactive.get_or_insert(record);
            }

            if let Some(record) = first_inactive {
                return Some(Located { key: kind, record });
            }
        }

        None
    }
}

/// Convenience wrapper around [`RecordLocator::locate`].
pub fn locate<'a>(
    identifier: &PropertyIdentifier,
    registry: &'a [ReferenceRecord],
) -> Option<&'a ReferenceRecord> {
    RecordLocator::new(registry).locate(identifier)
}
