use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::workflows::edits::domain::EditCategory;

/// Keyword evidence for one edit-code family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    /// Edit codes routed to this family (case-insensitive).
    pub codes: Vec<String>,
    /// Phrases looked for in the registry memo. For `no_change` these are conflict markers.
    pub memo_keywords: Vec<String>,
    /// Phrases looked for in the feed comments.
    pub comment_keywords: Vec<String>,
    /// Whether a verbatim plan number in memo or comments counts as a keyword hit.
    pub match_plan_number: bool,
}

impl CategoryRules {
    fn new(codes: &[&str], memo: &[&str], comments: &[&str], match_plan_number: bool) -> Self {
        let owned = |items: &[&str]| -> Vec<String> {
            items.iter().map(|item| item.to_string()).collect()
        };
        Self {
            codes: owned(codes),
            memo_keywords: owned(memo),
            comment_keywords: owned(comments),
            match_plan_number,
        }
    }

    fn normalized(mut self) -> Self {
        let clean = |items: &mut Vec<String>, upper: bool| {
            for item in items.iter_mut() {
                let trimmed = item.trim();
                *item = if upper {
                    trimmed.to_ascii_uppercase()
                } else {
                    trimmed.to_lowercase()
                };
            }
            items.retain(|item| !item.is_empty());
        };
        clean(&mut self.codes, true);
        clean(&mut self.memo_keywords, false);
        clean(&mut self.comment_keywords, false);
        self
    }
}

/// Static lookup tables driving the edit classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    /// Maximum characters of memo/comment text quoted in verdict messages.
    pub excerpt_chars: usize,
    /// Comments at or below this length count as "no comment" for unclassified codes.
    pub min_comment_chars: usize,
    /// Comment tokens at or below this length are ignored by the overlap heuristic.
    pub min_token_chars: usize,
    /// Memo phrase signalling that the previous address is recorded.
    pub old_address_marker: String,
    #[serde(
        serialize_with = "serialize_categories",
        deserialize_with = "deserialize_categories"
    )]
    pub categories: BTreeMap<EditCategory, CategoryRules>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl ClassifierRules {
    /// Built-in tables mirroring the council edit-code conventions.
    pub fn standard() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(
            EditCategory::NewEntity,
            CategoryRules::new(
                &[
                    "A", "E", "ECN", "ENS", "EAS", "CRPROPADD", "NEWPROP", "ADDPROP", "ADDADD",
                    "P",
                ],
                &[
                    "subdivision",
                    "new lot",
                    "child parcel",
                    "severance",
                    "split",
                    "created",
                    "new assessment",
                ],
                &[
                    "subdivision",
                    "new lot",
                    "child",
                    "adding propnum",
                    "new multi-assessment",
                ],
                true,
            ),
        );
        categories.insert(
            EditCategory::AddressChange,
            CategoryRules::new(
                &["S", "SC", "CAD", "CHGADD", "CHGPROP"],
                &[
                    "address change",
                    "road name change",
                    "renumber",
                    "address update",
                    "site address modified",
                ],
                &[
                    "address change",
                    "road name",
                    "renumber",
                    "assigning new address",
                    "replacing address",
                ],
                true,
            ),
        );
        categories.insert(
            EditCategory::Retirement,
            CategoryRules::new(
                &[
                    "R", "RCN", "RET", "RC", "DELPROP", "REMPROP", "REMADD", "DELADD",
                ],
                &[
                    "consolidated",
                    "retired",
                    "parent parcel",
                    "no longer active",
                    "demolished",
                ],
                &["removing propnum", "retiring", "consolidation"],
                true,
            ),
        );
        categories.insert(
            EditCategory::NoChange,
            CategoryRules::new(
                &["NC", "N", "NOCHANGE"],
                &[
                    "change",
                    "subdivision",
                    "new",
                    "update",
                    "consolidat",
                    "retir",
                    "error",
                    "correct",
                ],
                &[],
                false,
            ),
        );
        categories.insert(
            EditCategory::ReferenceUpdate,
            CategoryRules::new(&["C", "CREFNO"], &[], &["crefno", "council reference"], false),
        );

        Self {
            excerpt_chars: 50,
            min_comment_chars: 3,
            min_token_chars: 3,
            old_address_marker: "old address".to_string(),
            categories,
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, RulesError> {
        let parsed: ClassifierRules = toml::from_str(raw)?;
        parsed.finalize()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Family for a raw edit code; unknown or blank codes are unclassified.
    pub fn category_for(&self, code: &str) -> EditCategory {
        let code = code.trim().to_ascii_uppercase();
        self.categories
            .iter()
            .find(|(_, rules)| rules.codes.iter().any(|candidate| *candidate == code))
            .map(|(category, _)| *category)
            .unwrap_or(EditCategory::Unclassified)
    }

    pub fn rules_for(&self, category: EditCategory) -> &CategoryRules {
        static EMPTY: CategoryRules = CategoryRules {
            codes: Vec::new(),
            memo_keywords: Vec::new(),
            comment_keywords: Vec::new(),
            match_plan_number: false,
        };
        self.categories.get(&category).unwrap_or(&EMPTY)
    }

    /// Fills families missing from an override file and rejects inconsistent tables.
    fn finalize(mut self) -> Result<Self, RulesError> {
        for (category, defaults) in Self::standard().categories {
            self.categories.entry(category).or_insert(defaults);
        }
        self.categories = self
            .categories
            .into_iter()
            .map(|(category, rules)| (category, rules.normalized()))
            .collect();
        self.old_address_marker = self.old_address_marker.trim().to_lowercase();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.excerpt_chars == 0 {
            return Err(RulesError::ZeroExcerpt);
        }

        let mut owners: BTreeMap<&str, EditCategory> = BTreeMap::new();
        for (category, rules) in &self.categories {
            for code in &rules.codes {
                if let Some(first) = owners.insert(code.as_str(), *category) {
                    return Err(RulesError::DuplicateCode {
                        code: code.clone(),
                        first,
                        second: *category,
                    });
                }
            }
        }

        Ok(())
    }
}

fn serialize_categories<S>(
    categories: &BTreeMap<EditCategory, CategoryRules>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(
        categories
            .iter()
            .map(|(category, rules)| (category.key(), rules)),
    )
}

fn deserialize_categories<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<EditCategory, CategoryRules>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, CategoryRules>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, rules)| {
            EditCategory::from_key(&key)
                .map(|category| (category, rules))
                .ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown edit category '{key}'"))
                })
        })
        .collect()
}

/// Failure to load or validate a classifier rules file.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read classifier rules from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid classifier rules: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("edit code '{code}' is listed under both {first:?} and {second:?}")]
    DuplicateCode {
        code: String,
        first: EditCategory,
        second: EditCategory,
    },
    #[error("excerpt_chars must be greater than zero")]
    ZeroExcerpt,
}
