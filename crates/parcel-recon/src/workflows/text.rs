//! Text helpers shared by the feed, registry, and snapshot models.

use serde::{Deserialize, Deserializer};

/// Trims `raw` and maps blank values and spreadsheet `nan` placeholders to `None`.
pub fn normalize_optional(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Character-safe prefix of at most `max_chars` characters, marked with `...` when cut.
pub fn excerpt(value: &str, max_chars: usize) -> String {
    let mut chars = value.char_indices();
    match chars.nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &value[..byte_index]),
        None => value.to_string(),
    }
}

/// Returns the first needle contained in `haystack`.
pub fn contains_any<'a>(haystack: &str, needles: &'a [String]) -> Option<&'a str> {
    needles
        .iter()
        .map(String::as_str)
        .find(|needle| !needle.is_empty() && haystack.contains(needle))
}

/// Serde adapter applying [`normalize_optional`] to optional text columns.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_optional(opt.as_deref()))
}

/// Serde adapter for required text columns; placeholders collapse to an empty string.
pub(crate) fn required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_optional_drops_placeholders() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("   ")), None);
        assert_eq!(normalize_optional(Some("NaN")), None);
        assert_eq!(normalize_optional(Some(" nan ")), None);
        assert_eq!(
            normalize_optional(Some(" 171763.0 ")),
            Some("171763.0".to_string())
        );
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("short", 50), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("ééééé", 2), "éé...");
        assert_eq!(excerpt("exact", 5), "exact");
    }

    #[test]
    fn contains_any_ignores_empty_needles() {
        let needles = vec![String::new(), "retired".to_string()];
        assert_eq!(contains_any("parcel retired 2024", &needles), Some("retired"));
        assert_eq!(contains_any("active", &needles), None);
    }

    #[test]
    fn collapse_whitespace_normalizes_runs() {
        assert_eq!(collapse_whitespace("  71   gowrie \t street "), "71 gowrie street");
    }
}
