//! Heterogeneous list entries
//!
//! Amenities and images have been stored over time as plain strings or as
//! small objects carrying a `name` or a `value`. They are read as
//! [`ListEntry`] and normalized into a flat string list at the boundary.

use serde::{Deserialize, Deserializer, Serialize};

/// One stored element of a list-valued field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListEntry {
    Plain(String),
    Named { name: String },
    Valued { value: String },
}

impl ListEntry {
    pub fn as_text(&self) -> &str {
        match self {
            ListEntry::Plain(s) => s,
            ListEntry::Named { name } => name,
            ListEntry::Valued { value } => value,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ListEntry::Plain(s) => s,
            ListEntry::Named { name } => name,
            ListEntry::Valued { value } => value,
        }
    }
}

impl From<&str> for ListEntry {
    fn from(s: &str) -> Self {
        ListEntry::Plain(s.to_string())
    }
}

/// Flatten entries into trimmed, non-empty, de-duplicated strings (first
/// occurrence wins, order preserved)
pub fn normalize<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = ListEntry>,
{
    let mut out: Vec<String> = Vec::new();
    for entry in entries {
        let text = entry.into_text();
        let text = text.trim();
        if text.is_empty() || out.iter().any(|existing| existing == text) {
            continue;
        }
        out.push(text.to_string());
    }
    out
}

/// Representation written back to the store
pub fn to_stored(items: &[String]) -> Vec<ListEntry> {
    items
        .iter()
        .map(|name| ListEntry::Named { name: name.clone() })
        .collect()
}

/// Serde helper accepting any mix of entry shapes for a `Vec<String>` field
pub fn deserialize_normalized<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<ListEntry>>::deserialize(deserializer)?;
    Ok(normalize(entries.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_entries_normalize() {
        let raw = r#"["wifi", {"name": "tv"}, {"value": "minibar"}, " wifi ", ""]"#;
        let entries: Vec<ListEntry> = serde_json::from_str(raw).unwrap();
        assert_eq!(normalize(entries), vec!["wifi", "tv", "minibar"]);
    }

    #[test]
    fn test_object_with_both_fields_prefers_name() {
        let entry: ListEntry = serde_json::from_str(r#"{"name": "a", "value": "b"}"#).unwrap();
        assert_eq!(entry.as_text(), "a");
    }

    #[test]
    fn test_stored_form_reads_back_unchanged() {
        let items = vec!["balcony".to_string(), "safe".to_string()];
        let json = serde_json::to_string(&to_stored(&items)).unwrap();
        let back: Vec<ListEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(normalize(back), items);
    }

    #[test]
    fn test_null_field_deserializes_empty() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "deserialize_normalized")]
            items: Vec<String>,
        }

        let holder: Holder = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(holder.items.is_empty());
        let holder: Holder = serde_json::from_str("{}").unwrap();
        assert!(holder.items.is_empty());
    }
}
