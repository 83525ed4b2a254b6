use indexmap::IndexSet;
use serde_json::Value;

/// Normalize a raw model-supplied tag list.
///
/// Non-string entries are dropped, strings are trimmed and lowercased,
/// empties are dropped, and duplicates collapse onto the first occurrence.
/// Output order is first-seen order. Never fails; idempotent.
pub fn normalize(raw: &[Value]) -> Vec<String> {
    let mut seen: IndexSet<String> = IndexSet::new();
    for value in raw {
        let Some(s) = value.as_str() else { continue };
        let tag = s.trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        seen.insert(tag);
    }
    seen.into_iter().collect()
}
