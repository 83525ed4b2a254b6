use std::collections::HashSet;

use jobsidian_core::JobExtraction;

/// Source ids of every note already on disk, built once at the start of a
/// run and read-only afterwards. Notes written during the same run are not
/// visible to it.
#[derive(Debug, Default)]
pub struct DedupIndex {
    ids: HashSet<String>,
}

impl DedupIndex {
    /// Index the given extractions by their stable source id. Malformed
    /// stored notes never reach this point; the notes reader has already
    /// dropped them.
    pub fn build(existing: &[JobExtraction]) -> Self {
        let ids = existing.iter().map(|e| e.source.to_id()).collect();
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
