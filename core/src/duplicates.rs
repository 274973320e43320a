use std::collections::{BTreeMap, BTreeSet};

use crate::{DocId, SearchEngine};

/// Remove documents whose set of indexed terms equals that of another document, keeping
/// the lowest id of each group. Returns the removed ids in ascending order.
pub fn remove_duplicates(engine: &mut SearchEngine) -> Vec<DocId> {
    let mut duplicates = Vec::new();
    {
        let mut seen: BTreeMap<BTreeSet<&str>, DocId> = BTreeMap::new();
        for id in engine.iter() {
            let terms: BTreeSet<&str> = engine.word_frequencies(id).into_keys().collect();
            match seen.get_mut(&terms) {
                Some(kept) if *kept > id => {
                    duplicates.push(*kept);
                    *kept = id;
                }
                Some(_) => duplicates.push(id),
                None => {
                    seen.insert(terms, id);
                }
            }
        }
    }
    duplicates.sort_unstable();

    for &id in &duplicates {
        engine.remove_document(id);
    }
    tracing::info!(
        removed = duplicates.len(),
        remaining = engine.document_count(),
        "removed duplicate documents"
    );
    duplicates
}
