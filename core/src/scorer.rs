use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::concurrent::ShardedMap;
use crate::index::{InvertedIndex, Postings};
use crate::query::Query;
use crate::store::DocumentStore;
use crate::{DocId, DocumentStatus, ScoredDocument};

/// How the per-term accumulation and ranking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    /// Plus-terms are scored on the rayon pool into a sharded accumulator.
    Parallel,
}

/// `ln(N / df)`. `postings` must be non-empty, which holds for every indexed term.
pub fn inverse_document_freq(document_count: usize, postings: &Postings) -> f64 {
    (document_count as f64 / postings.len() as f64).ln()
}

fn accumulate_term<P>(
    index: &InvertedIndex,
    store: &DocumentStore,
    term: &str,
    predicate: &P,
    mut add: impl FnMut(DocId, f64),
) where
    P: Fn(DocId, DocumentStatus, i32) -> bool,
{
    let Some(postings) = index.postings(term) else {
        return;
    };
    let idf = inverse_document_freq(store.len(), postings);
    for (&id, &tf) in postings {
        if let Some(data) = store.get(id) {
            if predicate(id, data.status, data.rating) {
                add(id, tf * idf);
            }
        }
    }
}

/// Every document matching at least one plus-term, passing `predicate` and containing no
/// minus-term, with its TF-IDF relevance. Ordered by id.
pub fn find_all_documents<P>(
    index: &InvertedIndex,
    store: &DocumentStore,
    query: &Query<'_>,
    predicate: &P,
    policy: ExecutionPolicy,
    shard_count: usize,
) -> Vec<ScoredDocument>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    let mut document_to_relevance: BTreeMap<DocId, f64> = match policy {
        ExecutionPolicy::Sequential => {
            let mut relevance = BTreeMap::new();
            for term in &query.plus_terms {
                accumulate_term(index, store, term, predicate, |id, score| {
                    *relevance.entry(id).or_insert(0.0) += score;
                });
            }
            relevance
        }
        ExecutionPolicy::Parallel => {
            let relevance: ShardedMap<DocId, f64> = ShardedMap::new(shard_count);
            query.plus_terms.par_iter().for_each(|term| {
                accumulate_term(index, store, term, predicate, |id, score| {
                    *relevance.entry(id) += score;
                });
            });
            tracing::trace!(
                shards = relevance.shard_count(),
                accumulated = relevance.entry_count(),
                "merging relevance shards"
            );
            relevance.into_ordinary_map()
        }
    };

    for term in &query.minus_terms {
        if let Some(postings) = index.postings(term) {
            for id in postings.keys() {
                document_to_relevance.remove(id);
            }
        }
    }

    tracing::trace!(
        plus = query.plus_terms.len(),
        minus = query.minus_terms.len(),
        candidates = document_to_relevance.len(),
        ?policy,
        "scored query"
    );

    document_to_relevance
        .into_iter()
        .filter_map(|(id, relevance)| {
            store
                .get(id)
                .map(|data| ScoredDocument::new(id, relevance, data.rating))
        })
        .collect()
}
