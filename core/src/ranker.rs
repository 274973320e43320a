use rayon::slice::ParallelSliceMut;
use std::cmp::Ordering;

use crate::{ExecutionPolicy, ScoredDocument};

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are considered equal.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

fn by_relevance(lhs: &ScoredDocument, rhs: &ScoredDocument) -> Ordering {
    rhs.relevance
        .total_cmp(&lhs.relevance)
        .then(lhs.id.cmp(&rhs.id))
}

fn by_rating(lhs: &ScoredDocument, rhs: &ScoredDocument) -> Ordering {
    rhs.rating.cmp(&lhs.rating).then(lhs.id.cmp(&rhs.id))
}

/// Sort `documents` best-first and keep at most `limit` of them.
///
/// Documents are sorted by relevance, then split into runs whose relevance lies within
/// `RELEVANCE_EPSILON` of the run's first (most relevant) document. Each run is ordered by
/// rating descending, then id ascending. A document is therefore never placed ahead of one
/// that is more than `RELEVANCE_EPSILON` more relevant.
pub fn rank(
    mut documents: Vec<ScoredDocument>,
    limit: usize,
    policy: ExecutionPolicy,
) -> Vec<ScoredDocument> {
    match policy {
        ExecutionPolicy::Sequential => documents.sort_by(by_relevance),
        ExecutionPolicy::Parallel => documents.par_sort_by(by_relevance),
    }

    let mut start = 0;
    while start < documents.len() && start < limit {
        let leader = documents[start].relevance;
        let end = documents[start..]
            .iter()
            .position(|d| leader - d.relevance >= RELEVANCE_EPSILON)
            .map_or(documents.len(), |offset| start + offset);
        documents[start..end].sort_by(by_rating);
        start = end;
    }

    documents.truncate(limit);
    documents
}
