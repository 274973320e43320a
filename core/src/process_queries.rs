//! Run many queries at once on the rayon pool.

use rayon::prelude::*;

use crate::{Result, ScoredDocument, SearchEngine};

/// `find_top_documents` for every query, results in query order.
pub fn process_queries<S>(engine: &SearchEngine, queries: &[S]) -> Result<Vec<Vec<ScoredDocument>>>
where
    S: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| engine.find_top_documents(query.as_ref()))
        .collect()
}

/// Like `process_queries`, flattened into one list.
pub fn process_queries_joined<S>(engine: &SearchEngine, queries: &[S]) -> Result<Vec<ScoredDocument>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(engine, queries)?.into_iter().flatten().collect())
}
