use std::collections::BTreeMap;

use crate::document::compute_average_rating;
use crate::query::parse_query;
use crate::ranker::{self, MAX_RESULT_DOCUMENT_COUNT};
use crate::scorer::{self, ExecutionPolicy};
use crate::store::{DocumentData, DocumentStore};
use crate::tokenizer::{tokenize, StopWords};
use crate::{DocId, DocumentStatus, InvertedIndex, Result, ScoredDocument, SearchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Shards of the relevance accumulator used by `ExecutionPolicy::Parallel`.
    pub shard_count: usize,
    /// Top-K cut applied by every `find_top_documents*` call.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            shard_count: 100,
            max_results: MAX_RESULT_DOCUMENT_COUNT,
        }
    }
}

/// The document index: stop words, postings and per-document metadata.
///
/// Mutations take `&mut self`; searches take `&self` and may run from many threads.
#[derive(Debug, Default)]
pub struct SearchEngine {
    stop_words: StopWords,
    index: InvertedIndex,
    store: DocumentStore,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(stop_words: StopWords) -> Self {
        Self::with_config(stop_words, SearchConfig::default())
    }

    pub fn with_config(stop_words: StopWords, config: SearchConfig) -> Self {
        Self {
            stop_words,
            index: InvertedIndex::new(),
            store: DocumentStore::default(),
            config,
        }
    }

    /// Engine whose stop words are the space-separated words of `text`.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::new(StopWords::from_text(text)?))
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Index `text` under `id`. Nothing is modified when validation fails.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 {
            return Err(SearchError::invalid(format!("document id must be non-negative, got {id}")));
        }
        if self.store.contains(id) {
            return Err(SearchError::invalid(format!("document {id} already exists")));
        }
        let words = tokenize(text, &self.stop_words)?;

        self.index.insert(id, &words);
        let rating = compute_average_rating(ratings);
        self.store.insert(id, DocumentData { rating, status });
        tracing::debug!(id, words = words.len(), rating, %status, "added document");
        Ok(())
    }

    /// Top documents with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<ScoredDocument>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>> {
        self.find_top_documents_with(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<ScoredDocument>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_policy(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    /// Parse `raw_query`, score every document accepted by `predicate` and return the best
    /// `max_results` of them.
    pub fn find_top_documents_policy<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let matched = scorer::find_all_documents(
            &self.index,
            &self.store,
            &query,
            &predicate,
            policy,
            self.config.shard_count,
        );
        Ok(ranker::rank(matched, self.config.max_results, policy))
    }

    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    /// Live document ids in insertion order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, DocId>> {
        self.store.ids().iter().copied()
    }

    /// Term frequencies of document `id`; empty if the document is unknown.
    pub fn word_frequencies(&self, id: DocId) -> BTreeMap<&str, f64> {
        self.index
            .word_frequencies(id)
            .map(|freqs| freqs.iter().map(|(term, &tf)| (term.as_ref(), tf)).collect())
            .unwrap_or_default()
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.index.term_count()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.index.terms()
    }

    /// Forget document `id`. Unknown ids are ignored.
    pub fn remove_document(&mut self, id: DocId) {
        if self.store.remove(id).is_none() {
            return;
        }
        self.index.remove(id);
        tracing::debug!(id, "removed document");
    }

    /// Plus-terms of `raw_query` found in document `id`, or nothing if any minus-term is
    /// found there. Returned terms borrow from the index.
    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        let data = self.store.get(id).ok_or(SearchError::NotFound(id))?;
        let query = parse_query(raw_query, &self.stop_words)?;
        let status = data.status;

        if query
            .minus_terms
            .iter()
            .any(|term| self.index.document_has_term(id, term))
        {
            return Ok((Vec::new(), status));
        }

        let matched = match self.index.word_frequencies(id) {
            Some(freqs) => query
                .plus_terms
                .iter()
                .filter_map(|term| freqs.get_key_value(*term).map(|(t, _)| t.as_ref()))
                .collect(),
            None => Vec::new(),
        };
        Ok((matched, status))
    }
}

impl<'a> IntoIterator for &'a SearchEngine {
    type Item = DocId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DocId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(stop_words: &str) -> SearchEngine {
        SearchEngine::from_stop_words_text(stop_words).unwrap()
    }

    #[test]
    fn add_rejects_bad_ids() {
        let mut e = engine("");
        assert!(matches!(
            e.add_document(-1, "cat", DocumentStatus::Actual, &[]),
            Err(SearchError::InvalidArgument(_))
        ));
        e.add_document(1, "cat", DocumentStatus::Actual, &[]).unwrap();
        assert!(e.add_document(1, "dog", DocumentStatus::Actual, &[]).is_err());
        assert_eq!(e.document_count(), 1);
    }

    #[test]
    fn rejected_add_leaves_no_trace() {
        let mut e = engine("");
        assert!(e.add_document(3, "cat d\u{2}og", DocumentStatus::Actual, &[1]).is_err());
        assert!(e.add_document(3, "cat  dog", DocumentStatus::Actual, &[1]).is_err());
        assert_eq!(e.document_count(), 0);
        assert_eq!(e.term_count(), 0);
        e.add_document(3, "cat dog", DocumentStatus::Actual, &[1]).unwrap();
    }

    #[test]
    fn all_stop_word_document_is_still_stored() {
        let mut e = engine("in the");
        e.add_document(1, "in the", DocumentStatus::Banned, &[4, 6]).unwrap();
        assert_eq!(e.document_count(), 1);
        assert!(e.word_frequencies(1).is_empty());
        let (words, status) = e.match_document("in", 1).unwrap();
        assert!(words.is_empty());
        assert_eq!(status, DocumentStatus::Banned);
    }

    #[test]
    fn match_requires_live_document() {
        let mut e = engine("");
        assert_eq!(e.match_document("cat", 5), Err(SearchError::NotFound(5)));
        e.add_document(5, "cat", DocumentStatus::Actual, &[]).unwrap();
        e.remove_document(5);
        assert_eq!(e.match_document("cat", 5), Err(SearchError::NotFound(5)));
    }

    #[test]
    fn custom_result_limit() {
        let config = SearchConfig { shard_count: 4, max_results: 2 };
        let mut e = SearchEngine::with_config(StopWords::default(), config);
        for id in 0..4 {
            e.add_document(id, "cat", DocumentStatus::Actual, &[id]).unwrap();
        }
        let found = e.find_top_documents("cat").unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut e = engine("");
        for id in [7, 3, 11] {
            e.add_document(id, "x", DocumentStatus::Actual, &[]).unwrap();
        }
        assert_eq!((&e).into_iter().collect::<Vec<_>>(), vec![7, 3, 11]);
    }
}
