use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::DocId;

/// Posting list of one term: document id -> term frequency.
pub type Postings = BTreeMap<DocId, f64>;

/// Term -> postings, plus the reverse document -> term frequencies.
///
/// Both sides share one `Arc<str>` per distinct term. A term is present only while at
/// least one document contains it.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    word_to_document_freqs: BTreeMap<Arc<str>, Postings>,
    document_to_word_freqs: HashMap<DocId, BTreeMap<Arc<str>, f64>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `words` (already stop-word filtered) under `id`. The caller guarantees `id`
    /// is not indexed yet.
    pub fn insert(&mut self, id: DocId, words: &[&str]) {
        let doc_freqs = self.document_to_word_freqs.entry(id).or_default();
        if words.is_empty() {
            return;
        }
        let inv_word_count = 1.0 / words.len() as f64;
        for &word in words {
            let term = match self.word_to_document_freqs.get_key_value(word) {
                Some((term, _)) => Arc::clone(term),
                None => Arc::from(word),
            };
            *doc_freqs.entry(Arc::clone(&term)).or_insert(0.0) += inv_word_count;
            *self
                .word_to_document_freqs
                .entry(term)
                .or_default()
                .entry(id)
                .or_insert(0.0) += inv_word_count;
        }
    }

    /// Drop `id` from every posting list it appears in. Returns false if it was not indexed.
    pub fn remove(&mut self, id: DocId) -> bool {
        let Some(doc_freqs) = self.document_to_word_freqs.remove(&id) else {
            return false;
        };
        for term in doc_freqs.keys() {
            if let Some(postings) = self.word_to_document_freqs.get_mut(term) {
                postings.remove(&id);
                if postings.is_empty() {
                    self.word_to_document_freqs.remove(term);
                }
            }
        }
        true
    }

    pub fn postings(&self, term: &str) -> Option<&Postings> {
        self.word_to_document_freqs.get(term)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.word_to_document_freqs.contains_key(term)
    }

    /// Whether `term` occurs in document `id`.
    pub fn document_has_term(&self, id: DocId, term: &str) -> bool {
        self.postings(term).is_some_and(|p| p.contains_key(&id))
    }

    pub fn term_count(&self) -> usize {
        self.word_to_document_freqs.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.word_to_document_freqs.keys().map(|t| t.as_ref())
    }

    pub fn word_frequencies(&self, id: DocId) -> Option<&BTreeMap<Arc<str>, f64>> {
        self.document_to_word_freqs.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_counts_repeats() {
        let mut index = InvertedIndex::new();
        index.insert(1, &["cat", "dog", "cat", "owl"]);
        let postings = index.postings("cat").unwrap();
        assert!((postings[&1] - 0.5).abs() < 1e-12);
        assert!((index.postings("dog").unwrap()[&1] - 0.25).abs() < 1e-12);
        assert_eq!(index.term_count(), 3);
    }

    #[test]
    fn terms_are_shared_between_sides() {
        let mut index = InvertedIndex::new();
        index.insert(1, &["cat"]);
        index.insert(2, &["cat"]);
        let (forward, _) = index.word_to_document_freqs.get_key_value("cat").unwrap();
        let (reverse, _) = index.word_frequencies(2).unwrap().first_key_value().unwrap();
        assert!(Arc::ptr_eq(forward, reverse));
    }

    #[test]
    fn remove_drops_emptied_terms() {
        let mut index = InvertedIndex::new();
        index.insert(1, &["cat", "dog"]);
        index.insert(2, &["cat"]);
        assert!(index.remove(1));
        assert!(!index.contains_term("dog"));
        assert_eq!(index.postings("cat").unwrap().len(), 1);
        assert!(index.word_frequencies(1).is_none());
        assert!(!index.remove(1));
    }

    #[test]
    fn empty_document_is_recorded() {
        let mut index = InvertedIndex::new();
        index.insert(7, &[]);
        assert!(index.word_frequencies(7).unwrap().is_empty());
        assert_eq!(index.term_count(), 0);
    }
}
