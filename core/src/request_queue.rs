use std::collections::VecDeque;

use crate::process_queries::process_queries;
use crate::{DocId, DocumentStatus, ExecutionPolicy, Result, ScoredDocument, SearchEngine};

/// Requests remembered by a `RequestQueue`: one per minute of a day.
pub const MIN_IN_DAY: usize = 1440;

#[derive(Debug, Clone, Copy)]
struct QueryResult {
    result_count: usize,
}

/// Forwards searches to an engine and tracks how many of the last `MIN_IN_DAY`
/// requests found nothing.
#[derive(Debug)]
pub struct RequestQueue<'a> {
    engine: &'a SearchEngine,
    requests: VecDeque<QueryResult>,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(engine: &'a SearchEngine) -> Self {
        Self {
            engine,
            requests: VecDeque::with_capacity(MIN_IN_DAY),
            no_result_requests: 0,
        }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<ScoredDocument>> {
        self.add_find_request_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>> {
        self.add_find_request_with(raw_query, move |_, document_status, _| document_status == status)
    }

    pub fn add_find_request_with<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<ScoredDocument>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.add_find_request_policy(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    pub fn add_find_request_policy<P>(
        &mut self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let result = self.engine.find_top_documents_policy(policy, raw_query, predicate)?;
        self.record(result.len());
        Ok(result)
    }

    /// Run `queries` concurrently against `Actual` documents and record every outcome in
    /// query order. Nothing is recorded if any query is malformed.
    pub fn add_find_requests<S>(&mut self, queries: &[S]) -> Result<Vec<Vec<ScoredDocument>>>
    where
        S: AsRef<str> + Sync,
    {
        let results = process_queries(self.engine, queries)?;
        for found in &results {
            self.record(found.len());
        }
        Ok(results)
    }

    /// Requests in the current window that returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    fn record(&mut self, result_count: usize) {
        if self.requests.len() == MIN_IN_DAY {
            if let Some(oldest) = self.requests.pop_front() {
                if oldest.result_count == 0 {
                    self.no_result_requests -= 1;
                }
            }
        }
        if result_count == 0 {
            self.no_result_requests += 1;
        }
        self.requests.push_back(QueryResult { result_count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SearchEngine {
        let mut engine = SearchEngine::from_stop_words_text("and in at").unwrap();
        let docs = [
            (1, "curly cat curly tail", vec![7, 2, 7]),
            (2, "curly dog and fancy collar", vec![1, 2, 3]),
            (3, "big cat fancy collar", vec![1, 2, 8]),
            (4, "big dog sparrow Eugene", vec![1, 3, 2]),
            (5, "big dog sparrow Vasiliy", vec![1, 1, 1]),
        ];
        for (id, text, ratings) in docs {
            engine.add_document(id, text, DocumentStatus::Actual, &ratings).unwrap();
        }
        engine
    }

    #[test]
    fn window_evicts_oldest_requests() {
        let engine = engine();
        let mut queue = RequestQueue::new(&engine);
        for _ in 0..MIN_IN_DAY - 1 {
            queue.add_find_request("empty request").unwrap();
        }
        assert_eq!(queue.no_result_requests(), MIN_IN_DAY - 1);
        queue.add_find_request("curly dog").unwrap();
        queue.add_find_request("big collar").unwrap();
        queue.add_find_request("sparrow").unwrap();
        assert_eq!(queue.no_result_requests(), MIN_IN_DAY - 3);
    }

    #[test]
    fn failed_requests_are_not_recorded() {
        let engine = engine();
        let mut queue = RequestQueue::new(&engine);
        assert!(queue.add_find_request("--cat").is_err());
        assert_eq!(queue.no_result_requests(), 0);
        let found = queue
            .add_find_request_by_status("cat", DocumentStatus::Banned)
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(queue.no_result_requests(), 1);
        let found = queue.add_find_request_with("cat", |id, _, _| id == 3).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn parallel_policy_is_recorded_like_sequential() {
        let engine = engine();
        let mut queue = RequestQueue::new(&engine);
        let banned = |_: DocId, status: DocumentStatus, _: i32| status == DocumentStatus::Banned;
        let found = queue
            .add_find_request_policy(ExecutionPolicy::Parallel, "curly", banned)
            .unwrap();
        assert!(found.is_empty());
        let found = queue
            .add_find_request_policy(ExecutionPolicy::Parallel, "fancy collar", |_, _, _| true)
            .unwrap();
        assert_eq!(found, engine.find_top_documents("fancy collar").unwrap());
        assert_eq!(queue.no_result_requests(), 1);
    }

    #[test]
    fn batch_records_each_query() {
        let engine = engine();
        let mut queue = RequestQueue::new(&engine);
        let results = queue
            .add_find_requests(&["sparrow", "nothing here", "curly cat", "missing"])
            .unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].len(), 2);
        assert_eq!(queue.no_result_requests(), 2);

        assert!(queue.add_find_requests(&["cat", "dog-"]).is_err());
        assert_eq!(queue.no_result_requests(), 2);
    }
}
