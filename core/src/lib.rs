//! In-memory TF-IDF document index with plus/minus queries and top-K retrieval.

pub mod concurrent;
pub mod document;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod index;
pub mod paginator;
pub mod process_queries;
pub mod query;
pub mod ranker;
pub mod request_queue;
pub mod scorer;
pub mod store;
pub mod tokenizer;

pub use document::{DocId, DocumentStatus, ScoredDocument};
pub use engine::{SearchConfig, SearchEngine};
pub use error::{Result, SearchError};
pub use index::InvertedIndex;
pub use ranker::MAX_RESULT_DOCUMENT_COUNT;
pub use scorer::ExecutionPolicy;
pub use tokenizer::StopWords;
