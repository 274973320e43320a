use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SearchError;

pub type DocId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentStatus::Actual => "actual",
            DocumentStatus::Irrelevant => "irrelevant",
            DocumentStatus::Banned => "banned",
            DocumentStatus::Removed => "removed",
        };
        f.write_str(s)
    }
}

impl FromStr for DocumentStatus {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "actual" => Ok(DocumentStatus::Actual),
            "irrelevant" => Ok(DocumentStatus::Irrelevant),
            "banned" => Ok(DocumentStatus::Banned),
            "removed" => Ok(DocumentStatus::Removed),
            other => Err(SearchError::invalid(format!("unknown document status '{other}'"))),
        }
    }
}

/// A search hit: document id, TF-IDF relevance and the document's average rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

impl ScoredDocument {
    pub fn new(id: DocId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}

impl fmt::Display for ScoredDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Mean of `ratings`, truncated toward zero; 0 for no ratings.
pub fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}
