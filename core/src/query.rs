//! Query parsing: `cat -dog` means "must mention cat, must not mention dog".

use std::collections::BTreeSet;

use crate::tokenizer::{has_control_chars, split_into_words, StopWords};
use crate::{Result, SearchError};

/// Parsed query. Terms borrow from the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'a> {
    pub plus_terms: BTreeSet<&'a str>,
    pub minus_terms: BTreeSet<&'a str>,
}

impl Query<'_> {
    pub fn is_empty(&self) -> bool {
        self.plus_terms.is_empty() && self.minus_terms.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
}

/// Reject control characters, doubled minus prefixes and empty minus-words.
pub fn validate_query(raw_query: &str) -> Result<()> {
    if has_control_chars(raw_query) {
        return Err(SearchError::invalid("query contains control characters"));
    }
    for word in split_into_words(raw_query)? {
        if word.starts_with("--") {
            return Err(SearchError::invalid(format!("double minus in query word '{word}'")));
        }
        if word.ends_with('-') {
            return Err(SearchError::invalid(format!("empty minus word in '{raw_query}'")));
        }
    }
    Ok(())
}

fn parse_query_word(word: &str) -> Result<QueryWord<'_>> {
    let (data, is_minus) = match word.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (word, false),
    };
    if data.is_empty() || data.starts_with('-') {
        return Err(SearchError::invalid(format!("query word '{word}' is invalid")));
    }
    Ok(QueryWord { data, is_minus })
}

/// Validate and split `raw_query` into plus and minus terms, dropping stop words.
pub fn parse_query<'a>(raw_query: &'a str, stop_words: &StopWords) -> Result<Query<'a>> {
    validate_query(raw_query)?;
    let mut query = Query::default();
    for word in split_into_words(raw_query)? {
        let word = parse_query_word(word)?;
        if stop_words.contains(word.data) {
            continue;
        }
        if word.is_minus {
            query.minus_terms.insert(word.data);
        } else {
            query.plus_terms.insert(word.data);
        }
    }
    Ok(query)
}
