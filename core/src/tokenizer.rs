use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

use crate::{Result, SearchError};

lazy_static! {
    static ref CONTROL_RE: Regex = Regex::new(r"[\x00-\x1F]").expect("valid regex");
    static ref ENGLISH_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// True if `s` contains any control code in `0..=31`.
pub fn has_control_chars(s: &str) -> bool {
    CONTROL_RE.is_match(s)
}

/// Split `text` on single spaces.
///
/// The empty string yields no words. Any other empty word (leading, trailing or doubled
/// space) and any control character fail the whole call.
pub fn split_into_words(text: &str) -> Result<Vec<&str>> {
    if has_control_chars(text) {
        return Err(SearchError::invalid("text contains control characters"));
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let words: Vec<&str> = text.split(' ').collect();
    if words.iter().any(|w| w.is_empty()) {
        return Err(SearchError::invalid(format!("empty word in '{text}'")));
    }
    Ok(words)
}

/// Immutable set of words excluded from indexing and querying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Collect unique non-empty words; a control character in any of them is rejected.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if has_control_chars(word) {
                return Err(SearchError::invalid(format!("stop word {word:?} contains control characters")));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Space-separated list; repeated spaces are tolerated here.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(text.split(' '))
    }

    pub fn english() -> Self {
        Self {
            words: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Drop stop words, keeping the order of the rest.
    pub fn filter<'a>(&self, words: Vec<&'a str>) -> Vec<&'a str> {
        words.into_iter().filter(|w| !self.contains(w)).collect()
    }
}

/// Split `text` and strip stop words.
pub fn tokenize<'a>(text: &'a str, stop_words: &StopWords) -> Result<Vec<&'a str>> {
    Ok(stop_words.filter(split_into_words(text)?))
}
