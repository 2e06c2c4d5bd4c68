use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::index::PostingsProvider;

/// `ln(N / (1 + df))`. Negative once `df + 1 > N`.
pub fn inverse_document_frequency(num_docs: usize, df: usize) -> f64 {
    (num_docs as f64 / (1 + df) as f64).ln()
}

/// IDF values keyed by term alone, with the field dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfTable {
    scores: HashMap<String, f64>,
}

impl IdfTable {
    /// Build the table so that each term keeps the value from the last
    /// `(term, field)` entry visited in `postings` insertion order, with
    /// `df` = that entry's posting count.
    ///
    /// A term present in several fields therefore gets the IDF of the field
    /// whose entry was created last, not a combined document frequency.
    pub fn last_field_wins<P: PostingsProvider>(num_docs: usize, postings: &P) -> Result<Self> {
        if num_docs == 0 {
            return Err(Error::EmptyCorpus);
        }
        let mut scores = HashMap::new();
        for (term, _field, ids) in postings.entries() {
            scores.insert(term.to_lowercase(), inverse_document_frequency(num_docs, ids.len()));
        }
        tracing::debug!(terms = scores.len(), num_docs, "idf table built");
        Ok(Self { scores })
    }

    /// IDF for `term`; 0 when the term was never indexed.
    pub fn idf(&self, term: &str) -> f64 {
        self.get(term).unwrap_or(0.0)
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        self.scores.get(term).copied()
    }

    pub fn len(&self) -> usize { self.scores.len() }

    pub fn is_empty(&self) -> bool { self.scores.is_empty() }
}
