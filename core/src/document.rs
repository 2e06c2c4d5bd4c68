use std::collections::HashMap;

use crate::DocId;

/// Read access to one document's term frequencies, as needed by scoring.
pub trait TermFrequencyProvider {
    fn doc_id(&self) -> DocId;

    /// `occurrences / length` for `term`, or `None` when the term is absent.
    fn term_frequency(&self, term: &str) -> Option<f64>;
}

/// One corpus record after normalization.
///
/// Immutable once built. A document with `length == 0` keeps an empty
/// frequency table and scores 0 for every query.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub author: String,
    pub description: String,
    /// title, author and description joined by single spaces
    pub text: String,
    pub length: usize,
    pub term_frequencies: HashMap<String, f64>,
}

impl Document {
    /// Build a document from fields that were already normalized by the caller.
    pub fn build(id: DocId, title: impl Into<String>, author: impl Into<String>, description: impl Into<String>) -> Self {
        let title = title.into();
        let author = author.into();
        let description = description.into();
        let text = [title.as_str(), author.as_str(), description.as_str()].join(" ");
        let length = text.split_whitespace().count();
        let term_frequencies = compute_term_frequencies(&text, length);
        if length == 0 {
            tracing::debug!(doc_id = id, "degenerate document has no terms");
        }
        Self { id, title, author, description, text, length, term_frequencies }
    }

    pub fn is_degenerate(&self) -> bool { self.length == 0 }

    /// Raw occurrence count of `term` in `text`.
    pub fn term_count(&self, term: &str) -> usize {
        self.text.split_whitespace().filter(|t| *t == term).count()
    }
}

impl TermFrequencyProvider for Document {
    fn doc_id(&self) -> DocId { self.id }

    fn term_frequency(&self, term: &str) -> Option<f64> {
        self.term_frequencies.get(term).copied()
    }
}

fn compute_term_frequencies(text: &str, length: usize) -> HashMap<String, f64> {
    if length == 0 {
        return HashMap::new();
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in text.split_whitespace() {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(term, count)| (term.to_string(), count as f64 / length as f64))
        .collect()
}
