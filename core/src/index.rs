use std::collections::BTreeSet;
use std::fmt;

use indexmap::{Equivalent, IndexMap};

use crate::document::Document;
use crate::DocId;

/// Record field a posting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Title,
    Author,
    Description,
}

impl Field {
    /// Lookup order used by the field-union queries.
    pub const ALL: [Field; 3] = [Field::Title, Field::Author, Field::Description];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to posting lists keyed by `(term, field)`.
pub trait PostingsProvider {
    /// Posting list for the exact key; empty when the key is absent.
    fn lookup(&self, term: &str, field: Field) -> &[DocId];

    /// Every `(term, field)` entry in insertion order.
    fn entries(&self) -> impl Iterator<Item = (&str, Field, &[DocId])> + '_;
}

// Borrowed form of the `(String, Field)` key; hashes identically to the owned tuple.
#[derive(Hash)]
struct KeyRef<'a>(&'a str, Field);

impl Equivalent<(String, Field)> for KeyRef<'_> {
    fn equivalent(&self, key: &(String, Field)) -> bool {
        self.0 == key.0 && self.1 == key.1
    }
}

/// Map from `(term, field)` to the ids of documents containing the term in
/// that field. Ids are appended in document order and repeat when a term
/// repeats within one field.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    postings: IndexMap<(String, Field), Vec<DocId>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn build(documents: &[Document]) -> Self {
        let mut index = Self::new();
        index.index(documents);
        index
    }

    /// Append postings for every field of every document.
    pub fn index(&mut self, documents: &[Document]) {
        for doc in documents {
            self.add_tokens(doc.id, &doc.title, Field::Title);
            self.add_tokens(doc.id, &doc.author, Field::Author);
            self.add_tokens(doc.id, &doc.description, Field::Description);
        }
        tracing::debug!(entries = self.postings.len(), "inverted index built");
    }

    fn add_tokens(&mut self, doc_id: DocId, text: &str, field: Field) {
        for token in text.split_whitespace() {
            match self.postings.get_mut(&KeyRef(token, field)) {
                Some(ids) => ids.push(doc_id),
                None => {
                    self.postings.insert((token.to_string(), field), vec![doc_id]);
                }
            }
        }
    }

    /// Concatenation of the title, author and description posting lists. Duplicates are kept.
    pub fn lookup_any_field(&self, term: &str) -> Vec<DocId> {
        Field::ALL
            .iter()
            .flat_map(|field| self.lookup(term, *field).iter().copied())
            .collect()
    }

    /// Distinct ids matching any whitespace-separated query token in any field.
    ///
    /// The query is not normalized here.
    pub fn search(&self, query: &str) -> BTreeSet<DocId> {
        query
            .split_whitespace()
            .flat_map(|token| self.lookup_any_field(token))
            .collect()
    }

    /// Number of `(term, field)` entries.
    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }
}

impl PostingsProvider for InvertedIndex {
    fn lookup(&self, term: &str, field: Field) -> &[DocId] {
        self.postings
            .get(&KeyRef(term, field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn entries(&self) -> impl Iterator<Item = (&str, Field, &[DocId])> + '_ {
        self.postings
            .iter()
            .map(|((term, field), ids)| (term.as_str(), *field, ids.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Document> {
        vec![
            Document::build(0, "dune", "herbert", "sci fi classic"),
            Document::build(1, "dune messiah", "herbert", "dune sequel"),
            Document::build(2, "emma", "austen", "classic classic"),
        ]
    }

    #[test]
    fn lookup_is_field_scoped() {
        let index = InvertedIndex::build(&docs());
        assert_eq!(index.lookup("dune", Field::Title), &[0, 1]);
        assert_eq!(index.lookup("dune", Field::Description), &[1]);
        assert!(index.lookup("dune", Field::Author).is_empty());
    }

    #[test]
    fn missing_key_is_empty() {
        let index = InvertedIndex::build(&docs());
        assert!(index.lookup("tolkien", Field::Author).is_empty());
        assert!(index.lookup_any_field("tolkien").is_empty());
    }

    #[test]
    fn repeated_token_repeats_id() {
        let index = InvertedIndex::build(&docs());
        assert_eq!(index.lookup("classic", Field::Description), &[0, 2, 2]);
    }

    #[test]
    fn lookup_any_field_keeps_duplicates_in_field_order() {
        let index = InvertedIndex::build(&docs());
        assert_eq!(index.lookup_any_field("dune"), vec![0, 1, 1]);
    }

    #[test]
    fn search_deduplicates() {
        let index = InvertedIndex::build(&docs());
        let hits = index.search("dune classic");
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn search_does_not_normalize() {
        let index = InvertedIndex::build(&docs());
        assert!(index.search("Dune").is_empty());
        assert!(index.search("").is_empty());
    }

    #[test]
    fn entries_follow_insertion_order() {
        let index = InvertedIndex::build(&[Document::build(0, "b a", "a", "")]);
        let keys: Vec<(&str, Field)> = index.entries().map(|(t, f, _)| (t, f)).collect();
        assert_eq!(keys, vec![("b", Field::Title), ("a", Field::Title), ("a", Field::Author)]);
        assert_eq!(index.len(), 3);
    }
}
