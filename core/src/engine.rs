use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::document::{Document, TermFrequencyProvider};
use crate::error::{Error, Result};
use crate::idf::IdfTable;
use crate::index::{InvertedIndex, PostingsProvider};
use crate::DocId;

/// `(doc_id, score)` pairs, highest score first.
pub type Ranking = Vec<(DocId, f64)>;

/// Owns the documents, their index and the derived IDF table.
///
/// Built once and read-only afterwards; share it by reference.
#[derive(Debug)]
pub struct RankingEngine<D = Document, P = InvertedIndex> {
    documents: Vec<D>,
    index: P,
    idf: IdfTable,
}

impl RankingEngine {
    /// Index `documents` (ordered by ascending id) and derive the IDF table.
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let index = InvertedIndex::build(&documents);
        Self::from_parts(documents, index)
    }

    /// Distinct ids whose fields contain any query token.
    pub fn matching(&self, query: &str) -> BTreeSet<DocId> {
        self.index.search(query)
    }
}

impl<D: TermFrequencyProvider, P: PostingsProvider> RankingEngine<D, P> {
    /// Assemble an engine from any document and postings providers.
    /// `documents` must already be in ascending id order.
    pub fn from_parts(documents: Vec<D>, index: P) -> Result<Self> {
        let idf = IdfTable::last_field_wins(documents.len(), &index)?;
        Ok(Self { documents, index, idf })
    }

    /// Score every document against `query`.
    ///
    /// The query is only lowercased and split on whitespace. Each distinct
    /// term contributes `tf * idf * (1 + count)`, where `count` is its
    /// multiplicity in the query; unknown terms contribute nothing. The
    /// result holds one entry per document, and equal scores keep ascending
    /// id order.
    pub fn score(&self, query: &str) -> Ranking {
        let terms = query_terms(query);
        let mut ranking: Ranking = self
            .documents
            .iter()
            .map(|doc| {
                let mut score = 0.0;
                for (term, count) in &terms {
                    if let Some(tf) = doc.term_frequency(term) {
                        score += tf * self.idf.idf(term) * (1 + count) as f64;
                    }
                }
                (doc.doc_id(), score)
            })
            .collect();
        // stable: ties stay in document order
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        tracing::debug!(terms = terms.len(), docs = ranking.len(), "query scored");
        ranking
    }

    pub fn documents(&self) -> &[D] { &self.documents }

    pub fn document(&self, id: DocId) -> Option<&D> { self.documents.get(id as usize) }

    pub fn index(&self) -> &P { &self.index }

    pub fn idf(&self) -> &IdfTable { &self.idf }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

/// Lowercased query tokens with their multiplicity, in first-seen order.
pub fn query_terms(query: &str) -> IndexMap<String, usize> {
    let mut terms = IndexMap::new();
    for token in query.to_lowercase().split_whitespace() {
        *terms.entry(token.to_string()).or_insert(0) += 1;
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idf::inverse_document_frequency;
    use crate::index::Field;

    fn engine() -> RankingEngine {
        RankingEngine::new(vec![
            Document::build(0, "emma", "austen", "classic"),
            Document::build(1, "dune", "herbert", "sci fi classic"),
            Document::build(2, "dune messiah", "herbert", "sequel"),
        ])
        .unwrap()
    }

    #[test]
    fn query_terms_count_multiplicity() {
        let terms = query_terms("Dune dune  messiah");
        assert_eq!(terms.get("dune"), Some(&2));
        assert_eq!(terms.get("messiah"), Some(&1));
        assert_eq!(terms.keys().collect::<Vec<_>>(), vec!["dune", "messiah"]);
    }

    #[test]
    fn score_uses_tf_idf_and_query_multiplicity() {
        let engine = engine();
        let ranking = engine.score("messiah messiah");
        assert_eq!(ranking[0].0, 2);
        let expected = (1.0 / 4.0) * inverse_document_frequency(3, 1) * 3.0;
        assert!((ranking[0].1 - expected).abs() < 1e-12);
    }

    #[test]
    fn every_document_is_ranked() {
        let engine = engine();
        assert_eq!(engine.score("dune").len(), engine.len());
        assert_eq!(engine.score("").len(), 3);
    }

    #[test]
    fn empty_query_keeps_id_order() {
        let ranking = engine().score("");
        assert_eq!(ranking, vec![(0, 0.0), (1, 0.0), (2, 0.0)]);
    }

    #[test]
    fn query_is_lowercased() {
        let engine = engine();
        assert_eq!(engine.score("DUNE"), engine.score("dune"));
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(matches!(RankingEngine::new(Vec::new()), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn matching_delegates_to_index() {
        let engine = engine();
        assert_eq!(engine.matching("dune").into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(engine.index().lookup("herbert", Field::Author), &[1, 2]);
    }

    struct FixedTf(DocId, f64);

    impl TermFrequencyProvider for FixedTf {
        fn doc_id(&self) -> DocId { self.0 }
        fn term_frequency(&self, term: &str) -> Option<f64> {
            (term == "x").then_some(self.1)
        }
    }

    #[test]
    fn substitute_providers() {
        let index = InvertedIndex::build(&[Document::build(0, "x", "", "")]);
        let engine = RankingEngine::from_parts(vec![FixedTf(0, 0.1), FixedTf(1, 0.9), FixedTf(2, 0.5)], index).unwrap();
        let ranking = engine.score("x");
        assert_eq!(ranking.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![1, 2, 0]);
    }
}
