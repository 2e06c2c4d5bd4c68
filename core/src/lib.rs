//! TF-IDF ranking over a small, fixed corpus of book records.
//!
//! Records are normalized into [`Document`]s, indexed by `(term, field)` in an
//! [`InvertedIndex`], scored by a [`RankingEngine`] and shaped for display by a
//! [`ResultPresenter`]. Everything is built once at startup and read-only after.

pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod idf;
pub mod index;
pub mod presenter;
pub mod tokenizer;

pub type DocId = u32;

pub use corpus::{Corpus, RawRecord, SourceConfig};
pub use document::{Document, TermFrequencyProvider};
pub use engine::{Ranking, RankingEngine};
pub use error::{Error, Result};
pub use idf::IdfTable;
pub use index::{Field, InvertedIndex, PostingsProvider};
pub use presenter::{Presentation, PresenterConfig, RecordLookup, ResultPresenter, MAX_PAGES};
pub use tokenizer::{EnglishNormalizer, TextNormalizer};
