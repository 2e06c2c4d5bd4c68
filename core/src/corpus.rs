use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::presenter::RecordLookup;
use crate::tokenizer::TextNormalizer;
use crate::DocId;

/// One record as delivered by the csv, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    pub title: String,
    pub author: String,
    pub description: String,
}

/// Which csv columns feed the three document fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub title_column: String,
    pub author_column: String,
    /// Defaults to `text_reviews_count`, the column the book export has always
    /// fed into the description slot.
    pub description_column: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            title_column: "title".into(),
            author_column: "authors".into(),
            description_column: "text_reviews_count".into(),
        }
    }
}

/// Read every record of a headered csv. Fails on the first bad record; nothing
/// partial is returned.
pub fn read_records<R: Read>(reader: R, config: &SourceConfig) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::MissingColumn { column: name.to_string() })
    };
    let title_idx = column(&config.title_column)?;
    let author_idx = column(&config.author_column)?;
    let description_idx = column(&config.description_column)?;

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let field = |idx: usize, name: &str| {
            row.get(idx)
                .map(str::to_string)
                .ok_or_else(|| Error::InputShape { record: i, field: name.to_string() })
        };
        records.push(RawRecord {
            title: field(title_idx, &config.title_column)?,
            author: field(author_idx, &config.author_column)?,
            description: field(description_idx, &config.description_column)?,
        });
    }
    Ok(records)
}

/// The raw records in id order. Doubles as the display lookup for results.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<RawRecord>,
}

impl Corpus {
    pub fn new(records: Vec<RawRecord>) -> Self { Self { records } }

    pub fn open<P: AsRef<Path>>(path: P, config: &SourceConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        let corpus = Self::from_reader(file, config)?;
        tracing::info!(records = corpus.len(), path = %path.display(), "corpus loaded");
        Ok(corpus)
    }

    pub fn from_reader<R: Read>(reader: R, config: &SourceConfig) -> Result<Self> {
        read_records(reader, config).map(Self::new)
    }

    /// Normalize every record into a `Document` whose id is its position.
    pub fn documents<N: TextNormalizer>(&self, normalizer: &N) -> Vec<Document> {
        self.records
            .iter()
            .enumerate()
            .map(|(id, rec)| {
                Document::build(
                    id as DocId,
                    normalizer.normalize(&rec.title),
                    normalizer.normalize(&rec.author),
                    normalizer.normalize(&rec.description),
                )
            })
            .collect()
    }

    pub fn get(&self, id: DocId) -> Option<&RawRecord> { self.records.get(id as usize) }

    pub fn records(&self) -> &[RawRecord] { &self.records }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

impl RecordLookup for Corpus {
    fn title_author(&self, id: DocId) -> Option<(&str, &str)> {
        self.get(id).map(|r| (r.title.as_str(), r.author.as_str()))
    }
}
