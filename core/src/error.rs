use std::path::PathBuf;

use thiserror::Error;

/// Load-time failures. Query-time conditions are never errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read corpus {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus csv")]
    Csv(#[from] csv::Error),

    #[error("corpus header has no `{column}` column")]
    MissingColumn { column: String },

    #[error("record {record} is missing field `{field}`")]
    InputShape { record: usize, field: String },

    #[error("corpus contains no documents")]
    EmptyCorpus,
}

pub type Result<T> = std::result::Result<T, Error>;
