use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("The file is empty")]
    EmptyFile,

    #[error("Required column '{0}' not found (available: {1})")]
    MissingColumn(String, String),

    #[error("No usable rows: all {skipped} data rows had an unparseable date or price")]
    NoValidRows { skipped: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}
