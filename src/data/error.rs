//! Structured error types for the tabular pipeline.

use std::path::PathBuf;

use thiserror::Error;

use super::loader::FileFormat;

/// Failures while turning an input file into a [`Dataset`](super::model::Dataset).
///
/// All of these are fatal for a run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file format: {extension:?} ({})", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("reader for {0:?} files is not implemented")]
    NotImplemented(FileFormat),

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("date column '{0}' not found in header")]
    MissingDateColumn(String),

    #[error("row {row}: '{value}' does not match date format '{format}'")]
    Date {
        row: usize,
        value: String,
        format: String,
    },
}

/// Failures inside the transformation stages and export.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' holds non-numeric value '{value}'")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),
}
