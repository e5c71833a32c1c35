//! Archive-related errors.
use crate::model::ModelShapeError;

/// Errors that can occur when saving or opening a model archive.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// I/O error while reading or writing the archive file
    #[error("I/O error on '{0}'")]
    Io(String, #[source] std::io::Error),

    /// The archive is not the JSON document it should be
    #[error("Failed to parse model archive")]
    Json(#[from] serde_json::Error),

    /// The archive was written by an incompatible version
    #[error("Unsupported archive format version {found}, expected {expected}")]
    UnsupportedVersion {
        /// version found in the archive
        found: u32,
        /// version this library reads
        expected: u32,
    },

    /// The tables of the archive do not form a valid model
    #[error("Archive holds an invalid model")]
    Invalid(#[from] ModelShapeError),
}
