//! Corpus loading errors.

/// Errors that can occur while reading a training corpus.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CorpusError {
    /// The corpus could not be read
    #[error("I/O error reading '{0}'")]
    Io(String, #[source] std::io::Error),

    /// A record has no `:` between the correct word and its typos
    #[error("Line {line}: missing ':' separator in {content:?}")]
    MissingSeparator {
        /// 1-based line number of the record
        line: usize,
        /// The offending line, untrimmed
        content: String,
    },
}
