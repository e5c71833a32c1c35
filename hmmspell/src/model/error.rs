//! Errors for building and validating a trained model.
use smol_str::SmolStr;

/// Errors that can occur while training a model.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TrainingError {
    /// There are no correct words to learn from
    #[error("Vocabulary is empty")]
    EmptyVocabulary,

    /// No training pair has its correct word in the vocabulary
    #[error("No training pairs to estimate the word prior from")]
    NoTrainingPairs,
}

/// The tables of a model do not agree with each other or with their
/// alphabet.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ModelShapeError {
    /// The model has no words
    #[error("Vocabulary is empty")]
    EmptyVocabulary,

    /// Transition and emission tables were built over different alphabets
    #[error("Transition and emission tables use different alphabets")]
    AlphabetMismatch,

    /// A table has the wrong number of rows
    #[error("{table} table has {found} rows, expected {expected}")]
    RowCount {
        /// which table
        table: &'static str,
        /// rows required by the alphabet
        expected: usize,
        /// rows present
        found: usize,
    },

    /// A table row has the wrong number of columns
    #[error("{table} table row {row} has {found} columns, expected {expected}")]
    RowWidth {
        /// which table
        table: &'static str,
        /// row index
        row: usize,
        /// columns required by the alphabet
        expected: usize,
        /// columns present
        found: usize,
    },

    /// A table cell is not a probability
    #[error("{table} table row {row} holds {value}, which is not a probability")]
    NotAProbability {
        /// which table
        table: &'static str,
        /// row index
        row: usize,
        /// the offending value
        value: f64,
    },

    /// A vocabulary word has no prior
    #[error("No prior for vocabulary word {0:?}")]
    MissingPrior(SmolStr),

    /// The prior has a word that is not in the vocabulary
    #[error("Prior for {0:?}, which is not in the vocabulary")]
    UnknownPriorWord(SmolStr),

    /// A vocabulary word has a letter outside the alphabet
    #[error("Vocabulary word {0:?} has letters outside the alphabet")]
    WordOutsideAlphabet(SmolStr),
}
