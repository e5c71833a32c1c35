//! Error types for correction.

/// Errors that can occur while correcting a word.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpellerError {
    /// There is no word to correct towards
    #[error("Vocabulary is empty, no correction is possible")]
    EmptyVocabulary,

    /// The floor probability of the configuration is not a probability
    /// a table entry could take
    #[error("Floor probability {0} is outside (0, 1]")]
    InvalidFloorProbability(f64),
}
