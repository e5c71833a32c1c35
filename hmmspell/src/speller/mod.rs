//! Correction of typed words against a trained model.
use serde::{Deserialize, Serialize};

use self::worker::SpellerWorker;
use crate::corpus::Vocabulary;
use crate::model::{EmissionTable, TrainedModel, TransitionTable, WordPrior};
use crate::speller::suggestion::Suggestion;
use crate::tokenizer::{is_word, Tokenize};

pub mod candidates;
pub mod error;
pub mod scorer;
pub mod suggestion;
mod worker;

pub use self::candidates::{generate_candidates, DEFAULT_MAX_DISTANCE};
pub use self::error::SpellerError;
pub use self::scorer::{score, MIN_PROBABILITY};

/// Tuning for candidate generation and ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpellerConfig {
    /// candidates must be within this many edits of the typed word
    pub max_distance: usize,
    /// maximum number of ranked suggestions, `None` for all candidates
    pub n_best: Option<usize>,
    /// probability substituted for table entries outside the alphabet
    pub floor_probability: f64,
}

impl SpellerConfig {
    /// Distance 2, ten suggestions and a floor of [`MIN_PROBABILITY`].
    pub const fn default() -> SpellerConfig {
        SpellerConfig {
            max_distance: DEFAULT_MAX_DISTANCE,
            n_best: Some(10),
            floor_probability: MIN_PROBABILITY,
        }
    }

    /// Rejects a floor outside `(0, 1]`. A floor of zero would make every
    /// word with an unseen letter impossible.
    pub fn validate(&self) -> Result<(), SpellerError> {
        if self.floor_probability > 0.0 && self.floor_probability <= 1.0 {
            Ok(())
        } else {
            Err(SpellerError::InvalidFloorProbability(self.floor_probability))
        }
    }
}

/// Checks and corrects words.
pub trait Speller {
    /// Whether `word` is a vocabulary word. Tokens without letters are
    /// always correct.
    fn is_correct(&self, word: &str) -> bool;
    /// Ranked suggestions for `word`, best first.
    fn suggest(&self, word: &str) -> Result<Vec<Suggestion>, SpellerError>;
    /// [`Speller::suggest`] with explicit tuning.
    fn suggest_with_config(
        &self,
        word: &str,
        config: &SpellerConfig,
    ) -> Result<Vec<Suggestion>, SpellerError>;
    /// The single most likely intended word for `word`.
    fn correct(&self, word: &str) -> Result<Suggestion, SpellerError>;
    /// [`Speller::correct`] with explicit tuning.
    fn correct_with_config(
        &self,
        word: &str,
        config: &SpellerConfig,
    ) -> Result<Suggestion, SpellerError>;
    /// Corrects every word of a line.
    fn correct_line(&self, line: &str) -> Result<String, SpellerError>;
}

/// Picks the most likely intended word for `typed`.
///
/// Candidates are scored by `prior × likelihood` in vocabulary order; the
/// first candidate wins ties. The score of the returned suggestion is its
/// [`Suggestion::weight`], convertible with [`Suggestion::probability`].
pub fn correct_word(
    typed: &str,
    vocabulary: &Vocabulary,
    prior: &WordPrior,
    transition: &TransitionTable,
    emission: &EmissionTable,
    config: &SpellerConfig,
) -> Result<Suggestion, SpellerError> {
    SpellerWorker::new(vocabulary, prior, transition, emission, typed, config).best()
}

/// A [`Speller`] over a [`TrainedModel`].
#[derive(Debug, Clone)]
pub struct HmmSpeller {
    model: TrainedModel,
}

impl HmmSpeller {
    /// Wraps a trained model.
    pub fn new(model: TrainedModel) -> HmmSpeller {
        HmmSpeller { model }
    }

    /// The model corrections are made against.
    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Gives the model back.
    pub fn into_model(self) -> TrainedModel {
        self.model
    }

    fn worker<'a>(&'a self, word: &'a str, config: &'a SpellerConfig) -> SpellerWorker<'a> {
        SpellerWorker::new(
            self.model.vocabulary(),
            self.model.prior(),
            self.model.transition(),
            self.model.emission(),
            word,
            config,
        )
    }

    fn check_alphabet(&self, word: &str) {
        let alphabet = self.model.alphabet();
        if word.chars().any(|c| !alphabet.contains(c)) {
            log::warn!("{:?} has letters outside the model alphabet", word);
        }
    }
}

impl Speller for HmmSpeller {
    fn is_correct(&self, word: &str) -> bool {
        if word.is_empty() || !is_word(word) {
            return true;
        }

        self.model.vocabulary().contains(&word.to_lowercase())
    }

    #[inline]
    fn suggest(&self, word: &str) -> Result<Vec<Suggestion>, SpellerError> {
        self.suggest_with_config(word, &SpellerConfig::default())
    }

    fn suggest_with_config(
        &self,
        word: &str,
        config: &SpellerConfig,
    ) -> Result<Vec<Suggestion>, SpellerError> {
        self.check_alphabet(word);
        self.worker(word, config).suggest()
    }

    #[inline]
    fn correct(&self, word: &str) -> Result<Suggestion, SpellerError> {
        self.correct_with_config(word, &SpellerConfig::default())
    }

    fn correct_with_config(
        &self,
        word: &str,
        config: &SpellerConfig,
    ) -> Result<Suggestion, SpellerError> {
        self.check_alphabet(word);
        self.worker(word, config).best()
    }

    /// Lowercases `line`, corrects every token that has a letter and joins
    /// the results with single spaces.
    fn correct_line(&self, line: &str) -> Result<String, SpellerError> {
        let line = line.to_lowercase();
        let config = SpellerConfig::default();

        let corrected = line
            .tokens()
            .map(|token| {
                if is_word(token) {
                    self.correct_with_config(token, &config)
                        .map(|s| s.value.to_string())
                } else {
                    Ok(token.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(corrected.join(" "))
    }
}
