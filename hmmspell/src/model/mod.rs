//! The trained model: vocabulary, word prior, transition and emission tables.
//!
//! A model is built once by [`TrainedModel::train`] and is read-only
//! afterwards; correction borrows it.
use serde::Serialize;
use smol_str::SmolStr;

pub mod alphabet;
pub mod emission;
pub mod error;
pub mod prior;
pub mod transition;

pub use self::alphabet::{Alphabet, Observation, State};
pub use self::emission::{find_emission, EmissionCounts, EmissionTable};
pub use self::error::{ModelShapeError, TrainingError};
pub use self::prior::{find_word_prior, WordPrior};
pub use self::transition::{find_transition, TransitionCounts, TransitionTable};

use crate::align::{align, Alignment};
use crate::corpus::{Corpus, Vocabulary};

/// Everything correction needs, bundled and validated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainedModel {
    vocabulary: Vocabulary,
    prior: WordPrior,
    transition: TransitionTable,
    emission: EmissionTable,
}

impl TrainedModel {
    /// Trains a model on `corpus`.
    ///
    /// The alphabet is the set of letters of the vocabulary words. Every
    /// training pair is aligned and counted into the emission table; the
    /// transition table is counted over the vocabulary words, once each.
    pub fn train(corpus: &Corpus) -> Result<TrainedModel, TrainingError> {
        let vocabulary = corpus.vocabulary();
        if vocabulary.is_empty() {
            return Err(TrainingError::EmptyVocabulary);
        }

        let alphabet = corpus.alphabet();
        log::debug!(
            "Training on {} pairs, {} words, {} letters",
            corpus.pairs().len(),
            vocabulary.len(),
            alphabet.len()
        );

        let prior = find_word_prior(corpus.pairs(), vocabulary)?;

        let aligned: Vec<Alignment> = corpus
            .pairs()
            .iter()
            .map(|pair| align(&pair.correct, &pair.typed))
            .collect();
        let emission = find_emission(&aligned, &alphabet);
        let transition = find_transition(vocabulary.iter().map(SmolStr::as_str), &alphabet);

        Ok(TrainedModel {
            vocabulary: vocabulary.clone(),
            prior,
            transition,
            emission,
        })
    }

    /// Assembles a model from separately built or deserialized parts,
    /// checking that they cover the same key universe.
    pub fn new(
        vocabulary: Vocabulary,
        prior: WordPrior,
        transition: TransitionTable,
        emission: EmissionTable,
    ) -> Result<TrainedModel, ModelShapeError> {
        if vocabulary.is_empty() {
            return Err(ModelShapeError::EmptyVocabulary);
        }

        if transition.alphabet() != emission.alphabet() {
            return Err(ModelShapeError::AlphabetMismatch);
        }
        transition.validate()?;
        emission.validate()?;

        let alphabet = transition.alphabet();
        for word in &vocabulary {
            if !word.chars().all(|c| alphabet.contains(c)) {
                return Err(ModelShapeError::WordOutsideAlphabet(word.clone()));
            }
            if prior.get(word).is_none() {
                return Err(ModelShapeError::MissingPrior(word.clone()));
            }
        }
        if let Some((word, _)) = prior.iter().find(|(w, _)| !vocabulary.contains(w)) {
            return Err(ModelShapeError::UnknownPriorWord(word.clone()));
        }

        Ok(TrainedModel {
            vocabulary,
            prior,
            transition,
            emission,
        })
    }

    /// The correct words, sorted.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// How often each word was the intended one.
    pub fn prior(&self) -> &WordPrior {
        &self.prior
    }

    /// Letter-to-letter probabilities.
    pub fn transition(&self) -> &TransitionTable {
        &self.transition
    }

    /// Typed-symbol probabilities per intended letter.
    pub fn emission(&self) -> &EmissionTable {
        &self.emission
    }

    /// The letters both tables are indexed by.
    pub fn alphabet(&self) -> &Alphabet {
        self.transition.alphabet()
    }
}

pub(crate) fn validate_rows(
    table: &'static str,
    rows: &[Vec<f64>],
    expected_rows: usize,
    expected_columns: usize,
) -> Result<(), ModelShapeError> {
    if rows.len() != expected_rows {
        return Err(ModelShapeError::RowCount {
            table,
            expected: expected_rows,
            found: rows.len(),
        });
    }

    for (i, row) in rows.iter().enumerate() {
        if row.len() != expected_columns {
            return Err(ModelShapeError::RowWidth {
                table,
                row: i,
                expected: expected_columns,
                found: row.len(),
            });
        }
        if let Some(&value) = row.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(ModelShapeError::NotAProbability {
                table,
                row: i,
                value,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TrainingPair;

    fn corpus() -> Corpus {
        "cat: caat ct\ncot: cott\napple: aapple aple".parse().unwrap()
    }

    #[test]
    fn train() {
        let model = TrainedModel::train(&corpus()).unwrap();

        assert_eq!(model.vocabulary().words(), &["apple", "cat", "cot"]);
        assert_eq!(model.alphabet().letters(), &['a', 'c', 'e', 'l', 'o', 'p', 't']);
        assert_eq!(model.prior().get("cat"), Some(0.4));

        let sum: f64 = model.prior().iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-12);

        for (_, row) in model.emission().rows() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
        for (_, row) in model.transition().rows() {
            let sum: f64 = row.iter().sum();
            assert!(sum > 0.5 && sum < 1.0);
        }
    }

    #[test]
    fn apple_start_emission() {
        let corpus = Corpus::from_pairs(vec![TrainingPair::new("apple", "aapple")]);
        let model = TrainedModel::train(&corpus).unwrap();

        let p = model
            .emission()
            .probability(State::Start, Observation::Letter('a'))
            .unwrap();
        assert!(p > 0.0);
    }

    #[test]
    fn empty_vocabulary_is_rejected() {
        assert!(matches!(
            TrainedModel::train(&Corpus::default()),
            Err(TrainingError::EmptyVocabulary)
        ));
    }

    #[test]
    fn vocabulary_without_typos_is_rejected() {
        let corpus: Corpus = "cat:\ncot:".parse().unwrap();
        assert!(matches!(
            TrainedModel::train(&corpus),
            Err(TrainingError::NoTrainingPairs)
        ));
    }

    #[test]
    fn parts_are_validated() {
        let model = TrainedModel::train(&corpus()).unwrap();
        let rebuilt = TrainedModel::new(
            model.vocabulary().clone(),
            model.prior().clone(),
            model.transition().clone(),
            model.emission().clone(),
        )
        .unwrap();
        assert_eq!(rebuilt, model);

        let other = Alphabet::from_words(&["xyz"]);
        let emission = find_emission(&[align("xyz", "xy")], &other);
        assert!(matches!(
            TrainedModel::new(
                model.vocabulary().clone(),
                model.prior().clone(),
                model.transition().clone(),
                emission,
            ),
            Err(ModelShapeError::AlphabetMismatch)
        ));

        let bigger = Vocabulary::from_words(vec!["apple", "cat", "cot", "tea"]);
        assert!(matches!(
            TrainedModel::new(
                bigger,
                model.prior().clone(),
                model.transition().clone(),
                model.emission().clone(),
            ),
            Err(ModelShapeError::MissingPrior(w)) if w == "tea"
        ));
    }

    #[test]
    fn malformed_table_is_rejected() {
        let model = TrainedModel::train(&corpus()).unwrap();
        let mut json = serde_json::to_value(model.transition()).unwrap();
        json["rows"][1].as_array_mut().unwrap().pop();
        let transition: TransitionTable = serde_json::from_value(json).unwrap();

        assert!(matches!(
            TrainedModel::new(
                model.vocabulary().clone(),
                model.prior().clone(),
                transition,
                model.emission().clone(),
            ),
            Err(ModelShapeError::RowWidth { table: "transition", row: 1, .. })
        ));
    }
}
