//! Word prior: how often each word was the intended one in training.
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::error::TrainingError;
use crate::corpus::{TrainingPair, Vocabulary};

/// Probability of each vocabulary word being the intended word.
///
/// The prior is not smoothed: a word that never appears as the correct side
/// of a training pair gets probability 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordPrior {
    probabilities: HashMap<SmolStr, f64>,
}

impl WordPrior {
    /// Prior of `word`, `None` for words outside the vocabulary.
    pub fn get(&self, word: &str) -> Option<f64> {
        self.probabilities.get(word).copied()
    }

    /// Number of words with a prior.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Whether no word has a prior.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Iterates over `(word, probability)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, f64)> + '_ {
        self.probabilities.iter().map(|(k, v)| (k, *v))
    }
}

/// Builds the word prior from training pairs.
///
/// Every vocabulary word is a key. Pairs whose correct word is not in the
/// vocabulary are ignored and do not count towards the total.
pub fn find_word_prior(
    pairs: &[TrainingPair],
    vocabulary: &Vocabulary,
) -> Result<WordPrior, TrainingError> {
    if vocabulary.is_empty() {
        return Err(TrainingError::EmptyVocabulary);
    }

    let mut frequency = vec![0u64; vocabulary.len()];
    let mut ignored = 0usize;

    for pair in pairs {
        match vocabulary.position(&pair.correct) {
            Some(i) => frequency[i] += 1,
            None => ignored += 1,
        }
    }

    if ignored > 0 {
        log::warn!("{} training pairs have a correct word outside the vocabulary", ignored);
    }

    let total: u64 = frequency.iter().sum();
    if total == 0 {
        return Err(TrainingError::NoTrainingPairs);
    }

    let probabilities = vocabulary
        .iter()
        .zip(frequency)
        .map(|(word, count)| (word.clone(), count as f64 / total as f64))
        .collect();

    Ok(WordPrior { probabilities })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<TrainingPair> {
        raw.iter().map(|(c, t)| TrainingPair::new(*c, *t)).collect()
    }

    #[test]
    fn frequencies_over_pairs() {
        let vocabulary = Vocabulary::from_words(vec!["cat", "cot", "dog"]);
        let prior = find_word_prior(
            &pairs(&[("cat", "caat"), ("cat", "ct"), ("dog", "dgo"), ("cat", "kat")]),
            &vocabulary,
        )
        .unwrap();

        assert_eq!(prior.len(), 3);
        assert_eq!(prior.get("cat"), Some(0.75));
        assert_eq!(prior.get("dog"), Some(0.25));
        assert_eq!(prior.get("cot"), Some(0.0));
        assert_eq!(prior.get("cow"), None);

        let sum: f64 = prior.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_vocabulary() {
        assert!(matches!(
            find_word_prior(&pairs(&[("cat", "ct")]), &Vocabulary::default()),
            Err(TrainingError::EmptyVocabulary)
        ));
    }

    #[test]
    fn no_usable_pairs() {
        let vocabulary = Vocabulary::from_words(vec!["cat"]);
        assert!(matches!(
            find_word_prior(&[], &vocabulary),
            Err(TrainingError::NoTrainingPairs)
        ));
        assert!(matches!(
            find_word_prior(&pairs(&[("dog", "dgo")]), &vocabulary),
            Err(TrainingError::NoTrainingPairs)
        ));
    }
}
