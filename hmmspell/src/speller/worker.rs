use smol_str::SmolStr;

use super::candidates::generate_candidates;
use super::scorer::score;
use super::SpellerConfig;
use crate::corpus::Vocabulary;
use crate::model::{EmissionTable, TransitionTable, WordPrior};
use crate::speller::error::SpellerError;
use crate::speller::suggestion::Suggestion;
use crate::types::Weight;

/// Corrects one typed word against borrowed model tables.
pub(crate) struct SpellerWorker<'a> {
    vocabulary: &'a Vocabulary,
    prior: &'a WordPrior,
    transition: &'a TransitionTable,
    emission: &'a EmissionTable,
    input: &'a str,
    config: &'a SpellerConfig,
}

impl<'a> SpellerWorker<'a> {
    #[inline(always)]
    pub(crate) fn new(
        vocabulary: &'a Vocabulary,
        prior: &'a WordPrior,
        transition: &'a TransitionTable,
        emission: &'a EmissionTable,
        input: &'a str,
        config: &'a SpellerConfig,
    ) -> SpellerWorker<'a> {
        SpellerWorker {
            vocabulary,
            prior,
            transition,
            emission,
            input,
            config,
        }
    }

    fn candidates(&self) -> Result<Vec<&'a SmolStr>, SpellerError> {
        self.config.validate()?;
        if self.vocabulary.is_empty() {
            return Err(SpellerError::EmptyVocabulary);
        }

        Ok(generate_candidates(
            self.input,
            self.vocabulary,
            self.config.max_distance,
        ))
    }

    /// `-ln(prior × likelihood)`; words without a prior count as prior 0.
    fn weigh(&self, word: &str) -> Weight {
        let prior = self.prior.get(word).unwrap_or(0.0);

        Weight::from_probability(prior)
            + score(
                word,
                self.input,
                self.transition,
                self.emission,
                self.config.floor_probability,
            )
    }

    /// The most likely candidate. Only a strictly better weight replaces the
    /// current best, so the earliest candidate wins ties.
    pub(crate) fn best(&self) -> Result<Suggestion, SpellerError> {
        let mut best: Option<Suggestion> = None;

        for word in self.candidates()? {
            let weight = self.weigh(word);

            if best.as_ref().map_or(true, |current| weight < current.weight) {
                best = Some(Suggestion::new(word.clone(), weight));
            }
        }

        best.ok_or(SpellerError::EmptyVocabulary)
    }

    /// Every candidate, best first, cut to `n_best`.
    pub(crate) fn suggest(&self) -> Result<Vec<Suggestion>, SpellerError> {
        let mut out = self
            .candidates()?
            .into_iter()
            .map(|word| Suggestion::new(word.clone(), self.weigh(word)))
            .collect::<Vec<_>>();

        out.sort();
        if let Some(n_best) = self.config.n_best {
            out.truncate(n_best);
        }

        Ok(out)
    }
}
