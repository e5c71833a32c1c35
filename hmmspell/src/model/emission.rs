//! Emission model: what gets typed for an intended letter.
use serde::{Deserialize, Serialize};

use super::alphabet::{Alphabet, Observation, State};
use super::error::ModelShapeError;
use crate::align::Alignment;

/// Observation counts per hidden state, before smoothing.
///
/// Rows are `Start` followed by every letter; columns every letter followed
/// by `Gap`. Counters built on separate slices of the training data can be
/// merged before turning them into a table.
#[derive(Clone, Debug)]
pub struct EmissionCounts {
    alphabet: Alphabet,
    counts: Vec<Vec<u64>>,
    skipped: u64,
}

impl EmissionCounts {
    /// Zeroed counts over `alphabet`.
    pub fn new(alphabet: &Alphabet) -> EmissionCounts {
        EmissionCounts {
            alphabet: alphabet.clone(),
            counts: vec![vec![0; alphabet.observation_count()]; alphabet.source_count()],
            skipped: 0,
        }
    }

    /// Counts one aligned (correct, typed) pair.
    ///
    /// A real correct letter emits the typed symbol at its position, which
    /// is a gap when the letter was left out. Letters inserted by the typist
    /// (a gap on the correct side) are attributed to the most recent real
    /// correct letter, or to `Start` before the first one.
    pub fn observe(&mut self, alignment: &Alignment) {
        let mut last_real = State::Start;

        for (correct, typed) in alignment.pairs() {
            if let Some(letter) = correct {
                if !self.alphabet.contains(letter) {
                    self.skipped += 1;
                    continue;
                }
                last_real = State::Letter(letter);
            }

            let row = self.alphabet.source_index(last_real);
            let column = self.alphabet.observation_index(Observation::from(typed));

            match (row, column) {
                (Some(row), Some(column)) => self.counts[row][column] += 1,
                _ => self.skipped += 1,
            }
        }
    }

    /// Adds the counts of `other`, built over the same alphabet.
    pub fn merge(mut self, other: EmissionCounts) -> EmissionCounts {
        debug_assert_eq!(self.alphabet, other.alphabet);

        for (row, other_row) in self.counts.iter_mut().zip(other.counts) {
            for (count, other_count) in row.iter_mut().zip(other_row) {
                *count += other_count;
            }
        }
        self.skipped += other.skipped;
        self
    }

    /// Observations ignored because a symbol was outside the alphabet.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Raw count of `observation` typed for `state`, `None` outside the
    /// alphabet.
    pub fn count(&self, state: State, observation: Observation) -> Option<u64> {
        let row = self.alphabet.source_index(state)?;
        let column = self.alphabet.observation_index(observation)?;
        Some(self.counts[row][column])
    }

    /// Applies add-one smoothing to every row.
    pub fn into_table(self) -> EmissionTable {
        if self.skipped > 0 {
            log::warn!(
                "{} emission observations had symbols outside the alphabet and were skipped",
                self.skipped
            );
        }

        let outcomes = self.alphabet.observation_count() as f64;
        let rows = self
            .counts
            .into_iter()
            .map(|row| {
                let total = row.iter().sum::<u64>() as f64 + outcomes;
                row.into_iter().map(|c| (c as f64 + 1.0) / total).collect()
            })
            .collect();

        EmissionTable {
            alphabet: self.alphabet,
            rows,
        }
    }
}

/// Smoothed emission probabilities, `P(observed symbol | last real letter)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmissionTable {
    alphabet: Alphabet,
    rows: Vec<Vec<f64>>,
}

impl EmissionTable {
    /// The alphabet the table is indexed by.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Probability of typing `observation` while `state` is the last real
    /// correct letter. `None` when either symbol is outside the alphabet.
    pub fn probability(&self, state: State, observation: Observation) -> Option<f64> {
        let row = self.alphabet.source_index(state)?;
        let column = self.alphabet.observation_index(observation)?;
        Some(self.rows[row][column])
    }

    /// Iterates over `(state, row)` in row order.
    pub fn rows(&self) -> impl Iterator<Item = (State, &[f64])> + '_ {
        self.alphabet
            .source_states()
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    pub(crate) fn validate(&self) -> Result<(), ModelShapeError> {
        super::validate_rows(
            "emission",
            &self.rows,
            self.alphabet.source_count(),
            self.alphabet.observation_count(),
        )
    }
}

/// Builds the emission table from aligned training pairs.
pub fn find_emission<'a, I>(aligned_pairs: I, alphabet: &Alphabet) -> EmissionTable
where
    I: IntoIterator<Item = &'a Alignment>,
{
    let mut counts = EmissionCounts::new(alphabet);
    for alignment in aligned_pairs {
        counts.observe(alignment);
    }
    counts.into_table()
}
