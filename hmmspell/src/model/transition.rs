//! Letter bigram model over the correct words.
use serde::{Deserialize, Serialize};

use super::alphabet::{Alphabet, State};
use super::error::ModelShapeError;

/// Letter-to-letter transition counts, before smoothing.
///
/// Rows are `Start` followed by every letter, columns every letter followed
/// by `End`.
#[derive(Clone, Debug)]
pub struct TransitionCounts {
    alphabet: Alphabet,
    counts: Vec<Vec<u64>>,
    skipped: u64,
}

impl TransitionCounts {
    /// Zeroed counts over `alphabet`.
    pub fn new(alphabet: &Alphabet) -> TransitionCounts {
        TransitionCounts {
            alphabet: alphabet.clone(),
            counts: vec![vec![0; alphabet.target_count()]; alphabet.source_count()],
            skipped: 0,
        }
    }

    /// Counts the transitions of `word`, from `Start` through every letter
    /// to `End`. Letters outside the alphabet are skipped.
    pub fn observe(&mut self, word: &str) {
        let mut previous = State::Start;

        for letter in word.chars() {
            let next = State::Letter(letter);
            if !self.add(previous, next) {
                self.skipped += 1;
                continue;
            }
            previous = next;
        }

        self.add(previous, State::End);
    }

    fn add(&mut self, from: State, to: State) -> bool {
        match (
            self.alphabet.source_index(from),
            self.alphabet.target_index(to),
        ) {
            (Some(row), Some(column)) => {
                self.counts[row][column] += 1;
                true
            }
            _ => false,
        }
    }

    /// Adds the counts of `other`, built over the same alphabet.
    pub fn merge(mut self, other: TransitionCounts) -> TransitionCounts {
        debug_assert_eq!(self.alphabet, other.alphabet);

        for (row, other_row) in self.counts.iter_mut().zip(other.counts) {
            for (count, other_count) in row.iter_mut().zip(other_row) {
                *count += other_count;
            }
        }
        self.skipped += other.skipped;
        self
    }

    /// Raw count of `from -> to`, `None` outside the alphabet.
    pub fn count(&self, from: State, to: State) -> Option<u64> {
        let row = self.alphabet.source_index(from)?;
        let column = self.alphabet.target_index(to)?;
        Some(self.counts[row][column])
    }

    /// Applies add-one smoothing to every row, over every letter plus
    /// `Start` and `End`. Rows sum to one minus the mass of `Start`.
    pub fn into_table(self) -> TransitionTable {
        if self.skipped > 0 {
            log::warn!(
                "{} letters outside the alphabet were skipped while counting transitions",
                self.skipped
            );
        }

        let outcomes = self.alphabet.transition_outcomes() as f64;
        let rows = self
            .counts
            .into_iter()
            .map(|row| {
                let total = row.iter().sum::<u64>() as f64 + outcomes;
                row.into_iter().map(|c| (c as f64 + 1.0) / total).collect()
            })
            .collect();

        TransitionTable {
            alphabet: self.alphabet,
            rows,
        }
    }
}

/// Smoothed transition probabilities, `P(next state | current state)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionTable {
    alphabet: Alphabet,
    rows: Vec<Vec<f64>>,
}

impl TransitionTable {
    /// The alphabet the table is indexed by.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Probability of moving from `from` to `to`. `None` when either state
    /// is outside the alphabet, or `from` is `End`, or `to` is `Start`.
    pub fn probability(&self, from: State, to: State) -> Option<f64> {
        let row = self.alphabet.source_index(from)?;
        let column = self.alphabet.target_index(to)?;
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
            "transition",
            &self.rows,
            self.alphabet.source_count(),
            self.alphabet.target_count(),
        )
    }
}

/// Builds the transition table from the correct words.
pub fn find_transition<I, S>(correct_words: I, alphabet: &Alphabet) -> TransitionTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = TransitionCounts::new(alphabet);
    for word in correct_words {
        counts.observe(word.as_ref());
    }
    counts.into_table()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_the_word() {
        let alphabet = Alphabet::from_words(&["cat", "cot"]);
        let mut counts = TransitionCounts::new(&alphabet);
        counts.observe("cat");
        counts.observe("cot");

        let c = State::Letter('c');
        assert_eq!(counts.count(State::Start, c), Some(2));
        assert_eq!(counts.count(c, State::Letter('a')), Some(1));
        assert_eq!(counts.count(c, State::Letter('o')), Some(1));
        assert_eq!(counts.count(State::Letter('t'), State::End), Some(2));
        assert_eq!(counts.count(State::Start, State::End), Some(0));
    }

    #[test]
    fn smoothing() {
        let alphabet = Alphabet::from_words(&["ab"]);
        let table = find_transition(&["ab"], &alphabet);

        // smoothed over {<S>, a, b, <E>}
        let p = |from, to| table.probability(from, to).unwrap();
        assert!((p(State::Start, State::Letter('a')) - 2.0 / 5.0).abs() < 1e-12);
        assert!((p(State::Start, State::Letter('b')) - 1.0 / 5.0).abs() < 1e-12);
        assert!((p(State::Letter('b'), State::End) - 2.0 / 5.0).abs() < 1e-12);
        assert!((p(State::Letter('a'), State::End) - 1.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn empty_word_goes_straight_to_end() {
        let alphabet = Alphabet::from_words(&["a"]);
        let mut counts = TransitionCounts::new(&alphabet);
        counts.observe("");
        assert_eq!(counts.count(State::Start, State::End), Some(1));
    }

    #[test]
    fn rows_miss_only_the_start_share() {
        let words = ["apple", "banana", "cat", "cot", "zebra"];
        let alphabet = Alphabet::from_words(&words);

        let mut counts = TransitionCounts::new(&alphabet);
        for word in &words {
            counts.observe(word);
        }
        let totals: Vec<u64> = alphabet
            .source_states()
            .map(|from| {
                alphabet
                    .target_states()
                    .map(|to| counts.count(from, to).unwrap())
                    .sum()
            })
            .collect();
        let table = counts.into_table();

        assert_eq!(table.rows().count(), alphabet.len() + 1);
        for ((state, row), total) in table.rows().zip(totals) {
            assert_eq!(row.len(), alphabet.len() + 1);
            let start_share = 1.0 / (total + alphabet.transition_outcomes() as u64) as f64;
            let sum: f64 = row.iter().sum();
            assert!(
                (sum + start_share - 1.0).abs() < 1e-9,
                "{} sums to {}",
                state,
                sum
            );
        }
    }

    #[test]
    fn start_share_changes_the_best_word() {
        use crate::speller::{HmmSpeller, Speller};

        let corpus: crate::corpus::Corpus = "a: ccc\nac: aca aaca\n".parse().unwrap();
        let model = crate::model::TrainedModel::train(&corpus).unwrap();

        let p = model
            .transition()
            .probability(State::Start, State::Letter('a'))
            .unwrap();
        assert!((p - 0.5).abs() < 1e-12, "{}", p);

        let speller = HmmSpeller::new(model);
        assert_eq!(speller.correct("aca").unwrap().value(), "a");
    }

    #[test]
    fn outside_the_universe() {
        let alphabet = Alphabet::from_words(&["ab"]);
        let table = find_transition(&["ab"], &alphabet);

        assert_eq!(table.probability(State::Letter('a'), State::Letter('z')), None);
        assert_eq!(table.probability(State::End, State::Letter('a')), None);
        assert_eq!(table.probability(State::Letter('a'), State::Start), None);
    }

    #[test]
    fn merge() {
        let alphabet = Alphabet::from_words(&["cat", "cot"]);
        let mut left = TransitionCounts::new(&alphabet);
        left.observe("cat");
        let mut right = TransitionCounts::new(&alphabet);
        right.observe("cot");

        assert_eq!(
            left.merge(right).into_table(),
            find_transition(&["cat", "cot"], &alphabet)
        );
    }
}
