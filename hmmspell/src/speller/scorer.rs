//! Likelihood of a typed word given a candidate correct word.
use crate::align::align;
use crate::model::{EmissionTable, Observation, State, TransitionTable};
use crate::types::Weight;

/// Probability used in place of a table entry that does not exist, such as
/// the emission of a typed letter that never occurs in the vocabulary.
pub const MIN_PROBABILITY: f64 = 1e-12;

/// Scores `typed` as a misspelling of `candidate`.
///
/// The candidate is aligned onto the typed word. The transitions of the
/// candidate's letters, from `Start` to `End`, are multiplied with the
/// emission of every aligned typed symbol, each emitted by the last real
/// candidate letter at or before its position. Lookups outside the tables
/// use `floor_probability`.
///
/// The product is accumulated as a [`Weight`], so long words do not
/// underflow; lower weights are more likely.
pub fn score(
    candidate: &str,
    typed: &str,
    transition: &TransitionTable,
    emission: &EmissionTable,
    floor_probability: f64,
) -> Weight {
    let alignment = align(candidate, typed);
    let weigh = |p: Option<f64>| Weight::from_probability(p.unwrap_or(floor_probability));

    let mut weight = Weight::ZERO;

    let mut previous = State::Start;
    for &letter in alignment.correct().iter().flatten() {
        let next = State::Letter(letter);
        weight += weigh(transition.probability(previous, next));
        previous = next;
    }
    weight += weigh(transition.probability(previous, State::End));

    let mut last_real = State::Start;
    for (correct, typed) in alignment.pairs() {
        if let Some(letter) = correct {
            last_real = State::Letter(letter);
        }
        weight += weigh(emission.probability(last_real, Observation::from(typed)));
    }

    weight
}
