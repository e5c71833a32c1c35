//! The closed symbol universe of a trained model.
//!
//! Hidden states are the alphabet letters plus the `Start` and `End`
//! sentinels; observed symbols are the alphabet letters plus `Gap`. Tables
//! are stored densely and addressed through the index helpers below, so a
//! symbol outside this universe simply has no index.
use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// A hidden state of the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// No correct letter seen yet
    Start,
    /// A letter of the correct word
    Letter(char),
    /// The correct word is complete
    End,
}

/// A symbol observed in a typed word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Observation {
    /// A typed letter
    Letter(char),
    /// An intended letter that was not typed
    Gap,
}

impl From<Option<char>> for Observation {
    fn from(slot: Option<char>) -> Observation {
        slot.map_or(Observation::Gap, Observation::Letter)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Start => f.write_str("<S>"),
            State::Letter(c) => write!(f, "{}", c),
            State::End => f.write_str("<E>"),
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::Letter(c) => write!(f, "{}", c),
            Observation::Gap => write!(f, "{}", crate::align::GAP_MARKER),
        }
    }
}

/// Sorted set of the letters appearing in the vocabulary.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<char>", into = "Vec<char>")]
pub struct Alphabet {
    letters: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Collects the letters of `words`.
    pub fn from_words<I, S>(words: I) -> Alphabet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let letters = words
            .into_iter()
            .flat_map(|w| w.as_ref().chars().collect::<Vec<_>>())
            .collect::<Vec<char>>();
        Alphabet::from(letters)
    }

    /// The letters in sorted order.
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Number of letters.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Whether there are no letters at all.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Whether `letter` belongs to the alphabet.
    pub fn contains(&self, letter: char) -> bool {
        self.index.contains_key(&letter)
    }

    /// Number of rows of a table keyed by source state: `Start` and every letter.
    pub fn source_count(&self) -> usize {
        self.letters.len() + 1
    }

    /// Number of destination states of a transition row: every letter and `End`.
    pub fn target_count(&self) -> usize {
        self.letters.len() + 1
    }

    /// Number of outcomes a transition row is smoothed over: every state,
    /// `Start` included. `Start` is never a destination, so it gets no
    /// column and its share of the smoothing mass is left out of the row.
    pub fn transition_outcomes(&self) -> usize {
        self.letters.len() + 2
    }

    /// Number of observed symbols of an emission row: every letter and `Gap`.
    pub fn observation_count(&self) -> usize {
        self.letters.len() + 1
    }

    /// Row of `state` in a table keyed by source state. `Start` is row 0.
    pub fn source_index(&self, state: State) -> Option<usize> {
        match state {
            State::Start => Some(0),
            State::Letter(c) => self.index.get(&c).map(|i| i + 1),
            State::End => None,
        }
    }

    /// Column of `state` in a transition row. `End` is the last column.
    pub fn target_index(&self, state: State) -> Option<usize> {
        match state {
            State::Start => None,
            State::Letter(c) => self.index.get(&c).copied(),
            State::End => Some(self.letters.len()),
        }
    }

    /// Column of `observation` in an emission row. `Gap` is the last column.
    pub fn observation_index(&self, observation: Observation) -> Option<usize> {
        match observation {
            Observation::Letter(c) => self.index.get(&c).copied(),
            Observation::Gap => Some(self.letters.len()),
        }
    }

    /// Source states in row order.
    pub fn source_states(&self) -> impl Iterator<Item = State> + '_ {
        std::iter::once(State::Start).chain(self.letters.iter().map(|&c| State::Letter(c)))
    }

    /// Destination states in column order.
    pub fn target_states(&self) -> impl Iterator<Item = State> + '_ {
        self.letters
            .iter()
            .map(|&c| State::Letter(c))
            .chain(std::iter::once(State::End))
    }

    /// Observed symbols in column order.
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.letters
            .iter()
            .map(|&c| Observation::Letter(c))
            .chain(std::iter::once(Observation::Gap))
    }
}

impl From<Vec<char>> for Alphabet {
    fn from(mut letters: Vec<char>) -> Alphabet {
        letters.sort_unstable();
        letters.dedup();

        let index = letters.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        Alphabet { letters, index }
    }
}

impl From<Alphabet> for Vec<char> {
    fn from(alphabet: Alphabet) -> Vec<char> {
        alphabet.letters
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.letters == other.letters
    }
}

impl Eq for Alphabet {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_are_sorted_and_unique() {
        let alphabet = Alphabet::from_words(&["cot", "cat", "act"]);
        assert_eq!(alphabet.letters(), &['a', 'c', 'o', 't']);
        assert!(alphabet.contains('o'));
        assert!(!alphabet.contains('x'));
    }

    #[test]
    fn indices_cover_the_closed_universe() {
        let alphabet = Alphabet::from_words(&["ab"]);

        assert_eq!(alphabet.source_index(State::Start), Some(0));
        assert_eq!(alphabet.source_index(State::Letter('b')), Some(2));
        assert_eq!(alphabet.source_index(State::End), None);
        assert_eq!(alphabet.source_index(State::Letter('z')), None);

        assert_eq!(alphabet.target_index(State::Letter('a')), Some(0));
        assert_eq!(alphabet.target_index(State::End), Some(2));
        assert_eq!(alphabet.target_index(State::Start), None);
        assert_eq!(alphabet.transition_outcomes(), 4);

        assert_eq!(alphabet.observation_index(Observation::Gap), Some(2));
        assert_eq!(alphabet.observation_index(Observation::Letter('z')), None);

        let sources: Vec<State> = alphabet.source_states().collect();
        assert_eq!(
            sources,
            vec![State::Start, State::Letter('a'), State::Letter('b')]
        );
        for (i, state) in alphabet.source_states().enumerate() {
            assert_eq!(alphabet.source_index(state), Some(i));
        }
        for (i, state) in alphabet.target_states().enumerate() {
            assert_eq!(alphabet.target_index(state), Some(i));
        }
        for (i, obs) in alphabet.observations().enumerate() {
            assert_eq!(alphabet.observation_index(obs), Some(i));
        }
    }

    #[test]
    fn serializes_as_letter_list() {
        let alphabet = Alphabet::from_words(&["ba"]);
        let json = serde_json::to_string(&alphabet).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let back: Alphabet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alphabet);
        assert_eq!(back.target_index(State::Letter('b')), Some(1));
    }
}
