//! Suggestion for a spelling correction.
use crate::types::Weight;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::cmp::Ordering::Equal;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Suggestion for a spelling correction
pub struct Suggestion {
    /// the suggested word
    pub value: SmolStr,
    /// `-ln(prior × likelihood)` of the word, lower is better
    pub weight: Weight,
}

impl Suggestion {
    /// creates a spelling correction suggestion
    pub fn new(value: SmolStr, weight: Weight) -> Suggestion {
        Suggestion { value, weight }
    }

    /// gets the suggested word
    pub fn value(&self) -> &str {
        &self.value
    }

    /// gets the weight of the suggestion
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// gets `prior × likelihood` as a plain probability; underflows to 0
    /// for very unlikely words, compare weights instead
    pub fn probability(&self) -> f64 {
        self.weight.probability()
    }
}

impl PartialOrd for Suggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Suggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        let x = self.weight.partial_cmp(&other.weight).unwrap_or(Equal);

        if let Equal = x {
            return self.value.cmp(&other.value);
        }

        x
    }
}

impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.weight == other.weight
    }
}

impl Eq for Suggestion {}
