/*! Spelling correction with a character-level hidden Markov model.

The model is learned from a corpus of `correct: typo1 typo2 ...` records.
Every (correct, typed) pair is aligned with a minimum edit distance
alignment, and the aligned pairs are counted into an emission table
(what gets typed for each intended letter), a letter bigram transition
table over the correct words, and a word prior.

A typed token is corrected by restricting the vocabulary to the words within
a small edit distance, scoring every candidate against the token along their
alignment, and picking the candidate with the highest
`prior × likelihood`.

# Usage examples

```
use hmmspell::corpus::Corpus;
use hmmspell::model::TrainedModel;
use hmmspell::speller::{HmmSpeller, Speller};

let corpus: Corpus = "cat: caat ct\ncot: cott".parse()?;
let model = TrainedModel::train(&corpus)?;
let speller = HmmSpeller::new(model);

let best = speller.correct("caat")?;
assert_eq!(best.value(), "cat");
# Ok::<(), Box<dyn std::error::Error>>(())
```

Further examples of how to use the library can be found in `hmmspell-bin`
in the same repository.
*/

#![warn(missing_docs)]
pub mod align;
pub mod archive;
pub mod corpus;
pub mod model;
pub mod speller;
pub mod tokenizer;
pub mod types;

/// Installs an `env_logger` backend for the `log` records emitted by this
/// crate, for embedders that do not bring their own logger.
#[cfg(feature = "logging")]
pub fn enable_logging() {
    let _ = env_logger::try_init();
}
