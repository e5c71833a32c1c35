//! Training corpus: (correct, typed) word pairs and the vocabulary of
//! correct words.
//!
//! The text format is one record per line, `correct: typo1 typo2 ...`,
//! case-insensitive, typos separated by whitespace.
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

pub mod error;

pub use self::error::CorpusError;
use crate::model::Alphabet;

/// One observation: the word that was meant, and what was typed instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingPair {
    /// the intended word
    pub correct: SmolStr,
    /// the word as typed
    pub typed: SmolStr,
}

impl TrainingPair {
    /// Pairs an intended word with one typed form of it.
    pub fn new(correct: impl Into<SmolStr>, typed: impl Into<SmolStr>) -> TrainingPair {
        TrainingPair {
            correct: correct.into(),
            typed: typed.into(),
        }
    }
}

/// Sorted set of distinct correct words.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<SmolStr>", into = "Vec<SmolStr>")]
pub struct Vocabulary {
    words: Vec<SmolStr>,
    index: HashMap<SmolStr, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary, sorting and deduplicating `words`.
    pub fn from_words<I, S>(words: I) -> Vocabulary
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Vocabulary::from(words.into_iter().map(Into::into).collect::<Vec<SmolStr>>())
    }

    /// The words, in sorted order.
    pub fn words(&self) -> &[SmolStr] {
        &self.words
    }

    /// Iterates over the words in sorted order.
    pub fn iter(&self) -> std::slice::Iter<'_, SmolStr> {
        self.words.iter()
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether there are no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether `word` is a vocabulary word, compared exactly.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Position of `word` in sorted order.
    pub fn position(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }
}

impl From<Vec<SmolStr>> for Vocabulary {
    fn from(mut words: Vec<SmolStr>) -> Vocabulary {
        words.sort();
        words.dedup();

        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();

        Vocabulary { words, index }
    }
}

impl From<Vocabulary> for Vec<SmolStr> {
    fn from(vocabulary: Vocabulary) -> Vec<SmolStr> {
        vocabulary.words
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words
    }
}

impl Eq for Vocabulary {}

impl<'a> IntoIterator for &'a Vocabulary {
    type Item = &'a SmolStr;
    type IntoIter = std::slice::Iter<'a, SmolStr>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

/// A parsed training corpus.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    pairs: Vec<TrainingPair>,
    vocabulary: Vocabulary,
}

impl Corpus {
    /// Builds a corpus from already separated parts. Correct words of
    /// `pairs` that are missing from `vocabulary` are ignored by training.
    pub fn new(pairs: Vec<TrainingPair>, vocabulary: Vocabulary) -> Corpus {
        Corpus { pairs, vocabulary }
    }

    /// Builds a corpus whose vocabulary is the set of correct words of `pairs`.
    pub fn from_pairs<I>(pairs: I) -> Corpus
    where
        I: IntoIterator<Item = TrainingPair>,
    {
        let pairs: Vec<TrainingPair> = pairs.into_iter().collect();
        let vocabulary = Vocabulary::from_words(pairs.iter().map(|p| p.correct.clone()));
        Corpus { pairs, vocabulary }
    }

    /// Opens and parses a corpus file.
    pub fn open(path: &Path) -> Result<Corpus, CorpusError> {
        let file = std::fs::File::open(path)
            .map_err(|e| CorpusError::Io(path.to_string_lossy().to_string(), e))?;
        let corpus = Corpus::from_reader(file, &path.to_string_lossy())?;

        log::debug!(
            "Loaded {} pairs and {} words from {}",
            corpus.pairs.len(),
            corpus.vocabulary.len(),
            path.display()
        );

        Ok(corpus)
    }

    /// Parses a corpus from a reader; `name` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, name: &str) -> Result<Corpus, CorpusError> {
        let mut pairs = vec![];
        let mut words = vec![];

        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let line = line.map_err(|e| CorpusError::Io(name.to_string(), e))?;
            parse_record(&line, i + 1, &mut pairs, &mut words)?;
        }

        Ok(Corpus {
            pairs,
            vocabulary: Vocabulary::from(words),
        })
    }

    /// Every (correct, typed) pair, in corpus order.
    pub fn pairs(&self) -> &[TrainingPair] {
        &self.pairs
    }

    /// The correct words.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The letters of every vocabulary word.
    pub fn alphabet(&self) -> Alphabet {
        Alphabet::from_words(self.vocabulary.iter().map(SmolStr::as_str))
    }
}

impl FromStr for Corpus {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Corpus, CorpusError> {
        let mut pairs = vec![];
        let mut words = vec![];

        for (i, line) in s.lines().enumerate() {
            parse_record(line, i + 1, &mut pairs, &mut words)?;
        }

        Ok(Corpus {
            pairs,
            vocabulary: Vocabulary::from(words),
        })
    }
}

fn parse_record(
    line: &str,
    number: usize,
    pairs: &mut Vec<TrainingPair>,
    words: &mut Vec<SmolStr>,
) -> Result<(), CorpusError> {
    let (correct, typos) =
        line.trim()
            .split_once(':')
            .ok_or_else(|| CorpusError::MissingSeparator {
                line: number,
                content: line.to_string(),
            })?;

    let correct = SmolStr::from(correct.trim().to_lowercase());
    for typed in typos.split_whitespace() {
        pairs.push(TrainingPair::new(correct.clone(), typed.to_lowercase()));
    }
    words.push(correct);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_records() {
        let corpus: Corpus = "Cat: caat CT\ncot:\napple: aapple aple\n".parse().unwrap();

        assert_eq!(
            corpus.pairs(),
            &[
                TrainingPair::new("cat", "caat"),
                TrainingPair::new("cat", "ct"),
                TrainingPair::new("apple", "aapple"),
                TrainingPair::new("apple", "aple"),
            ]
        );
        assert_eq!(corpus.vocabulary().words(), &["apple", "cat", "cot"]);
        assert_eq!(corpus.alphabet().letters(), &['a', 'c', 'e', 'l', 'o', 'p', 't']);
    }

    #[test]
    fn duplicate_records_merge_in_vocabulary() {
        let corpus: Corpus = "cat: caat\ncat: ct".parse().unwrap();
        assert_eq!(corpus.pairs().len(), 2);
        assert_eq!(corpus.vocabulary().len(), 1);
    }

    #[test]
    fn missing_separator() {
        match "cat: caat\ncot cott\n".parse::<Corpus>() {
            Err(CorpusError::MissingSeparator { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "cot cott");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn blank_line_is_rejected() {
        assert!(matches!(
            "cat: caat\n\ncot: cott".parse::<Corpus>(),
            Err(CorpusError::MissingSeparator { line: 2, .. })
        ));
    }

    #[test]
    fn open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typos.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "receive: recieve receve").unwrap();
        writeln!(file, "separate: seperate").unwrap();
        drop(file);

        let corpus = Corpus::open(&path).unwrap();
        assert_eq!(corpus.pairs().len(), 3);
        assert_eq!(corpus.vocabulary().words(), &["receive", "separate"]);

        assert!(matches!(
            Corpus::open(&dir.path().join("missing.txt")),
            Err(CorpusError::Io(..))
        ));
    }

    #[test]
    fn vocabulary_lookup() {
        let vocabulary = Vocabulary::from_words(vec!["dog", "cat", "dog", "ant"]);
        assert_eq!(vocabulary.words(), &["ant", "cat", "dog"]);
        assert_eq!(vocabulary.position("dog"), Some(2));
        assert!(vocabulary.contains("cat"));
        assert!(!vocabulary.contains("cow"));

        let json = serde_json::to_string(&vocabulary).unwrap();
        assert_eq!(json, r#"["ant","cat","dog"]"#);
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vocabulary);
        assert_eq!(back.position("cat"), Some(1));
    }
}
