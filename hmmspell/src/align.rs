//! Minimum edit distance alignment of a correct word onto a typed word.
use itertools::Itertools;

/// Marker used for a gap when an alignment is rendered as text.
pub const GAP_MARKER: char = '-';

/// A gapped, position-by-position pairing of two strings.
///
/// Both rows have the same length. `None` is a gap: on the correct row it
/// marks a letter inserted by the typist, on the typed row a letter the
/// typist left out. A position is never a gap on both rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alignment {
    correct: Vec<Option<char>>,
    typed: Vec<Option<char>>,
}

impl Alignment {
    /// The aligned correct row.
    pub fn correct(&self) -> &[Option<char>] {
        &self.correct
    }

    /// The aligned typed row.
    pub fn typed(&self) -> &[Option<char>] {
        &self.typed
    }

    /// Number of aligned positions.
    pub fn len(&self) -> usize {
        self.correct.len()
    }

    /// Whether both aligned strings were empty.
    pub fn is_empty(&self) -> bool {
        self.correct.is_empty()
    }

    /// Iterates over `(correct, typed)` position pairs, left to right.
    pub fn pairs(&self) -> impl Iterator<Item = (Option<char>, Option<char>)> + '_ {
        self.correct
            .iter()
            .copied()
            .zip_eq(self.typed.iter().copied())
    }

    /// Number of positions that are not an exact match: substitutions,
    /// insertions and deletions.
    pub fn cost(&self) -> usize {
        self.pairs().filter(|(c, t)| c != t).count()
    }

    /// Renders both rows as strings, gaps shown as [`GAP_MARKER`].
    pub fn to_strings(&self) -> (String, String) {
        let render = |row: &[Option<char>]| -> String {
            row.iter().map(|x| x.unwrap_or(GAP_MARKER)).collect()
        };
        (render(&self.correct), render(&self.typed))
    }
}

/// Aligns `s1` onto `s2` with unit cost insertions, deletions and
/// substitutions.
///
/// When several alignments are optimal, the backtrace prefers a diagonal
/// step (match or substitution), then a deletion from `s1`, then an
/// insertion from `s2`. The emission counts learned from the alignments
/// depend on this order, so it must not change.
pub fn align(s1: &str, s2: &str) -> Alignment {
    let s1: Vec<char> = s1.chars().collect();
    let s2: Vec<char> = s2.chars().collect();
    let (n, m) = (s1.len(), s2.len());
    let width = m + 1;

    let mut dp = vec![0usize; (n + 1) * width];
    for i in 0..=n {
        dp[i * width] = i;
    }
    for j in 0..=m {
        dp[j] = j;
    }

    let cost = |i: usize, j: usize| usize::from(s1[i - 1] != s2[j - 1]);

    for i in 1..=n {
        for j in 1..=m {
            dp[i * width + j] = (dp[(i - 1) * width + j] + 1)
                .min(dp[i * width + j - 1] + 1)
                .min(dp[(i - 1) * width + j - 1] + cost(i, j));
        }
    }

    let mut correct = Vec::with_capacity(n + m);
    let mut typed = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);

    while i > 0 || j > 0 {
        let here = dp[i * width + j];

        if i > 0 && j > 0 && here == dp[(i - 1) * width + j - 1] + cost(i, j) {
            correct.push(Some(s1[i - 1]));
            typed.push(Some(s2[j - 1]));
            i -= 1;
            j -= 1;
        } else if i > 0 && here == dp[(i - 1) * width + j] + 1 {
            correct.push(Some(s1[i - 1]));
            typed.push(None);
            i -= 1;
        } else {
            correct.push(None);
            typed.push(Some(s2[j - 1]));
            j -= 1;
        }
    }

    correct.reverse();
    typed.reverse();

    Alignment { correct, typed }
}

/// Levenshtein distance between `s1` and `s2`, without the alignment.
///
/// Equal to `align(s1, s2).cost()` but keeps only one row of the table.
pub fn edit_distance(s1: &str, s2: &str) -> usize {
    let s2: Vec<char> = s2.chars().collect();
    let mut row: Vec<usize> = (0..=s2.len()).collect();

    for (i, a) in s1.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, &b) in s2.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diagonal + usize::from(a != b));
            diagonal = above;
        }
    }

    row[s2.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &[&str] = &[
        "", "a", "cat", "caat", "ct", "cot", "apple", "aapple", "aple", "receive", "recieve",
        "accommodate", "acommodate", "definitely", "definately", "xyz", "abc", "kitten",
        "sitting", "flaw", "lawn",
    ];

    fn strip(row: &[Option<char>]) -> String {
        row.iter().flatten().collect()
    }

    #[test]
    fn insertion_lands_per_backtrace_order() {
        let (a1, a2) = align("cat", "caat").to_strings();
        assert_eq!(a1, "c-at");
        assert_eq!(a2, "caat");
    }

    #[test]
    fn leading_insertion() {
        let (a1, a2) = align("apple", "aapple").to_strings();
        assert_eq!(a1, "-apple");
        assert_eq!(a2, "aapple");
    }

    #[test]
    fn deletion_is_preferred_over_insertion() {
        let (a1, a2) = align("cat", "ct").to_strings();
        assert_eq!(a1, "cat");
        assert_eq!(a2, "c-t");

        let (a1, a2) = align("ab", "ba").to_strings();
        assert_eq!(a1, "ab");
        assert_eq!(a2, "ba");
    }

    #[test]
    fn empty_sides() {
        assert!(align("", "").is_empty());

        let (a1, a2) = align("", "ab").to_strings();
        assert_eq!((a1.as_str(), a2.as_str()), ("--", "ab"));

        let (a1, a2) = align("ab", "").to_strings();
        assert_eq!((a1.as_str(), a2.as_str()), ("ab", "--"));
    }

    #[test]
    fn alignment_invariants() {
        for s1 in WORDS {
            for s2 in WORDS {
                let alignment = align(s1, s2);

                assert_eq!(alignment.correct().len(), alignment.typed().len());
                assert!(alignment.pairs().all(|(c, t)| c.is_some() || t.is_some()));
                assert_eq!(&strip(alignment.correct()), s1);
                assert_eq!(&strip(alignment.typed()), s2);
                assert_eq!(
                    alignment.cost(),
                    strsim::levenshtein(s1, s2),
                    "{:?} -> {:?}",
                    s1,
                    s2
                );
                assert_eq!(edit_distance(s1, s2), alignment.cost());
            }
        }
    }

    #[test]
    fn multibyte_letters_align_by_char() {
        let alignment = align("café", "cafe");
        assert_eq!(alignment.len(), 4);
        assert_eq!(alignment.cost(), 1);
    }
}
