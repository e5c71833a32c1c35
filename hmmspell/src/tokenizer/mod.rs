//! Splitting a line of input into the tokens that get corrected.
use std::str::SplitWhitespace;

use unic_ucd_category::GeneralCategory;

/// Splits text into tokens.
pub trait Tokenize {
    /// Whitespace separated tokens, in input order.
    fn tokens(&self) -> SplitWhitespace<'_>;
}

impl Tokenize for str {
    fn tokens(&self) -> SplitWhitespace<'_> {
        self.split_whitespace()
    }
}

/// Whether `token` has at least one letter according to the Unicode
/// general category. Tokens without letters are left as they are.
pub fn is_word(token: &str) -> bool {
    token.chars().any(|c| GeneralCategory::of(c).is_letter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens() {
        let line = "  teh  quick\tbrwn fox \n";
        assert_eq!(
            line.tokens().collect::<Vec<_>>(),
            vec!["teh", "quick", "brwn", "fox"]
        );
        assert_eq!("".tokens().count(), 0);
    }

    #[test]
    fn words() {
        assert!(is_word("cat"));
        assert!(is_word("r2d2"));
        assert!(is_word("sámi"));
        assert!(!is_word("1984"));
        assert!(!is_word("--"));
    }
}
