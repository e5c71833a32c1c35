//! Candidate generation: which vocabulary words are worth scoring.
use smol_str::SmolStr;

use crate::align::edit_distance;
use crate::corpus::Vocabulary;

/// Default bound on the edit distance between a typed word and a candidate.
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// Returns the vocabulary words within `max_distance` edits of `typed`, in
/// vocabulary order.
///
/// When no word is close enough the whole vocabulary is returned, so a
/// correction always exists.
pub fn generate_candidates<'a>(
    typed: &str,
    vocabulary: &'a Vocabulary,
    max_distance: usize,
) -> Vec<&'a SmolStr> {
    let typed_len = typed.chars().count();

    let candidates: Vec<&SmolStr> = vocabulary
        .iter()
        // the length difference is a lower bound of the edit distance
        .filter(|word| word.chars().count().abs_diff(typed_len) <= max_distance)
        .filter(|word| edit_distance(word, typed) <= max_distance)
        .collect();

    if candidates.is_empty() {
        log::trace!(
            "No candidate within {} edits of {:?}, scoring the whole vocabulary",
            max_distance,
            typed
        );
        return vocabulary.iter().collect();
    }

    log::trace!("{} candidates for {:?}", candidates.len(), typed);
    candidates
}
