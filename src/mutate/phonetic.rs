//! Look-alike character substitution

use rand::Rng;

use super::MAX_PHONETIC_REPLACEMENTS;

/// Bidirectional look-alike pairs, searched in order
pub const PHONETIC_TABLE: [(char, char); 4] = [('0', 'O'), ('1', 'I'), ('3', 'E'), ('S', 'Z')];

/// Swap up to MAX_PHONETIC_REPLACEMENTS characters for their look-alike.
///
/// Each substitute's case is drawn at random. Matching is exact, so `s` and
/// `o` are left alone while `S` and `O` are candidates.
pub fn add_phonetic_replacements<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut replaced = 0;
    input
        .chars()
        .map(|c| {
            if replaced >= MAX_PHONETIC_REPLACEMENTS {
                return c;
            }
            match counterpart(c) {
                Some(substitute) => {
                    replaced += 1;
                    if rng.gen_bool(0.5) {
                        substitute.to_ascii_uppercase()
                    } else {
                        substitute.to_ascii_lowercase()
                    }
                }
                None => c,
            }
        })
        .collect()
}

/// Forward entries win over reverse ones; within each direction the first entry wins
fn counterpart(c: char) -> Option<char> {
    PHONETIC_TABLE
        .iter()
        .find(|(key, _)| *key == c)
        .map(|(_, value)| *value)
        .or_else(|| {
            PHONETIC_TABLE
                .iter()
                .find(|(_, value)| *value == c)
                .map(|(key, _)| *key)
        })
}
