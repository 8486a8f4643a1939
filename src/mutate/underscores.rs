//! Underscore transforms and the underscore reducer

use rand::Rng;

use super::{clear_underscores, count_underscores, count_uppercase, MAX_UNDERSCORES};

/// Re-derivations the reducer attempts before it trims outright
const MAX_REDUCER_PASSES: usize = 8;

/// Insert 1..=MAX_UNDERSCORES underscores next to random characters
pub fn add_random_underscores<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let placed = insert_random_underscores(&clear_underscores(input), rng);
    reduce_underscores(&placed, rng)
}

/// Put underscores after whole words, treating each uppercase letter as a word start.
///
/// Falls back to random placement when there are fewer than two uppercase letters.
pub fn add_strategical_underscores<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let placed = place_strategical_underscores(&clear_underscores(input), rng);
    reduce_underscores(&placed, rng)
}

/// A single underscore at the front or back
pub fn add_lazy_underscore<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let base = clear_underscores(input);
    let placed = if rng.gen_bool(0.5) {
        format!("{}_", base)
    } else {
        format!("_{}", base)
    };
    reduce_underscores(&placed, rng)
}

/// Re-derive the underscores of a name carrying more than MAX_UNDERSCORES.
///
/// Names within the bound are returned untouched.
pub fn reduce_underscores<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut current = input.to_string();
    for _ in 0..MAX_REDUCER_PASSES {
        if count_underscores(&current) <= MAX_UNDERSCORES {
            return current;
        }
        current = place_strategical_underscores(&clear_underscores(&current), rng);
    }

    if count_underscores(&current) <= MAX_UNDERSCORES {
        return current;
    }

    tracing::debug!(candidate = %current, "Underscore reducer trimming surplus underscores");
    let mut kept = 0;
    current
        .chars()
        .filter(|&c| {
            if c != '_' {
                return true;
            }
            kept += 1;
            kept <= MAX_UNDERSCORES
        })
        .collect()
}

fn place_strategical_underscores<R: Rng + ?Sized>(base: &str, rng: &mut R) -> String {
    if count_uppercase(base) < 2 {
        return insert_random_underscores(base, rng);
    }

    let mut out = String::with_capacity(base.len() * 2);
    for word in split_words(base) {
        out.push_str(word);
        if rng.gen_bool(0.5) {
            out.push('_');
        }
    }
    out
}

fn insert_random_underscores<R: Rng + ?Sized>(base: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = base.chars().collect();
    let rounds = rng.gen_range(1..=MAX_UNDERSCORES);

    for _ in 0..rounds {
        if chars.is_empty() {
            break;
        }
        let index = rng.gen_range(0..chars.len());
        if rng.gen_bool(0.5) {
            chars.insert(index + 1, '_');
        } else {
            chars.insert(index, '_');
        }
    }

    chars.into_iter().collect()
}

/// Split before every uppercase letter; a lowercase prefix forms its own word
fn split_words(input: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if c.is_ascii_uppercase() && i > start {
            words.push(&input[start..i]);
            start = i;
        }
    }
    if start < input.len() {
        words.push(&input[start..]);
    }
    words
}
