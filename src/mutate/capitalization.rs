//! Capitalization transforms and the capitalization reducer

use rand::Rng;

use super::{count_uppercase, MAX_CAPITALIZED};

/// Uppercase 1..=MAX_CAPITALIZED random positions (repeats allowed)
pub fn add_random_capitalization<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    if !chars.is_empty() {
        let amount = rng.gen_range(1..=MAX_CAPITALIZED);
        for _ in 0..amount {
            let index = rng.gen_range(0..chars.len());
            chars[index] = chars[index].to_ascii_uppercase();
        }
    }
    let capitalized: String = chars.into_iter().collect();
    reduce_capitalization(&capitalized, rng)
}

/// Uppercase the first letter, one random position `j`, and half the time a
/// third position at or after `j`
pub fn add_logical_capitalization<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let capitalized = capitalize_logically(input, rng);
    reduce_capitalization(&capitalized, rng)
}

/// Lowercase and re-capitalize a name carrying more than MAX_CAPITALIZED capitals
pub fn reduce_capitalization<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    if count_uppercase(input) > MAX_CAPITALIZED {
        capitalize_logically(&input.to_ascii_lowercase(), rng)
    } else {
        input.to_string()
    }
}

fn capitalize_logically<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    let len = chars.len();
    let second = rng.gen_range(0..len);
    let mut targets = vec![0, second];
    if rng.gen_bool(0.5) {
        targets.push(rng.gen_range(second..len));
    }
    for index in targets {
        chars[index] = chars[index].to_ascii_uppercase();
    }

    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_capitalization_bounded() {
        let mut rng = StdRng::seed_from_u64(30);
        for _ in 0..200 {
            let out = add_random_capitalization("creepernoob", &mut rng);
            let n = count_uppercase(&out);
            assert!((1..=MAX_CAPITALIZED).contains(&n), "{}", out);
            assert_eq!(out.to_ascii_lowercase(), "creepernoob");
        }
    }

    #[test]
    fn test_logical_capitalizes_first() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..200 {
            let out = add_logical_capitalization("creepernoob", &mut rng);
            assert!(out.starts_with('C'));
            assert!(count_uppercase(&out) <= MAX_CAPITALIZED);
        }
    }

    #[test]
    fn test_single_char_and_empty() {
        let mut rng = StdRng::seed_from_u64(32);
        assert_eq!(add_logical_capitalization("x", &mut rng), "X");
        assert_eq!(add_logical_capitalization("", &mut rng), "");
        assert_eq!(add_random_capitalization("", &mut rng), "");
    }

    #[test]
    fn test_reducer_recapitalizes_shouting() {
        let mut rng = StdRng::seed_from_u64(33);
        for _ in 0..100 {
            let out = reduce_capitalization("IAMSHOUTING", &mut rng);
            assert!(count_uppercase(&out) <= MAX_CAPITALIZED);
            assert!(out.starts_with('I'));
            assert_eq!(out.to_ascii_lowercase(), "iamshouting");
        }
    }

    #[test]
    fn test_reducer_leaves_small_counts_alone() {
        let mut rng = StdRng::seed_from_u64(34);
        assert_eq!(reduce_capitalization("DarkLord", &mut rng), "DarkLord");
    }
}
