//! Randomized string transforms used to disguise a seed
//!
//! Every transform is a function of its input plus an injected RNG. None of
//! them look at what ran before, so any order of application is valid.

mod capitalization;
mod numbers;
mod phonetic;
mod underscores;

pub use capitalization::{add_logical_capitalization, add_random_capitalization, reduce_capitalization};
pub use numbers::{add_numbers, add_year, add_year_at, scramble_numbers};
pub use phonetic::{add_phonetic_replacements, PHONETIC_TABLE};
pub use underscores::{
    add_lazy_underscore, add_random_underscores, add_strategical_underscores, reduce_underscores,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of drawn mutations per generation
pub const MAX_MUTATIONS: usize = 3;
/// Longest run of digits `add_numbers` appends
pub const MAX_NUMBERS: usize = 4;
/// How many years back `add_year` may reach
pub const MAX_YEAR_RANGE: i32 = 15;
/// Most underscores a reduced name may carry
pub const MAX_UNDERSCORES: usize = 2;
/// Most uppercase letters a reduced name may carry
pub const MAX_CAPITALIZED: usize = 3;
/// Most phonetic substitutions per pass
pub const MAX_PHONETIC_REPLACEMENTS: usize = 1;

/// One mutation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    AddNumbers,
    AddYear,
    AddRandomUnderscores,
    AddStrategicalUnderscores,
    AddLazyUnderscore,
    AddPhoneticReplacements,
    AddRandomCapitalization,
    AddLogicalCapitalization,
}

impl Transform {
    /// All transforms in dispatch order
    pub const ALL: [Transform; 8] = [
        Transform::AddNumbers,
        Transform::AddYear,
        Transform::AddRandomUnderscores,
        Transform::AddStrategicalUnderscores,
        Transform::AddLazyUnderscore,
        Transform::AddPhoneticReplacements,
        Transform::AddRandomCapitalization,
        Transform::AddLogicalCapitalization,
    ];

    /// Pick a transform uniformly at random
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Position in `Transform::ALL`
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|t| t == self)
            .unwrap_or_default()
    }

    /// This transform followed by every later one in dispatch order
    pub fn cascade(&self) -> &'static [Transform] {
        &Self::ALL[self.index()..]
    }

    /// Run this transform over `input`
    pub fn apply<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> String {
        match self {
            Transform::AddNumbers => add_numbers(input, rng),
            Transform::AddYear => add_year(input, rng),
            Transform::AddRandomUnderscores => add_random_underscores(input, rng),
            Transform::AddStrategicalUnderscores => add_strategical_underscores(input, rng),
            Transform::AddLazyUnderscore => add_lazy_underscore(input, rng),
            Transform::AddPhoneticReplacements => add_phonetic_replacements(input, rng),
            Transform::AddRandomCapitalization => add_random_capitalization(input, rng),
            Transform::AddLogicalCapitalization => add_logical_capitalization(input, rng),
        }
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Transform::AddNumbers => "add_numbers",
            Transform::AddYear => "add_year",
            Transform::AddRandomUnderscores => "add_random_underscores",
            Transform::AddStrategicalUnderscores => "add_strategical_underscores",
            Transform::AddLazyUnderscore => "add_lazy_underscore",
            Transform::AddPhoneticReplacements => "add_phonetic_replacements",
            Transform::AddRandomCapitalization => "add_random_capitalization",
            Transform::AddLogicalCapitalization => "add_logical_capitalization",
        };
        f.write_str(name)
    }
}

/// Remove every ASCII digit
pub fn clear_numbers(input: &str) -> String {
    input.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Remove every underscore
pub fn clear_underscores(input: &str) -> String {
    input.chars().filter(|&c| c != '_').collect()
}

pub(crate) fn count_underscores(input: &str) -> usize {
    input.chars().filter(|&c| c == '_').count()
}

pub(crate) fn count_uppercase(input: &str) -> usize {
    input.chars().filter(|c| c.is_ascii_uppercase()).count()
}

pub(crate) fn random_digit<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'0' + rng.gen_range(0..10u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_clear_filters() {
        assert_eq!(clear_numbers("a1b22_c3"), "ab_c");
        assert_eq!(clear_underscores("_a_b__c_"), "abc");
        assert_eq!(clear_numbers(""), "");
    }

    #[test]
    fn test_cascade_slices() {
        assert_eq!(Transform::AddNumbers.cascade().len(), 8);
        assert_eq!(
            Transform::AddLogicalCapitalization.cascade(),
            &[Transform::AddLogicalCapitalization]
        );
        assert_eq!(Transform::AddLazyUnderscore.cascade()[0], Transform::AddLazyUnderscore);
    }

    #[test]
    fn test_draw_covers_every_transform() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(Transform::draw(&mut rng));
        }
        assert_eq!(seen.len(), Transform::ALL.len());
    }

    #[test]
    fn test_every_transform_tolerates_empty_input() {
        let mut rng = StdRng::seed_from_u64(11);
        for transform in Transform::ALL {
            for _ in 0..20 {
                // must not panic on empty input
                let _ = transform.apply("", &mut rng);
            }
        }
    }

    #[test]
    fn test_serialized_name_matches_display() {
        let json = serde_json::to_string(&Transform::AddYear).unwrap();
        assert_eq!(json, format!("\"{}\"", Transform::AddYear));
    }
}
