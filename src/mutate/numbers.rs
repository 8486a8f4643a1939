//! Digit transforms

use chrono::{Datelike, Utc};
use rand::Rng;

use super::{clear_numbers, random_digit, MAX_NUMBERS, MAX_YEAR_RANGE};

/// Replace every digit with a freshly drawn one, leaving everything else in place
pub fn scramble_numbers<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_digit() { random_digit(rng) } else { c })
        .collect()
}

/// Drop existing digits, then put 1..=MAX_NUMBERS new ones at the front or back
pub fn add_numbers<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let base = clear_numbers(input);
    let front = rng.gen_bool(0.5);
    let count = rng.gen_range(1..=MAX_NUMBERS);
    let digits: String = (0..count).map(|_| random_digit(rng)).collect();

    if front {
        digits + &base
    } else {
        base + &digits
    }
}

/// Drop existing digits and append a recent year
pub fn add_year<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    add_year_at(input, Utc::now().year(), rng)
}

/// `add_year` against a fixed current year.
///
/// The year is drawn from `[current_year - MAX_YEAR_RANGE, current_year)`.
pub fn add_year_at<R: Rng + ?Sized>(input: &str, current_year: i32, rng: &mut R) -> String {
    let year = rng.gen_range(current_year - MAX_YEAR_RANGE..current_year);
    format!("{}{}", clear_numbers(input), year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scramble_keeps_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let seed = "1337_HAX0R";
        for _ in 0..100 {
            let out = scramble_numbers(seed, &mut rng);
            assert_eq!(out.chars().count(), seed.chars().count());
            for (a, b) in seed.chars().zip(out.chars()) {
                if a.is_ascii_digit() {
                    assert!(b.is_ascii_digit());
                } else {
                    assert_eq!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_scramble_passes_unicode_through() {
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(scramble_numbers("héllo wörld", &mut rng), "héllo wörld");
    }

    #[test]
    fn test_add_numbers_run_length() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut fronts = 0;
        for _ in 0..200 {
            let out = add_numbers("ab12cd", &mut rng);
            let digits = out.chars().filter(|c| c.is_ascii_digit()).count();
            assert!((1..=MAX_NUMBERS).contains(&digits));
            assert_eq!(clear_numbers(&out), "abcd");
            if out.starts_with(|c: char| c.is_ascii_digit()) {
                fronts += 1;
            } else {
                assert!(out.ends_with(|c: char| c.is_ascii_digit()));
            }
        }
        assert!(fronts > 0 && fronts < 200);
    }

    #[test]
    fn test_add_year_range() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let out = add_year_at("Notch99", 2026, &mut rng);
            assert!(out.starts_with("Notch"));
            let year: i32 = out["Notch".len()..].parse().unwrap();
            assert!((2011..2026).contains(&year));
        }
    }

    #[test]
    fn test_add_year_uses_current_year() {
        let mut rng = StdRng::seed_from_u64(5);
        let now = Utc::now().year();
        let out = add_year("", &mut rng);
        let year: i32 = out.parse().unwrap();
        assert!(year >= now - MAX_YEAR_RANGE && year < now);
    }
}
