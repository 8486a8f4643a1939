//! Username validation utilities

use crate::error::{NickForgeError, Result};
use crate::username::MAX_USERNAME_LENGTH;
use regex::Regex;

/// A rule a candidate breaks, in the order the repair loop checks them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    TooLong { length: usize },
    TooShort { length: usize, min_length: usize },
    InvalidCharacters,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::TooLong { length } => write!(f, "too long ({} chars)", length),
            Violation::TooShort { length, min_length } => {
                write!(f, "too short ({} < {} chars)", length, min_length)
            }
            Violation::InvalidCharacters => write!(f, "invalid characters"),
        }
    }
}

/// Username validator
pub struct UsernameValidator {
    min_length: usize,
    allowed: Regex,
}

impl UsernameValidator {
    /// Create a new username validator
    pub fn new(min_length: usize) -> Result<Self> {
        let allowed = Regex::new(r"^[a-zA-Z0-9_]+$")
            .map_err(|e| NickForgeError::internal(e.to_string()))?;

        Ok(Self {
            min_length,
            allowed,
        })
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// First rule `candidate` breaks, or `None` when its shape is acceptable.
    ///
    /// Candidates longer than `MAX_USERNAME_LENGTH - 1` count as too long.
    pub fn check(&self, candidate: &str) -> Option<Violation> {
        let length = candidate.chars().count();

        if length > MAX_USERNAME_LENGTH - 1 {
            return Some(Violation::TooLong { length });
        }

        if length < self.min_length {
            return Some(Violation::TooShort {
                length,
                min_length: self.min_length,
            });
        }

        if !self.allowed.is_match(candidate) {
            return Some(Violation::InvalidCharacters);
        }

        None
    }

    /// Drop every character outside `[a-zA-Z0-9_]`
    pub fn strip_invalid(&self, candidate: &str) -> String {
        candidate.chars().filter(|&c| is_allowed_char(c)).collect()
    }
}

/// Whether `name` satisfies the namespace rule `[a-zA-Z0-9_]{1,16}`
pub fn is_valid_username(name: &str) -> bool {
    let length = name.chars().count();
    (1..=MAX_USERNAME_LENGTH).contains(&length) && name.chars().all(is_allowed_char)
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
