//! Username generation: random mutation rounds followed by the repair loop

pub mod name_generator;
pub mod verifier;

// Re-export main functionality
pub use name_generator::NameGenerator;
pub use verifier::{Verified, Verifier};
