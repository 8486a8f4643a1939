//! Nick Forge - randomized Minecraft username generation
//!
//! Mutates a seed string through digit, underscore, look-alike and
//! capitalization transforms, then repairs the result until it is a valid,
//! unregistered Minecraft username.

pub mod error;
pub mod generator;
pub mod mutate;
pub mod seed;
pub mod types;
pub mod username;

// Re-export commonly used types
pub use error::{NickForgeError, Result};
pub use types::{
    CheckConfig, DispatchMode, FailurePolicy, GeneratedName, GenerationMetrics, GeneratorConfig,
    MetricsSnapshot, SeedConfig,
};

// Re-export main functionality
pub use generator::NameGenerator;
pub use mutate::Transform;
pub use seed::{FixedSeed, PunishmentPageSource, SeedSource, FALLBACK_SEED};
pub use username::{ExistenceChecker, MojangChecker, OfflineChecker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
