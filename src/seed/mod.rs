//! Seed sources: where the raw text for a username comes from

pub mod punishments;

pub use punishments::PunishmentPageSource;

use crate::error::Result;
use async_trait::async_trait;

/// Seed used whenever a source fails
pub const FALLBACK_SEED: &str = "creeperNoob";

/// Trait for seed providers
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Produce one seed string
    async fn seed(&self) -> Result<String>;

    /// Get the source name
    fn name(&self) -> &'static str;
}

/// Source that always yields the same seed
#[derive(Debug, Clone)]
pub struct FixedSeed(pub String);

impl FixedSeed {
    pub fn new(seed: impl Into<String>) -> Self {
        Self(seed.into())
    }
}

#[async_trait]
impl SeedSource for FixedSeed {
    async fn seed(&self) -> Result<String> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Fetch a seed, substituting `FALLBACK_SEED` on failure.
///
/// Returns the seed and whether the fallback was used.
pub async fn resolve_seed(source: &dyn SeedSource) -> (String, bool) {
    match source.seed().await {
        Ok(seed) => (seed, false),
        Err(e) => {
            tracing::warn!(source = source.name(), error = %e, "Seed source failed, using fallback seed");
            (FALLBACK_SEED.to_string(), true)
        }
    }
}
