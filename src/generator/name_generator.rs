//! Seed-to-username generator

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::verifier::Verifier;
use crate::error::Result;
use crate::mutate::{scramble_numbers, Transform, MAX_MUTATIONS};
use crate::seed::{resolve_seed, SeedSource};
use crate::types::{
    CheckConfig, DispatchMode, GeneratedName, GenerationMetrics, GeneratorConfig, MetricsSnapshot,
};
use crate::username::ExistenceChecker;

/// Turns seeds into registry-unique usernames.
///
/// Safe to share between tasks: the RNG sits behind a lock that is only held
/// while drawing, never across a registry lookup.
pub struct NameGenerator {
    config: GeneratorConfig,
    rng: Mutex<StdRng>,
    verifier: Verifier,
    metrics: Arc<GenerationMetrics>,
}

impl NameGenerator {
    /// Create a generator with default check settings
    pub fn new(config: GeneratorConfig, checker: Arc<dyn ExistenceChecker>) -> Result<Self> {
        Self::with_check_config(config, &CheckConfig::default(), checker)
    }

    /// Create a generator with custom check settings
    pub fn with_check_config(
        config: GeneratorConfig,
        check_config: &CheckConfig,
        checker: Arc<dyn ExistenceChecker>,
    ) -> Result<Self> {
        let metrics = Arc::new(GenerationMetrics::new());
        let verifier = Verifier::new(&config, check_config, checker, Arc::clone(&metrics))?;

        Ok(Self {
            config,
            rng: Mutex::new(StdRng::from_entropy()),
            verifier,
            metrics,
        })
    }

    /// Replace the RNG with a deterministic one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Scramble the seed's digits and run the random mutation rounds.
    ///
    /// Returns the unverified candidate and every transform applied, in order.
    pub fn mutate(&self, seed: &str) -> (String, Vec<Transform>) {
        let mut rng = self.rng.lock();
        let mut candidate = scramble_numbers(seed, &mut *rng);
        let amount = rng.gen_range(1..=MAX_MUTATIONS);
        let mut applied = Vec::new();

        for _ in 0..=amount {
            let drawn = Transform::draw(&mut *rng);
            let steps = match self.config.dispatch {
                DispatchMode::Single => std::slice::from_ref(&drawn),
                DispatchMode::Cascade => drawn.cascade(),
            };
            for transform in steps {
                candidate = transform.apply(&candidate, &mut *rng);
                applied.push(*transform);
            }
        }

        tracing::debug!(
            seed = %seed,
            candidate = %candidate,
            transforms = applied.len(),
            "Mutation rounds completed"
        );
        (candidate, applied)
    }

    /// Generate one username from `seed`
    pub async fn generate(&self, seed: &str) -> Result<GeneratedName> {
        let start_time = Instant::now();
        let (candidate, transforms) = self.mutate(seed);
        let verified = self.verifier.verify(&candidate, &self.rng).await?;

        self.metrics.increment_names_generated();
        tracing::info!(
            seed = %seed,
            username = %verified.name,
            repairs = verified.repairs,
            duration_ms = %start_time.elapsed().as_millis(),
            "Username generated"
        );

        Ok(GeneratedName {
            name: verified.name,
            seed: seed.to_string(),
            transforms,
            repairs: verified.repairs,
            generated_at: Utc::now(),
        })
    }

    /// Generate one username per seed, in seed order.
    ///
    /// A failed seed yields its own error in its slot.
    pub async fn bulk_generate(&self, seeds: &[String]) -> Vec<Result<GeneratedName>> {
        let batch_start = Instant::now();
        let results = join_all(seeds.iter().map(|seed| self.generate(seed))).await;

        let failures = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            seeds = seeds.len(),
            generated = seeds.len() - failures,
            failures,
            batch_duration_ms = %batch_start.elapsed().as_millis(),
            "Bulk generation completed"
        );

        results
    }

    /// Generate from a seed source, falling back to the fixed seed when it fails
    pub async fn generate_from_source(&self, source: &dyn SeedSource) -> Result<GeneratedName> {
        let (seed, fallback) = resolve_seed(source).await;
        if fallback {
            self.metrics.increment_seed_fallbacks();
        }
        self.generate(&seed).await
    }

    /// Get generator configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Get current metrics snapshot
    pub fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NickForgeError;
    use crate::seed::{FixedSeed, FALLBACK_SEED};
    use crate::username::{is_valid_username, OfflineChecker};
    use async_trait::async_trait;

    struct AlwaysTaken;

    #[async_trait]
    impl ExistenceChecker for AlwaysTaken {
        async fn exists(&self, _name: &str) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &'static str {
            "always-taken"
        }
    }

    struct DeadSource;

    #[async_trait]
    impl SeedSource for DeadSource {
        async fn seed(&self) -> Result<String> {
            Err(NickForgeError::seed_unavailable("dead", "offline"))
        }

        fn name(&self) -> &'static str {
            "dead"
        }
    }

    fn offline(config: GeneratorConfig, seed: u64) -> NameGenerator {
        NameGenerator::new(config, Arc::new(OfflineChecker))
            .unwrap()
            .with_seed(seed)
    }

    #[test]
    fn test_mutation_round_count() {
        let gen = offline(GeneratorConfig::default(), 40);
        for _ in 0..200 {
            let (_, applied) = gen.mutate("CreeperNoob");
            assert!((2..=MAX_MUTATIONS + 1).contains(&applied.len()));
        }
    }

    #[test]
    fn test_cascade_applies_tail_of_list() {
        let config = GeneratorConfig {
            dispatch: DispatchMode::Cascade,
            ..Default::default()
        };
        let gen = offline(config, 41);
        for _ in 0..100 {
            let (_, applied) = gen.mutate("CreeperNoob");
            // every cascade ends with the last transform
            assert_eq!(applied.last(), Some(&Transform::AddLogicalCapitalization));
            assert!(applied.len() >= 2);
        }
    }

    #[test]
    fn test_same_rng_seed_same_candidate() {
        let a = offline(GeneratorConfig::default(), 42);
        let b = offline(GeneratorConfig::default(), 42);
        assert_eq!(a.mutate("1337_HAX0R"), b.mutate("1337_HAX0R"));
    }

    #[tokio::test]
    async fn test_generate_yields_valid_names() {
        let gen = offline(GeneratorConfig::default(), 43);
        let seeds = ["", "1337_HAX0R", "xX_Dark Lörd_Xx!!", "a", "ThisIsAVeryLongSeedStringIndeed2024"];
        for seed in seeds {
            for _ in 0..50 {
                let name = gen.generate(seed).await.unwrap();
                let len = name.as_str().chars().count();
                assert!((4..=15).contains(&len), "{}", name);
                assert!(is_valid_username(name.as_str()), "{}", name);
            }
        }
        assert_eq!(gen.get_metrics_snapshot().names_generated, 250);
    }

    #[tokio::test]
    async fn test_bulk_keeps_order_and_failures() {
        let gen = offline(GeneratorConfig::default(), 44);
        let seeds: Vec<String> = vec!["Alpha".into(), "Bravo".into(), "Charlie".into()];
        let results = gen.bulk_generate(&seeds).await;
        assert_eq!(results.len(), 3);
        for (seed, result) in seeds.iter().zip(&results) {
            assert_eq!(&result.as_ref().unwrap().seed, seed);
        }

        let stuck = NameGenerator::new(GeneratorConfig::default(), Arc::new(AlwaysTaken)).unwrap();
        let results = stuck.bulk_generate(&seeds).await;
        assert!(results.iter().all(|r| matches!(r, Err(NickForgeError::NoConvergence { .. }))));
    }

    #[tokio::test]
    async fn test_source_fallback() {
        let gen = offline(GeneratorConfig::default(), 45);
        let name = gen.generate_from_source(&DeadSource).await.unwrap();
        assert_eq!(name.seed, FALLBACK_SEED);
        assert_eq!(gen.get_metrics_snapshot().seed_fallbacks, 1);

        let name = gen.generate_from_source(&FixedSeed::new("Herobrine")).await.unwrap();
        assert_eq!(name.seed, "Herobrine");
    }
}
