//! Repair loop that turns a mutated candidate into a usable username

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::Rng;
use tokio::time::timeout;

use crate::error::{NickForgeError, Result};
use crate::types::{CheckConfig, FailurePolicy, GenerationMetrics, GeneratorConfig};
use crate::username::{ExistenceChecker, UsernameValidator, Violation};

/// Outcome of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    pub name: String,
    pub repairs: u32,
}

/// Applies one repair per pass until a candidate is well-formed and unregistered.
///
/// Each pass checks, in order: too long, too short, invalid characters,
/// already registered.
pub struct Verifier {
    validator: UsernameValidator,
    checker: Arc<dyn ExistenceChecker>,
    check_timeout: Duration,
    on_failure: FailurePolicy,
    max_passes: u32,
    metrics: Arc<GenerationMetrics>,
}

impl Verifier {
    pub fn new(
        config: &GeneratorConfig,
        check_config: &CheckConfig,
        checker: Arc<dyn ExistenceChecker>,
        metrics: Arc<GenerationMetrics>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            validator: UsernameValidator::new(config.min_length)?,
            checker,
            check_timeout: check_config.timeout,
            on_failure: check_config.on_failure,
            max_passes: config.max_repair_passes,
            metrics,
        })
    }

    /// Repair `candidate` until it is a valid, unregistered username.
    ///
    /// Fails with `NoConvergence` once the pass budget is spent.
    pub async fn verify(&self, candidate: &str, rng: &Mutex<StdRng>) -> Result<Verified> {
        let mut current = candidate.to_string();

        for pass in 0..self.max_passes {
            match self.validator.check(&current) {
                Some(Violation::TooLong { length }) => {
                    let keep = length * 2 / 3;
                    current = current.chars().take(keep).collect();
                    tracing::debug!(pass, candidate = %current, repair = "truncate", "Repaired candidate");
                }
                Some(Violation::TooShort { .. }) => {
                    let letter = random_letter(&mut *rng.lock());
                    current.insert(0, letter);
                    tracing::debug!(pass, candidate = %current, repair = "prepend", "Repaired candidate");
                }
                Some(Violation::InvalidCharacters) => {
                    current = self.validator.strip_invalid(&current);
                    tracing::debug!(pass, candidate = %current, repair = "strip", "Repaired candidate");
                }
                None => {
                    if !self.is_taken(&current).await {
                        return Ok(Verified {
                            name: current,
                            repairs: pass,
                        });
                    }
                    let letter = random_letter(&mut *rng.lock());
                    current = std::iter::once(letter).chain(current.chars().skip(1)).collect();
                    tracing::debug!(pass, candidate = %current, repair = "replace_first", "Repaired candidate");
                }
            }
            self.metrics.increment_repairs();
        }

        self.metrics.increment_convergence_failures();
        tracing::warn!(
            candidate = %current,
            passes = self.max_passes,
            checker = self.checker.name(),
            "Repair loop did not converge"
        );
        Err(NickForgeError::no_convergence(current, self.max_passes))
    }

    async fn is_taken(&self, name: &str) -> bool {
        self.metrics.increment_existence_checks();

        match timeout(self.check_timeout, self.checker.exists(name)).await {
            Ok(Ok(exists)) => exists,
            Ok(Err(e)) => {
                self.metrics.increment_check_failures();
                let err = NickForgeError::existence_check(name, e.to_string());
                tracing::warn!(
                    checker = self.checker.name(),
                    error = %err,
                    assumed = %self.on_failure,
                    "Existence check failed"
                );
                self.on_failure.assumed_exists()
            }
            Err(_) => {
                self.metrics.increment_check_failures();
                let err = NickForgeError::timeout(
                    format!("Existence check for '{}'", name),
                    self.check_timeout.as_secs(),
                );
                tracing::warn!(
                    checker = self.checker.name(),
                    error = %err,
                    assumed = %self.on_failure,
                    "Existence check timed out"
                );
                self.on_failure.assumed_exists()
            }
        }
    }
}

fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'a' + rng.gen_range(0..26u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Registry {
        taken: HashSet<String>,
        calls: AtomicUsize,
    }

    impl Registry {
        fn with(names: &[&str]) -> Self {
            Self {
                taken: names.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ExistenceChecker for Registry {
        async fn exists(&self, name: &str) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.taken.contains(name))
        }

        fn name(&self) -> &'static str {
            "registry"
        }
    }

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

    struct Failing;

    #[async_trait]
    impl ExistenceChecker for Failing {
        async fn exists(&self, _name: &str) -> Result<bool> {
            Err(NickForgeError::network("connection reset", None, None))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct Hanging;

    #[async_trait]
    impl ExistenceChecker for Hanging {
        async fn exists(&self, _name: &str) -> Result<bool> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(false)
        }

        fn name(&self) -> &'static str {
            "hanging"
        }
    }

    fn verifier(min_length: usize, checker: Arc<dyn ExistenceChecker>, check: CheckConfig) -> Verifier {
        let config = GeneratorConfig {
            min_length,
            ..Default::default()
        };
        Verifier::new(&config, &check, checker, Arc::new(GenerationMetrics::new())).unwrap()
    }

    fn rng(seed: u64) -> Mutex<StdRng> {
        Mutex::new(StdRng::seed_from_u64(seed))
    }

    #[tokio::test]
    async fn test_valid_name_is_unchanged() {
        let registry = Arc::new(Registry::with(&[]));
        let v = verifier(4, registry.clone(), CheckConfig::default());
        let out = v.verify("Dark_Lord42", &rng(1)).await.unwrap();
        assert_eq!(out, Verified { name: "Dark_Lord42".to_string(), repairs: 0 });
        assert_eq!(registry.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_candidate_grows_to_min_length() {
        let v = verifier(4, Arc::new(Registry::with(&[])), CheckConfig::default());
        let out = v.verify("", &rng(2)).await.unwrap();
        assert_eq!(out.name.chars().count(), 4);
        assert!(out.name.chars().all(|c| c.is_ascii_lowercase()));
        assert_eq!(out.repairs, 4);
    }

    #[tokio::test]
    async fn test_long_candidate_truncates_by_thirds() {
        let v = verifier(4, Arc::new(Registry::with(&[])), CheckConfig::default());
        let candidate = "abcdefghijklmnopqrst";
        let out = v.verify(candidate, &rng(3)).await.unwrap();
        assert_eq!(out.name, "abcdefghijklm");
        assert_eq!(out.repairs, 1);
    }

    #[tokio::test]
    async fn test_invalid_characters_are_stripped() {
        let v = verifier(4, Arc::new(Registry::with(&[])), CheckConfig::default());
        let out = v.verify("x-D@rk L0rd-x", &rng(4)).await.unwrap();
        assert_eq!(out.name, "xDrkL0rdx");
    }

    #[tokio::test]
    async fn test_taken_name_replaces_first_char() {
        let v = verifier(4, Arc::new(Registry::with(&["Notch"])), CheckConfig::default());
        let out = v.verify("Notch", &rng(5)).await.unwrap();
        assert_ne!(out.name, "Notch");
        assert_eq!(&out.name[1..], "otch");
        assert!(out.name.starts_with(|c: char| c.is_ascii_lowercase()));
    }

    #[tokio::test]
    async fn test_always_taken_hits_pass_limit() {
        let v = verifier(4, Arc::new(AlwaysTaken), CheckConfig::default());
        let err = v.verify("Notch", &rng(6)).await.unwrap_err();
        assert!(matches!(err, NickForgeError::NoConvergence { passes: 64, .. }));
    }

    #[tokio::test]
    async fn test_check_failure_follows_policy() {
        let taken = verifier(4, Arc::new(Failing), CheckConfig::default());
        assert!(matches!(
            taken.verify("Notch", &rng(7)).await,
            Err(NickForgeError::NoConvergence { .. })
        ));

        let lenient = CheckConfig {
            on_failure: FailurePolicy::AssumeAvailable,
            ..Default::default()
        };
        let available = verifier(4, Arc::new(Failing), lenient);
        assert_eq!(available.verify("Notch", &rng(8)).await.unwrap().name, "Notch");
    }

    #[tokio::test]
    async fn test_hung_check_times_out() {
        let check = CheckConfig {
            timeout: Duration::from_millis(50),
            on_failure: FailurePolicy::AssumeAvailable,
            ..Default::default()
        };
        let metrics = Arc::new(GenerationMetrics::new());
        let config = GeneratorConfig::default();
        let v = Verifier::new(&config, &check, Arc::new(Hanging), Arc::clone(&metrics)).unwrap();
        assert_eq!(v.verify("Notch", &rng(9)).await.unwrap().name, "Notch");
        assert_eq!(metrics.snapshot().check_failures, 1);
    }

    #[test]
    fn test_rejects_unreachable_min_length() {
        let config = GeneratorConfig {
            min_length: 16,
            ..Default::default()
        };
        let result = Verifier::new(
            &config,
            &CheckConfig::default(),
            Arc::new(AlwaysTaken),
            Arc::new(GenerationMetrics::new()),
        );
        assert!(matches!(result, Err(NickForgeError::Config { .. })));
    }
}
