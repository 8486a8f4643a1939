//! Core types and structures for nick-forge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{NickForgeError, Result};
use crate::mutate::Transform;
use crate::seed::punishments::{PUNISHMENT_PAGE_RANGE, PUNISHMENT_PAGE_URL};
use crate::username::mojang::PROFILE_URL;
use crate::username::MAX_USERNAME_LENGTH;

/// How a drawn transform index is turned into transform applications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Apply only the drawn transform
    #[default]
    Single,
    /// Apply the drawn transform and every later one in `Transform::ALL`
    Cascade,
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchMode::Single => write!(f, "single"),
            DispatchMode::Cascade => write!(f, "cascade"),
        }
    }
}

impl FromStr for DispatchMode {
    type Err = NickForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "cascade" => Ok(Self::Cascade),
            other => Err(NickForgeError::config(format!(
                "Unknown dispatch mode '{}'. Expected 'single' or 'cascade'",
                other
            ))),
        }
    }
}

/// What the repair loop assumes when an existence check errors or times out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Treat the name as registered and keep mutating
    #[default]
    AssumeTaken,
    /// Treat the name as free and accept it
    AssumeAvailable,
}

impl FailurePolicy {
    /// The existence answer this policy substitutes for a failed check
    pub fn assumed_exists(&self) -> bool {
        matches!(self, FailurePolicy::AssumeTaken)
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::AssumeTaken => write!(f, "taken"),
            FailurePolicy::AssumeAvailable => write!(f, "available"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = NickForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "taken" => Ok(Self::AssumeTaken),
            "available" => Ok(Self::AssumeAvailable),
            other => Err(NickForgeError::config(format!(
                "Unknown check failure policy '{}'. Expected 'taken' or 'available'",
                other
            ))),
        }
    }
}

/// Configuration for username generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub min_length: usize,
    pub dispatch: DispatchMode,
    pub max_repair_passes: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_length: 4,
            dispatch: DispatchMode::Single,
            max_repair_passes: 64,
        }
    }
}

impl GeneratorConfig {
    /// Load from `NICK_FORGE_*` variables, defaulting anything unset
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(min_length) = env_parse("NICK_FORGE_MIN_LENGTH")? {
            config.min_length = min_length;
        }
        if let Some(dispatch) = env_parse("NICK_FORGE_DISPATCH")? {
            config.dispatch = dispatch;
        }
        if let Some(passes) = env_parse("NICK_FORGE_MAX_REPAIRS")? {
            config.max_repair_passes = passes;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the repair loop can never satisfy
    pub fn validate(&self) -> Result<()> {
        // Anything longer than this is truncated, so a higher minimum can't be met.
        let longest = MAX_USERNAME_LENGTH - 1;
        if self.min_length == 0 || self.min_length > longest {
            return Err(NickForgeError::config(format!(
                "Minimum username length must be between 1 and {}, got {}",
                longest, self.min_length
            )));
        }
        if self.max_repair_passes == 0 {
            return Err(NickForgeError::config(
                "Maximum repair passes must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Configuration for existence checking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub timeout: Duration,
    pub on_failure: FailurePolicy,
    pub concurrent_checks: usize,
    pub api_url: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            on_failure: FailurePolicy::AssumeTaken,
            concurrent_checks: 4,
            api_url: PROFILE_URL.to_string(),
        }
    }
}

impl CheckConfig {
    /// Load from `NICK_FORGE_*` variables, defaulting anything unset
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(secs) = env_parse::<u64>("NICK_FORGE_CHECK_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(policy) = env_parse("NICK_FORGE_ON_CHECK_FAILURE")? {
            config.on_failure = policy;
        }
        if let Ok(url) = std::env::var("NICK_FORGE_PROFILE_URL") {
            config.api_url = url;
        }
        Ok(config)
    }
}

/// Configuration for the punishment page seed source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub page_url: String,
    pub page_range: (u32, u32),
    pub timeout: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            page_url: PUNISHMENT_PAGE_URL.to_string(),
            page_range: PUNISHMENT_PAGE_RANGE,
            timeout: Duration::from_secs(10),
        }
    }
}

impl SeedConfig {
    /// Load from `NICK_FORGE_SEED_URL`, defaulting when unset
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("NICK_FORGE_SEED_URL") {
            config.page_url = url;
        }
        Ok(config)
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| NickForgeError::config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// A finished username plus how it was derived
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedName {
    pub name: String,
    pub seed: String,
    pub transforms: Vec<Transform>,
    pub repairs: u32,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedName {
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for GeneratedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Lock-free counters shared by a generator and its repair loop
#[derive(Debug, Default)]
pub struct GenerationMetrics {
    names_generated: AtomicU64,
    existence_checks: AtomicU64,
    check_failures: AtomicU64,
    repairs: AtomicU64,
    convergence_failures: AtomicU64,
    seed_fallbacks: AtomicU64,
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_names_generated(&self) {
        self.names_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_existence_checks(&self) {
        self.existence_checks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_check_failures(&self) {
        self.check_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_repairs(&self) {
        self.repairs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_convergence_failures(&self) {
        self.convergence_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_seed_fallbacks(&self) {
        self.seed_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            names_generated: self.names_generated.load(Ordering::Relaxed),
            existence_checks: self.existence_checks.load(Ordering::Relaxed),
            check_failures: self.check_failures.load(Ordering::Relaxed),
            repairs: self.repairs.load(Ordering::Relaxed),
            convergence_failures: self.convergence_failures.load(Ordering::Relaxed),
            seed_fallbacks: self.seed_fallbacks.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub names_generated: u64,
    pub existence_checks: u64,
    pub check_failures: u64,
    pub repairs: u64,
    pub convergence_failures: u64,
    pub seed_fallbacks: u64,
}

impl MetricsSnapshot {
    /// Average existence checks per generated name
    pub fn checks_per_name(&self) -> f64 {
        if self.names_generated == 0 {
            0.0
        } else {
            self.existence_checks as f64 / self.names_generated as f64
        }
    }
}
